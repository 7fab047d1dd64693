//! Action union broadcast to every domain store.

use super::cart::CartAction;
use super::product::ProductAction;
use super::ui::UiAction;

/// An action for one of the domain stores.
///
/// A [`StoreSet`](super::StoreSet) hands every action to all three reducers.
/// Each reducer handles its own arm and ignores the rest, so an action that a
/// store does not know about never changes that store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	/// Product store action.
	Product(ProductAction),
	/// Cart store action.
	Cart(CartAction),
	/// UI store action.
	Ui(UiAction),
}

impl Action {
	/// Short action name for logs.
	pub fn domain(&self) -> &'static str {
		match self {
			Self::Product(_) => "product",
			Self::Cart(_) => "cart",
			Self::Ui(_) => "ui",
		}
	}
}

impl From<ProductAction> for Action {
	fn from(action: ProductAction) -> Self {
		Self::Product(action)
	}
}

impl From<CartAction> for Action {
	fn from(action: CartAction) -> Self {
		Self::Cart(action)
	}
}

impl From<UiAction> for Action {
	fn from(action: UiAction) -> Self {
		Self::Ui(action)
	}
}
