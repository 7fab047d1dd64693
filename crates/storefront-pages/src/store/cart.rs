//! Cart store.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::core::Reducer;
use crate::api::Product;

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
	/// Product id, unique within the cart.
	pub product_id: String,
	/// Product title at the time it was added.
	pub title: String,
	/// Product image.
	#[serde(default)]
	pub image: String,
	/// Unit price.
	pub price: u64,
	/// Quantity, at least 1.
	pub quantity: u32,
	/// Checkbox state.
	#[serde(default)]
	pub selected: bool,
}

impl CartItem {
	/// Builds a cart line from a product.
	pub fn from_product(product: &Product, quantity: u32) -> Self {
		Self {
			product_id: product.product_id.clone(),
			title: product.title.clone(),
			image: product.image.clone(),
			price: product.lprice,
			quantity: quantity.max(1),
			selected: false,
		}
	}

	/// Unit price times quantity.
	pub fn subtotal(&self) -> u64 {
		self.price.saturating_mul(u64::from(self.quantity))
	}
}

/// Cart domain state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
	/// Cart lines in insertion order.
	pub items: Vec<CartItem>,
	/// Whether every line is selected. Always `false` for an empty cart.
	pub selected_all: bool,
}

impl CartState {
	fn with_items(items: Vec<CartItem>) -> Self {
		let selected_all = !items.is_empty() && items.iter().all(|item| item.selected);
		Self {
			items,
			selected_all,
		}
	}

	/// Finds a line by product id.
	pub fn item(&self, product_id: &str) -> Option<&CartItem> {
		self.items.iter().find(|item| item.product_id == product_id)
	}

	/// Number of distinct products.
	pub fn item_count(&self) -> usize {
		self.items.len()
	}

	/// Sum of all subtotals.
	pub fn total_amount(&self) -> u64 {
		self.items.iter().map(CartItem::subtotal).sum()
	}

	/// Number of selected lines.
	pub fn selected_count(&self) -> usize {
		self.items.iter().filter(|item| item.selected).count()
	}

	/// Sum of selected subtotals.
	pub fn selected_amount(&self) -> u64 {
		self.items
			.iter()
			.filter(|item| item.selected)
			.map(CartItem::subtotal)
			.sum()
	}
}

/// Cart store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
	/// Adds a product, or increases the quantity of an existing line.
	AddItem {
		/// Product to add.
		product: Product,
		/// Quantity to add.
		quantity: u32,
	},
	/// Removes a line.
	RemoveItem {
		/// Product id.
		product_id: String,
	},
	/// Sets the quantity of a line, clamped to at least 1.
	UpdateQuantity {
		/// Product id.
		product_id: String,
		/// New quantity.
		quantity: u32,
	},
	/// Toggles one line's checkbox.
	ToggleSelect {
		/// Product id.
		product_id: String,
	},
	/// Selects every line.
	SelectAll,
	/// Deselects every line.
	DeselectAll,
	/// Removes all selected lines.
	RemoveSelected,
	/// Empties the cart.
	Clear,
	/// Replaces the cart with previously persisted lines.
	///
	/// Lines sharing a product id are folded into the first one with their
	/// quantities summed.
	Restore(Vec<CartItem>),
}

/// Reducer for [`CartState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CartReducer;

impl Reducer for CartReducer {
	type State = CartState;
	type Action = Action;
	const NAME: &'static str = "cart";

	fn reduce(&self, state: &CartState, action: &Action) -> Option<CartState> {
		let Action::Cart(action) = action else {
			return None;
		};

		let mut items = state.items.clone();
		match action {
			CartAction::AddItem { product, quantity } => {
				match items
					.iter_mut()
					.find(|item| item.product_id == product.product_id)
				{
					Some(item) => item.quantity = item.quantity.saturating_add((*quantity).max(1)),
					None => items.push(CartItem::from_product(product, *quantity)),
				}
			}
			CartAction::RemoveItem { product_id } => {
				state.item(product_id)?;
				items.retain(|item| &item.product_id != product_id);
			}
			CartAction::UpdateQuantity {
				product_id,
				quantity,
			} => {
				let item = items.iter_mut().find(|item| &item.product_id == product_id)?;
				item.quantity = (*quantity).max(1);
			}
			CartAction::ToggleSelect { product_id } => {
				let item = items.iter_mut().find(|item| &item.product_id == product_id)?;
				item.selected = !item.selected;
			}
			CartAction::SelectAll => items.iter_mut().for_each(|item| item.selected = true),
			CartAction::DeselectAll => items.iter_mut().for_each(|item| item.selected = false),
			CartAction::RemoveSelected => items.retain(|item| !item.selected),
			CartAction::Clear => items.clear(),
			CartAction::Restore(restored) => {
				items = Vec::with_capacity(restored.len());
				for line in restored {
					let quantity = line.quantity.max(1);
					match items
						.iter_mut()
						.find(|item| item.product_id == line.product_id)
					{
						Some(item) => item.quantity = item.quantity.saturating_add(quantity),
						None => items.push(CartItem {
							quantity,
							..line.clone()
						}),
					}
				}
			}
		}
		Some(CartState::with_items(items))
	}
}
