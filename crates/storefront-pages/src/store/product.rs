//! Product store: listing, categories and the product detail page.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::core::Reducer;
use crate::api::{Categories, Product};

/// Product domain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductState {
	/// Current listing page.
	pub products: Vec<Product>,
	/// Total products matching the listing query.
	pub total_count: u64,
	/// Category tree for the filter UI.
	pub categories: Categories,
	/// Product shown on the detail page.
	pub current_product: Option<Product>,
	/// Products related to `current_product`.
	pub related_products: Vec<Product>,
	/// Whether a load is in flight.
	pub loading: bool,
	/// Last load error.
	pub error: Option<String>,
}

impl Default for ProductState {
	/// Nothing has been loaded yet, so the initial state is loading.
	fn default() -> Self {
		Self {
			products: Vec::new(),
			total_count: 0,
			categories: Categories::new(),
			current_product: None,
			related_products: Vec::new(),
			loading: true,
			error: None,
		}
	}
}

/// Fields restored in one step during hydration.
///
/// `None` fields are left as they are; `error` always overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSetup {
	/// Listing page.
	pub products: Option<Vec<Product>>,
	/// Listing total.
	pub total_count: Option<u64>,
	/// Category tree.
	pub categories: Option<Categories>,
	/// Detail product.
	pub current_product: Option<Product>,
	/// Related products.
	pub related_products: Option<Vec<Product>>,
	/// Error recorded by the server render.
	pub error: Option<String>,
}

/// Product store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
	/// Restores server-rendered state.
	Setup(ProductSetup),
	/// A load started; clears the previous error.
	StartLoading,
	/// Replaces the listing.
	SetProducts {
		/// Listing page.
		products: Vec<Product>,
		/// Listing total.
		total_count: u64,
	},
	/// Appends the next listing page (infinite scroll).
	AppendProducts {
		/// Additional products.
		products: Vec<Product>,
		/// Listing total.
		total_count: u64,
	},
	/// Replaces the category tree.
	SetCategories(Categories),
	/// Sets the detail product.
	SetCurrentProduct(Product),
	/// Sets the related products without touching any other field.
	SetRelatedProducts(Vec<Product>),
	/// Clears detail data when leaving the detail page.
	ClearCurrentProduct,
	/// Records a failed load.
	///
	/// Detail data is cleared: an error never coexists with a stale
	/// `current_product`. The listing stays as the last good result.
	SetError(String),
}

/// Reducer for [`ProductState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductReducer;

impl Reducer for ProductReducer {
	type State = ProductState;
	type Action = Action;
	const NAME: &'static str = "product";

	fn reduce(&self, state: &ProductState, action: &Action) -> Option<ProductState> {
		let Action::Product(action) = action else {
			return None;
		};

		let next = match action {
			ProductAction::Setup(setup) => ProductState {
				products: setup.products.clone().unwrap_or_else(|| state.products.clone()),
				total_count: setup.total_count.unwrap_or(state.total_count),
				categories: setup
					.categories
					.clone()
					.unwrap_or_else(|| state.categories.clone()),
				current_product: setup
					.current_product
					.clone()
					.or_else(|| state.current_product.clone()),
				related_products: setup
					.related_products
					.clone()
					.unwrap_or_else(|| state.related_products.clone()),
				loading: false,
				error: setup.error.clone(),
			},
			ProductAction::StartLoading => ProductState {
				loading: true,
				error: None,
				..state.clone()
			},
			ProductAction::SetProducts {
				products,
				total_count,
			} => ProductState {
				products: products.clone(),
				total_count: *total_count,
				loading: false,
				error: None,
				..state.clone()
			},
			ProductAction::AppendProducts {
				products,
				total_count,
			} => {
				let mut merged = state.products.clone();
				merged.extend(products.iter().cloned());
				ProductState {
					products: merged,
					total_count: *total_count,
					loading: false,
					error: None,
					..state.clone()
				}
			}
			ProductAction::SetCategories(categories) => ProductState {
				categories: categories.clone(),
				..state.clone()
			},
			ProductAction::SetCurrentProduct(product) => ProductState {
				current_product: Some(product.clone()),
				loading: false,
				error: None,
				..state.clone()
			},
			ProductAction::SetRelatedProducts(related) => ProductState {
				related_products: related.clone(),
				..state.clone()
			},
			ProductAction::ClearCurrentProduct => ProductState {
				current_product: None,
				related_products: Vec::new(),
				..state.clone()
			},
			ProductAction::SetError(message) => ProductState {
				current_product: None,
				related_products: Vec::new(),
				loading: false,
				error: Some(message.clone()),
				..state.clone()
			},
		};
		Some(next)
	}
}
