//! The three domain stores composed side by side.

use std::sync::Arc;

use super::action::Action;
use super::cart::{CartReducer, CartState};
use super::core::{Store, StoreError, StoreMode, Subscription};
use super::product::{ProductReducer, ProductState};
use super::ui::{UiReducer, UiState};

/// Product, cart and UI stores for one environment.
///
/// The server builds a fresh set per request; the client builds exactly one
/// per page load and passes it around explicitly.
#[derive(Debug, Clone)]
pub struct StoreSet {
	/// Product store.
	pub product: Store<ProductReducer>,
	/// Cart store.
	pub cart: Store<CartReducer>,
	/// UI store.
	pub ui: Store<UiReducer>,
}

/// Snapshots of all three stores taken at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
	/// Product state.
	pub product: Arc<ProductState>,
	/// Cart state.
	pub cart: Arc<CartState>,
	/// UI state.
	pub ui: Arc<UiState>,
}

impl StoreSet {
	/// Builds a set of stores in the given mode with default states.
	pub fn new(mode: StoreMode) -> Self {
		Self {
			product: Store::new(mode, ProductState::default(), ProductReducer),
			cart: Store::new(mode, CartState::default(), CartReducer),
			ui: Store::new(mode, UiState::default(), UiReducer),
		}
	}

	/// Per-request stores without subscriptions.
	pub fn server() -> Self {
		Self::new(StoreMode::Server)
	}

	/// Long-lived stores with subscriptions.
	pub fn client() -> Self {
		Self::new(StoreMode::Client)
	}

	/// Hands the action to every store; stores that do not handle it stay
	/// untouched.
	///
	/// # Errors
	///
	/// Returns the first [`StoreError`] raised. Remaining stores still
	/// receive the action.
	pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
		let action = action.into();
		tracing::debug!(domain = action.domain(), "dispatch");

		let results = [
			self.product.dispatch_ref(&action),
			self.cart.dispatch_ref(&action),
			self.ui.dispatch_ref(&action),
		];
		results.into_iter().collect()
	}

	/// Reads all three snapshots.
	pub fn snapshot(&self) -> StoreSnapshot {
		StoreSnapshot {
			product: self.product.get_state(),
			cart: self.cart.get_state(),
			ui: self.ui.get_state(),
		}
	}

	/// Subscribes one listener to all three stores.
	///
	/// The returned handles must all be unsubscribed to detach the listener.
	pub fn subscribe_all<F>(&self, listener: F) -> [Subscription; 3]
	where
		F: Fn() + Send + Sync + 'static,
	{
		let listener = Arc::new(listener);
		let product = Arc::clone(&listener);
		let cart = Arc::clone(&listener);
		[
			self.product.subscribe(move || product()),
			self.cart.subscribe(move || cart()),
			self.ui.subscribe(move || listener()),
		]
	}
}
