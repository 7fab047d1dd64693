//! Integration tests for the domain stores
//!
//! These tests verify the store contract shared by both environments:
//! 1. Subscribers run in registration order, once per dispatch, after the
//!    snapshot is replaced
//! 2. An action a store does not handle leaves its state equal (and the
//!    same snapshot)
//! 3. Related-product updates touch nothing else
//! 4. Server stores never notify

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rstest::rstest;
use storefront_pages::api::Product;
use storefront_pages::store::{CartAction, ProductAction, ProductState, StoreSet, UiAction};
use storefront_pages::testing::sample_products;

fn product(index: usize) -> Product {
	sample_products()[index].clone()
}

#[rstest]
fn test_two_subscribers_in_order_after_replacement() {
	// Arrange
	let stores = StoreSet::client();
	let log: Arc<Mutex<Vec<(&'static str, usize)>>> = Arc::new(Mutex::new(Vec::new()));
	for name in ["A", "B"] {
		let store = stores.cart.clone();
		let log = Arc::clone(&log);
		stores
			.cart
			.subscribe(move || log.lock().push((name, store.get_state().items.len())));
	}

	// Act
	stores
		.dispatch(CartAction::AddItem {
			product: product(0),
			quantity: 1,
		})
		.unwrap();

	// Assert
	assert_eq!(*log.lock(), vec![("A", 1), ("B", 1)]);
}

#[rstest]
fn test_set_related_products_example() {
	// Arrange
	let stores = StoreSet::client();
	stores
		.dispatch(ProductAction::SetProducts {
			products: sample_products(),
			total_count: 6,
		})
		.unwrap();
	let before = stores.product.get_state();

	// Act
	stores
		.dispatch(ProductAction::SetRelatedProducts(vec![product(1), product(2)]))
		.unwrap();

	// Assert
	let after = stores.product.get_state();
	assert_eq!(after.related_products, vec![product(1), product(2)]);
	assert_eq!(
		ProductState {
			related_products: before.related_products.clone(),
			..(*after).clone()
		},
		*before
	);
}

#[rstest]
#[case(ProductAction::StartLoading.into())]
#[case(UiAction::OpenCartModal.into())]
fn test_cart_ignores_other_domains(#[case] action: storefront_pages::Action) {
	// Arrange
	let stores = StoreSet::client();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	stores.cart.subscribe(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});
	let before = stores.cart.get_state();

	// Act
	stores.dispatch(action).unwrap();

	// Assert
	assert!(Arc::ptr_eq(&before, &stores.cart.get_state()));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
fn test_each_dispatch_notifies_once() {
	// Arrange
	let stores = StoreSet::client();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	stores.ui.subscribe(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	// Act
	stores.dispatch(UiAction::OpenCartModal).unwrap();
	stores.dispatch(UiAction::success("saved")).unwrap();
	stores.dispatch(UiAction::HideToast).unwrap();

	// Assert
	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
fn test_server_stores_never_notify() {
	// Arrange
	let stores = StoreSet::server();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let subs = stores.subscribe_all(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	// Act
	stores.dispatch(UiAction::OpenCartModal).unwrap();
	subs.iter().for_each(|sub| sub.unsubscribe());

	// Assert
	assert!(stores.ui.get_state().cart_modal_open);
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}
