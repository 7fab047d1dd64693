//! End-to-end tests through the `storefront` facade
//!
//! These tests verify one full request lifecycle:
//! 1. Settings build the router, loader and renderer options
//! 2. The server renders a document with embedded initial data
//! 3. The client boots from that document without refetching and then
//!    navigates on its own

use std::sync::Arc;

use rstest::rstest;
use storefront::pages::testing::{MemoryCatalog, PlainMarkup, sample_products};
use storefront::pages::{MemoryHistory, NavigationOutcome};
use storefront::prelude::*;

#[rstest]
#[tokio::test]
async fn test_server_to_client_lifecycle() {
	// Arrange
	let settings = SiteSettings::from_toml_str("base_path = \"/shop\"\npage_size = 4").unwrap();
	let router = Arc::new(settings.router().unwrap());
	let markup: Arc<dyn MarkupRenderer> = Arc::new(PlainMarkup);
	let server = SsrRenderer::with_options(
		Arc::clone(&router),
		settings.loader(Arc::new(MemoryCatalog::new(sample_products()))),
		Arc::clone(&markup),
		settings.ssr_options(),
	);
	let document = server.render_page("/shop/").await.unwrap();
	let client_catalog = MemoryCatalog::new(sample_products());
	let queries = client_catalog.query_counter();

	// Act
	let app = ClientApp::boot(
		Arc::clone(&router),
		settings.loader(Arc::new(client_catalog)),
		markup,
		Arc::new(MemoryHistory::new("/shop/")),
		&HandoffSlot::from_document(&document),
	)
	.await
	.unwrap();
	let booted_queries = queries.get();
	let outcome = app.navigate("/shop/product/22222222222/").await.unwrap();

	// Assert
	assert!(document.contains("<html lang=\"ko\">"));
	assert_eq!(booted_queries, 0);
	assert_eq!(outcome, NavigationOutcome::Completed(PageId::ProductDetail));
	assert!(app.html().contains("<h1>Wireless Earbuds</h1>"));
	let related = &app.stores().product.get_state().related_products;
	assert_eq!(related.len(), 1);
	assert_eq!(related[0].title, "Bluetooth Speaker");
}

#[rstest]
fn test_prelude_dispatch() {
	let stores = StoreSet::client();
	stores.dispatch(UiAction::OpenCartModal).unwrap();
	stores
		.dispatch(CartAction::AddItem {
			product: sample_products()[0].clone(),
			quantity: 2,
		})
		.unwrap();

	let snapshot = stores.snapshot();
	assert!(snapshot.ui.cart_modal_open);
	assert_eq!(snapshot.cart.total_amount(), 2 * 12900);
}
