//! Client application boot.
//!
//! Builds the single client store set, hydrates it from the server payload,
//! wires a re-render subscriber, and hands control to the navigation
//! controller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use storefront_urls::RouterTable;
use tokio::sync::mpsc;

use crate::api::Product;
use crate::hydration::{HandoffSlot, HydrationError, hydrate};
use crate::loader::PageLoader;
use crate::markup::MarkupRenderer;
use crate::navigation::{
	History, NavigationController, NavigationError, NavigationEvent, NavigationOutcome,
};
use crate::store::{CartAction, StoreError, StoreSet, Subscription, UiAction};

/// Message shown after a product is added to the cart.
pub const ADDED_TO_CART_MESSAGE: &str = "Added to cart";

/// Errors raised while booting the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
	/// Hydration failed.
	#[error(transparent)]
	Hydration(#[from] HydrationError),
	/// The first page load failed.
	#[error(transparent)]
	Navigation(#[from] NavigationError),
}

/// Output of the client-side re-render subscriber.
#[derive(Debug, Default)]
struct View {
	html: RwLock<String>,
	renders: AtomicUsize,
}

/// A booted client: stores, controller and the latest rendered markup.
pub struct ClientApp {
	stores: StoreSet,
	controller: Arc<NavigationController>,
	view: Arc<View>,
	subscriptions: [Subscription; 3],
}

impl std::fmt::Debug for ClientApp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClientApp")
			.field("controller", &self.controller)
			.field("renders", &self.render_count())
			.finish_non_exhaustive()
	}
}

impl ClientApp {
	/// Hydrates, renders the current page and returns the running app.
	///
	/// When `slot` holds data for the current URL nothing is fetched;
	/// otherwise the page is loaded through `loader`.
	pub async fn boot(
		router: Arc<RouterTable>,
		loader: PageLoader,
		markup: Arc<dyn MarkupRenderer>,
		history: Arc<dyn History>,
		slot: &HandoffSlot,
	) -> Result<Self, ClientError> {
		let stores = StoreSet::client();
		let hydrated = hydrate(slot, &stores)?;
		let controller = Arc::new(NavigationController::new(
			router,
			loader,
			stores.clone(),
			history,
			hydrated,
		));

		let view = Arc::new(View::default());
		let render = render_fn(
			Arc::downgrade(&controller),
			stores.clone(),
			markup,
			Arc::downgrade(&view),
		);
		render();
		let subscriptions = stores.subscribe_all(render);

		let app = Self {
			stores,
			controller,
			view,
			subscriptions,
		};
		let outcome = app.controller.initialize().await?;
		tracing::info!(?outcome, "client booted");
		Ok(app)
	}

	/// The client store set.
	pub fn stores(&self) -> &StoreSet {
		&self.stores
	}

	/// The navigation controller.
	pub fn controller(&self) -> &Arc<NavigationController> {
		&self.controller
	}

	/// Latest rendered markup.
	pub fn html(&self) -> String {
		self.view.html.read().clone()
	}

	/// Number of renders so far, including the first paint.
	pub fn render_count(&self) -> usize {
		self.view.renders.load(Ordering::SeqCst)
	}

	/// Navigates to `url` (link activation).
	pub async fn navigate(&self, url: &str) -> Result<NavigationOutcome, NavigationError> {
		self.controller.navigate(url).await
	}

	/// Runs the navigation controller until `events` closes.
	pub async fn run(&self, events: mpsc::Receiver<NavigationEvent>) {
		Arc::clone(&self.controller).start(events).await;
	}

	/// Adds `product` to the cart and shows a success toast.
	pub fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<(), StoreError> {
		self.stores.dispatch(CartAction::AddItem {
			product: product.clone(),
			quantity,
		})?;
		self.stores.dispatch(UiAction::success(ADDED_TO_CART_MESSAGE))
	}

	/// Opens the cart modal.
	pub fn open_cart(&self) -> Result<(), StoreError> {
		self.stores.dispatch(UiAction::OpenCartModal)
	}
}

impl Drop for ClientApp {
	fn drop(&mut self) {
		// The listeners hold store handles; detach them so the stores can drop.
		self.subscriptions.iter().for_each(Subscription::unsubscribe);
	}
}

fn render_fn(
	controller: Weak<NavigationController>,
	stores: StoreSet,
	markup: Arc<dyn MarkupRenderer>,
	view: Weak<View>,
) -> impl Fn() + Send + Sync + 'static {
	move || {
		let (Some(controller), Some(view)) = (controller.upgrade(), view.upgrade()) else {
			return;
		};
		let html = markup.render(&controller.current_route(), &stores.snapshot());
		*view.html.write() = html;
		view.renders.fetch_add(1, Ordering::SeqCst);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::navigation::MemoryHistory;
	use crate::ssr::SsrRenderer;
	use crate::testing::{MemoryCatalog, PlainMarkup, sample_products};
	use rstest::rstest;

	fn parts(catalog: MemoryCatalog) -> (Arc<RouterTable>, PageLoader, Arc<dyn MarkupRenderer>) {
		(
			Arc::new(RouterTable::storefront().unwrap()),
			PageLoader::new(Arc::new(catalog)),
			Arc::new(PlainMarkup),
		)
	}

	#[rstest]
	#[tokio::test]
	async fn test_boot_without_payload_fetches() {
		let catalog = MemoryCatalog::new(sample_products());
		let counter = catalog.query_counter();
		let (router, loader, markup) = parts(catalog);

		let app = ClientApp::boot(
			router,
			loader,
			markup,
			Arc::new(MemoryHistory::new("/")),
			&HandoffSlot::empty(),
		)
		.await
		.unwrap();

		assert_eq!(counter.get(), 2);
		assert_eq!(app.html().matches("<li ").count(), 6);
	}

	#[rstest]
	#[tokio::test]
	async fn test_first_client_render_matches_server_markup() {
		let (router, loader, markup) = parts(MemoryCatalog::new(sample_products()));
		let server = SsrRenderer::new(Arc::clone(&router), loader.clone(), Arc::clone(&markup));
		let output = server.render("/product/85067212996/").await.unwrap();
		let slot = HandoffSlot::new(output.initial_data.clone().unwrap());

		let client_catalog = MemoryCatalog::new(sample_products());
		let counter = client_catalog.query_counter();
		let app = ClientApp::boot(
			router,
			PageLoader::new(Arc::new(client_catalog)),
			markup,
			Arc::new(MemoryHistory::new("/product/85067212996/")),
			&slot,
		)
		.await
		.unwrap();

		assert_eq!(counter.get(), 0);
		assert_eq!(app.html(), output.markup);
	}

	#[rstest]
	#[tokio::test]
	async fn test_add_to_cart_rerenders_and_toasts() {
		let (router, loader, markup) = parts(MemoryCatalog::new(sample_products()));
		let app = ClientApp::boot(
			router,
			loader,
			markup,
			Arc::new(MemoryHistory::new("/")),
			&HandoffSlot::empty(),
		)
		.await
		.unwrap();
		let renders = app.render_count();

		app.add_to_cart(&sample_products()[0], 1).unwrap();

		assert_eq!(app.render_count(), renders + 2);
		assert!(app.html().contains("<span class=\"cart-count\">1</span>"));
		let ui = app.stores().ui.get_state();
		assert!(ui.toast.visible);
		assert_eq!(ui.toast.message, ADDED_TO_CART_MESSAGE);
	}
}
