//! Client Navigation Controller
//!
//! Turns link activations and history changes into in-page transitions:
//! resolve the URL through the shared [`RouterTable`], load the page data,
//! dispatch it, and let store subscribers re-render.
//!
//! ## State machine
//!
//! ```text
//! Idle --request--> Navigating --data dispatched (success or error)--> Idle
//! ```
//!
//! Every navigation takes a new generation number. A load that finishes
//! after a newer navigation started is discarded, so a slow response can
//! never overwrite the page the user moved on to.
//!
//! Starting a navigation and applying a loaded result both run under one
//! transition lock, so a newer navigation cannot begin while an older
//! result is half dispatched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use storefront_urls::{PageId, QueryParams, RouteMatch, RouterError, RouterTable};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::hydration::Hydrated;
use crate::loader::PageLoader;
use crate::store::{ProductAction, StoreError, StoreSet, UiAction};

/// Something that asks for a page transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
	/// An in-app link was activated; pushes a history entry.
	LinkActivated(String),
	/// The history moved (back/forward); no entry is pushed.
	HistoryPopped(String),
}

impl NavigationEvent {
	/// Target URL.
	pub fn url(&self) -> &str {
		match self {
			Self::LinkActivated(url) | Self::HistoryPopped(url) => url,
		}
	}
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
	/// No transition in progress.
	Idle,
	/// A transition is loading data.
	Navigating {
		/// Generation of the transition.
		generation: u64,
		/// Target URL.
		url: String,
	},
}

/// Result of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The page's data was dispatched.
	Completed(PageId),
	/// The page was already hydrated with server data; nothing was loaded.
	Reused(PageId),
	/// A newer navigation started first; the loaded data was discarded.
	Superseded,
}

/// Errors raised by the navigation controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
	/// A store rejected a dispatch.
	#[error(transparent)]
	Store(#[from] StoreError),
	/// A URL could not be built.
	#[error(transparent)]
	Router(#[from] RouterError),
}

/// Browser history abstraction.
pub trait History: Send + Sync {
	/// Pushes a new entry.
	fn push(&self, url: &str);
	/// Replaces the current entry.
	fn replace(&self, url: &str);
	/// Current URL.
	fn current(&self) -> String;
}

/// In-memory [`History`] with back/forward support.
#[derive(Debug)]
pub struct MemoryHistory {
	inner: Mutex<HistoryStack>,
}

#[derive(Debug)]
struct HistoryStack {
	entries: Vec<String>,
	index: usize,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial`.
	pub fn new(initial: impl Into<String>) -> Self {
		Self {
			inner: Mutex::new(HistoryStack {
				entries: vec![initial.into()],
				index: 0,
			}),
		}
	}

	/// Moves one entry back and returns its URL.
	pub fn back(&self) -> Option<String> {
		let mut stack = self.inner.lock();
		stack.index = stack.index.checked_sub(1)?;
		Some(stack.entries[stack.index].clone())
	}

	/// Moves one entry forward and returns its URL.
	pub fn forward(&self) -> Option<String> {
		let mut stack = self.inner.lock();
		if stack.index + 1 >= stack.entries.len() {
			return None;
		}
		stack.index += 1;
		Some(stack.entries[stack.index].clone())
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.inner.lock().entries.clone()
	}
}

impl History for MemoryHistory {
	fn push(&self, url: &str) {
		let mut stack = self.inner.lock();
		let keep = stack.index + 1;
		stack.entries.truncate(keep);
		stack.entries.push(url.to_string());
		stack.index = keep;
	}

	fn replace(&self, url: &str) {
		let mut stack = self.inner.lock();
		let index = stack.index;
		stack.entries[index] = url.to_string();
	}

	fn current(&self) -> String {
		let stack = self.inner.lock();
		stack.entries[stack.index].clone()
	}
}

/// Drives client-side transitions over the long-lived store set.
pub struct NavigationController {
	router: Arc<RouterTable>,
	loader: PageLoader,
	stores: StoreSet,
	history: Arc<dyn History>,
	hydrated: Hydrated,
	generation: AtomicU64,
	// Held while a transition starts and while a result is applied.
	transition: Mutex<()>,
	state: Mutex<NavigationState>,
	current: RwLock<RouteMatch>,
}

impl std::fmt::Debug for NavigationController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationController")
			.field("state", &*self.state.lock())
			.field("current", &self.current.read().path)
			.field("hydrated", &self.hydrated)
			.finish_non_exhaustive()
	}
}

impl NavigationController {
	/// Creates a controller for hydrated stores.
	pub fn new(
		router: Arc<RouterTable>,
		loader: PageLoader,
		stores: StoreSet,
		history: Arc<dyn History>,
		hydrated: Hydrated,
	) -> Self {
		let current = router.resolve(&history.current());
		Self {
			router,
			loader,
			stores,
			history,
			hydrated,
			generation: AtomicU64::new(0),
			transition: Mutex::new(()),
			state: Mutex::new(NavigationState::Idle),
			current: RwLock::new(current),
		}
	}

	/// Current controller state.
	pub fn state(&self) -> NavigationState {
		self.state.lock().clone()
	}

	/// Route currently displayed (or being loaded).
	pub fn current_route(&self) -> RouteMatch {
		self.current.read().clone()
	}

	/// The shared router table.
	pub fn router(&self) -> &Arc<RouterTable> {
		&self.router
	}

	/// The controlled stores.
	pub fn stores(&self) -> &StoreSet {
		&self.stores
	}

	/// Loads the page for the current history entry, unless hydration
	/// already restored it.
	pub async fn initialize(&self) -> Result<NavigationOutcome, NavigationError> {
		let route = self.current_route();
		if self.hydrated.page() == Some(route.page_id) {
			tracing::debug!(page = ?route.page_id, "reusing hydrated state");
			return Ok(NavigationOutcome::Reused(route.page_id));
		}
		self.load(route).await
	}

	/// Handles one navigation event.
	pub async fn handle(&self, event: NavigationEvent) -> Result<NavigationOutcome, NavigationError> {
		match event {
			NavigationEvent::LinkActivated(url) => self.navigate(&url).await,
			NavigationEvent::HistoryPopped(url) => {
				tracing::debug!(%url, "history popped");
				self.load(self.router.resolve(&url)).await
			}
		}
	}

	/// Pushes `url` onto the history and loads it.
	pub async fn navigate(&self, url: &str) -> Result<NavigationOutcome, NavigationError> {
		tracing::debug!(url, "link activated");
		self.history.push(url);
		self.load(self.router.resolve(url)).await
	}

	/// Navigates to the current page with `query` as its query parameters.
	///
	/// Used for filter, sort and pagination changes on the listing.
	pub async fn navigate_query(
		&self,
		query: &QueryParams,
	) -> Result<NavigationOutcome, NavigationError> {
		let relative = self.current_route().to_url_with(query)?;
		self.navigate(&self.router.absolute(&relative)).await
	}

	/// Navigates to a product detail page.
	pub async fn navigate_to_product(&self, id: &str) -> Result<NavigationOutcome, NavigationError> {
		let url = self
			.router
			.url_for(PageId::ProductDetail, &[("id", id)], &QueryParams::new())?;
		self.navigate(&url).await
	}

	/// Consumes events until the channel closes.
	///
	/// Each event is handled on its own task so a newer navigation can start
	/// while an older load is still pending.
	pub async fn start(self: Arc<Self>, mut events: mpsc::Receiver<NavigationEvent>) {
		let mut tasks = JoinSet::new();
		while let Some(event) = events.recv().await {
			let controller = Arc::clone(&self);
			tasks.spawn(async move {
				if let Err(error) = controller.handle(event).await {
					tracing::warn!(%error, "navigation failed");
				}
			});
			while tasks.try_join_next().is_some() {}
		}
		while tasks.join_next().await.is_some() {}
		tracing::debug!("navigation event channel closed");
	}

	async fn load(&self, route: RouteMatch) -> Result<NavigationOutcome, NavigationError> {
		let generation = {
			let _transition = self.transition.lock();
			let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
			*self.state.lock() = NavigationState::Navigating {
				generation,
				url: route.path.clone(),
			};
			*self.current.write() = route.clone();

			if let Err(error) = self.begin_loading(&route) {
				self.finish(generation);
				return Err(error.into());
			}
			generation
		};

		let data = self.loader.fetch(&route).await;

		let _transition = self.transition.lock();
		if self.generation.load(Ordering::Acquire) != generation {
			tracing::debug!(generation, path = %route.path, "discarding stale navigation result");
			return Ok(NavigationOutcome::Superseded);
		}

		let applied = data
			.apply(&self.stores)
			.and_then(|()| self.stores.dispatch(UiAction::SetGlobalLoading(false)));
		self.finish(generation);
		applied?;
		tracing::debug!(generation, page = ?route.page_id, failed = data.is_failed(), "navigation complete");
		Ok(NavigationOutcome::Completed(route.page_id))
	}

	fn begin_loading(&self, route: &RouteMatch) -> Result<(), StoreError> {
		self.stores.dispatch(UiAction::SetGlobalLoading(true))?;
		if route.page_id != PageId::NotFound {
			self.stores.dispatch(ProductAction::StartLoading)?;
		}
		Ok(())
	}

	fn finish(&self, generation: u64) {
		let mut state = self.state.lock();
		if matches!(*state, NavigationState::Navigating { generation: g, .. } if g == generation) {
			*state = NavigationState::Idle;
		}
	}
}
