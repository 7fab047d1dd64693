//! Hydration Bridge
//!
//! Moves server-computed state into the client stores exactly once. The
//! payload lives in a [`HandoffSlot`] that is emptied on first read, so a
//! second [`hydrate`] call finds nothing and leaves the stores alone.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use storefront_urls::PageId;

use crate::ssr::{HydrationPayload, extract_initial_data};
use crate::store::{ProductAction, StoreError, StoreSet};

/// Errors that can occur during hydration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HydrationError {
	/// A store rejected the setup dispatch.
	#[error("failed to restore server state: {0}")]
	Store(#[from] StoreError),
}

/// One-shot holder of the server payload.
#[derive(Debug, Default)]
pub struct HandoffSlot {
	payload: Mutex<Option<HydrationPayload>>,
	consumed: AtomicBool,
}

impl HandoffSlot {
	/// Creates a slot holding `payload`.
	pub fn new(payload: HydrationPayload) -> Self {
		Self {
			payload: Mutex::new(Some(payload)),
			consumed: AtomicBool::new(false),
		}
	}

	/// Creates a slot with nothing to hand off.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Creates a slot from the JSON assigned to `window.__INITIAL_DATA__`.
	///
	/// Unparseable JSON is logged and yields an empty slot; the client then
	/// loads the page data itself.
	pub fn from_json(json: &str) -> Self {
		match HydrationPayload::from_json(json) {
			Ok(payload) => Self::new(payload),
			Err(error) => {
				tracing::warn!(%error, "discarding unparseable initial data");
				Self::empty()
			}
		}
	}

	/// Creates a slot from a server-rendered document.
	pub fn from_document(document: &str) -> Self {
		extract_initial_data(document).map_or_else(Self::empty, Self::from_json)
	}

	/// Removes and returns the payload. Later calls return `None`.
	pub fn take(&self) -> Option<HydrationPayload> {
		let payload = self.payload.lock().take();
		self.consumed.store(true, Ordering::Release);
		payload
	}

	/// Whether [`take`](Self::take) has been called.
	pub fn is_consumed(&self) -> bool {
		self.consumed.load(Ordering::Acquire)
	}

	/// Whether a payload is still waiting to be taken.
	pub fn is_pending(&self) -> bool {
		self.payload.lock().is_some()
	}
}

/// Proof that hydration ran.
///
/// The navigation controller can only be built from this token, so it
/// always starts after the stores hold server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hydrated {
	page: Option<PageId>,
}

impl Hydrated {
	/// Page whose data was restored, `None` when nothing was handed off.
	pub fn page(&self) -> Option<PageId> {
		self.page
	}
}

/// Dispatches the slot's payload into `stores` and empties the slot.
///
/// An empty or already consumed slot is a no-op.
pub fn hydrate(slot: &HandoffSlot, stores: &StoreSet) -> Result<Hydrated, HydrationError> {
	let Some(payload) = slot.take() else {
		tracing::debug!("no initial data to hydrate");
		return Ok(Hydrated { page: None });
	};

	let page = payload.page_id();
	stores.dispatch(ProductAction::Setup(payload.into_setup()))?;
	tracing::info!(?page, "hydrated from server state");
	Ok(Hydrated { page: Some(page) })
}
