//! # Storefront
//!
//! Shared rendering core for a product catalog and cart that is rendered on
//! the server for first paint and SEO, then hydrated in the browser for
//! interactivity.
//!
//! Both environments use the same route table and the same reducer stores,
//! so a URL always shows the same page before and after hydration.
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `pages` - stores, server rendering, hydration, client navigation and
//!   settings
//!
//! Routing ([`urls`]) is always available.
//!
//! ## Example
//!
//! ```
//! use storefront::urls::{PageId, RouterTable};
//!
//! let table = RouterTable::storefront().unwrap();
//! assert_eq!(table.resolve("/product/42/").page_id, PageId::ProductDetail);
//! assert_eq!(table.resolve("/unknown").page_id, PageId::NotFound);
//! ```

#[cfg(feature = "pages")]
pub mod pages;
pub mod urls;

pub use storefront_urls::{PageId, QueryParams, RouteMatch, RouterTable};

#[cfg(feature = "pages")]
pub use storefront_pages::{
	ClientApp, HandoffSlot, NavigationController, SiteSettings, SsrRenderer, hydrate,
	store::StoreSet,
};

/// Commonly used types.
pub mod prelude {
	pub use storefront_urls::{PageId, QueryParams, RouteMatch, RouterError, RouterTable};

	#[cfg(feature = "pages")]
	pub use storefront_pages::{
		CatalogQuery, ClientApp, HandoffSlot, MarkupRenderer, NavigationController, NavigationEvent,
		PageLoader, Product, ProductQuery, SiteSettings, SsrRenderer, hydrate,
		store::{Action, CartAction, ProductAction, StoreSet, UiAction},
	};
}
