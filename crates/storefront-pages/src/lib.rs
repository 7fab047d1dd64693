//! Storefront Pages - stores, server rendering, hydration and navigation
//!
//! One rendering core shared by the server (first paint, SEO) and the
//! browser (interactivity):
//!
//! - [`store`]: reducer stores for the product, cart and UI domains
//! - [`loader`]: page data loading through the [`api::CatalogQuery`] trait
//! - [`ssr`]: per-request rendering into markup, head and initial data
//! - [`hydration`]: one-shot transfer of server state into client stores
//! - [`navigation`]: client-side transitions over the shared router table
//! - [`client`]: client boot wiring the pieces together
//! - [`config`]: site settings from TOML and `STOREFRONT_*` variables
//! - [`testing`]: in-memory catalog and plain markup for tests and demos
//!
//! ## Request lifecycle
//!
//! ```text
//! server: resolve -> fresh StoreSet -> load -> dispatch -> markup + initial data
//!                                                              |
//! client: HandoffSlot -> hydrate -> NavigationController -> re-render on change
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use storefront_pages::{PageLoader, SsrRenderer};
//! use storefront_pages::testing::{MemoryCatalog, PlainMarkup, sample_products};
//! use storefront_urls::RouterTable;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let renderer = SsrRenderer::new(
//! 	Arc::new(RouterTable::storefront().unwrap()),
//! 	PageLoader::new(Arc::new(MemoryCatalog::new(sample_products()))),
//! 	Arc::new(PlainMarkup),
//! );
//! let output = renderer.render("/?sort=price_desc").await.unwrap();
//! assert_eq!(output.head.title, "Shopping Mall - Home");
//! assert!(output.initial_data.is_some());
//! # }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod hydration;
pub mod loader;
pub mod markup;
pub mod navigation;
pub mod ssr;
pub mod store;
pub mod testing;

pub use api::{
	CatalogError, CatalogQuery, Categories, Pagination, Product, ProductPage, ProductQuery,
	SortOrder,
};
pub use client::{ClientApp, ClientError};
pub use config::{ConfigError, Mode, SiteSettings};
pub use hydration::{HandoffSlot, Hydrated, HydrationError, hydrate};
pub use loader::{PageData, PageLoader};
pub use markup::MarkupRenderer;
pub use navigation::{
	History, MemoryHistory, NavigationController, NavigationError, NavigationEvent,
	NavigationOutcome, NavigationState,
};
pub use ssr::{HydrationPayload, PageHead, RenderError, RenderOutput, SsrOptions, SsrRenderer};
pub use store::{Action, StoreError, StoreMode, StoreSet, StoreSnapshot};
