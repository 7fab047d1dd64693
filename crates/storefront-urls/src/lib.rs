//! Storefront URLs - routing shared by server and browser
//!
//! This crate resolves URLs to logical storefront pages. It is deliberately
//! environment-agnostic: the server renderer resolves each request through a
//! [`RouterTable`] and the browser navigation controller resolves each
//! in-page transition through the very same table, so a URL can never show
//! one page on first paint and a different page after hydration.
//!
//! ## Modules
//!
//! - [`pattern`]: `:name` path patterns compiled to anchored matchers
//! - [`query`]: URL splitting and query-string parameters
//! - [`router`]: ordered route table with a not-found fallback
//! - [`error`]: configuration and URL-building errors
//!
//! ## Example
//!
//! ```
//! use storefront_urls::{PageId, RouterTable};
//!
//! let table = RouterTable::storefront().unwrap();
//! let m = table.resolve("/product/42/?ref=home");
//! assert_eq!(m.page_id, PageId::ProductDetail);
//! assert_eq!(m.param("id"), Some("42"));
//! assert_eq!(m.query_param("ref"), Some("home"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod pattern;
pub mod query;
pub mod router;

pub use error::{PatternError, RouterError};
pub use pattern::PathPattern;
pub use query::{QueryParams, split_url};
pub use router::{Matcher, PageId, RouteEntry, RouteMatch, RouterTable};
