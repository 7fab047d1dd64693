//! Route resolution shared by the server renderer and the browser client
//!
//! This module provides access to storefront-urls: `:name` path patterns,
//! the ordered route table with its not-found fallback, and query-string
//! parameters.
//!
//! ## Example
//!
//! ```
//! use storefront::urls::{PageId, QueryParams, RouterTable};
//!
//! let table = RouterTable::storefront().unwrap().with_base_path("/shop");
//! let url = table
//! 	.url_for(PageId::ProductDetail, &[("id", "42")], &QueryParams::new())
//! 	.unwrap();
//! assert_eq!(url, "/shop/product/42/");
//! ```

// Re-export all storefront-urls functionality
pub use storefront_urls::*;
