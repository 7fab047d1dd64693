//! Stores, server rendering, hydration and client navigation
//!
//! This module provides access to storefront-pages.
//!
//! ## Architecture
//!
//! - **Stores**: product, cart and UI reducer stores, fresh per request on
//!   the server and long-lived on the client
//! - **SSR**: markup, head and initial data per request
//! - **Hydration**: one-shot handoff of server state into client stores
//! - **Navigation**: in-page transitions resolved through the shared table

// Re-export all storefront-pages functionality
pub use storefront_pages::*;
