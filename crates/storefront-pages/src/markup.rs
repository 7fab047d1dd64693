//! Markup rendering collaborator.

use storefront_urls::RouteMatch;

use crate::store::StoreSnapshot;

/// Turns store snapshots into page markup.
///
/// Implementations must be pure: the same route and snapshot always produce
/// the same string. The server renderer and the client re-render both go
/// through this trait, which keeps first paint and hydrated output identical.
pub trait MarkupRenderer: Send + Sync {
	/// Renders the body markup for `route`.
	fn render(&self, route: &RouteMatch, snapshot: &StoreSnapshot) -> String;
}

impl<F> MarkupRenderer for F
where
	F: Fn(&RouteMatch, &StoreSnapshot) -> String + Send + Sync,
{
	fn render(&self, route: &RouteMatch, snapshot: &StoreSnapshot) -> String {
		self(route, snapshot)
	}
}
