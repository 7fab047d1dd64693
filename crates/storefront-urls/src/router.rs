//! Router table and URL resolution.
//!
//! The same [`RouterTable`] is used by the server renderer for every request
//! and by the browser navigation controller for every in-page transition, so
//! both environments always agree on which page a URL shows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;
use crate::pattern::PathPattern;
use crate::query::{QueryParams, split_url};

/// Logical page a URL resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageId {
	/// Product listing.
	Home,
	/// Single product with related products.
	ProductDetail,
	/// Dedicated not-found page.
	NotFound,
}

/// How an entry decides whether a path belongs to it.
#[derive(Debug, Clone)]
pub enum Matcher {
	/// A compiled path pattern.
	Pattern(PathPattern),
	/// Accepts nothing; used by the not-found fallback.
	Never,
}

impl Matcher {
	/// Returns captured parameter values for `path`, if it matches.
	pub fn captures(&self, path: &str) -> Option<Vec<String>> {
		match self {
			Self::Pattern(pattern) => pattern.captures(path),
			Self::Never => None,
		}
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		match self {
			Self::Pattern(pattern) => pattern.param_names(),
			Self::Never => &[],
		}
	}
}

/// A registered route. Immutable once added to a table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
	pattern: String,
	matcher: Matcher,
	page_id: PageId,
}

impl RouteEntry {
	/// Compiles `pattern` into an entry for `page_id`.
	pub fn new(pattern: &str, page_id: PageId) -> Result<Self, RouterError> {
		Ok(Self {
			pattern: pattern.to_string(),
			matcher: Matcher::Pattern(PathPattern::compile(pattern)?),
			page_id,
		})
	}

	fn fallback() -> Self {
		Self {
			pattern: String::new(),
			matcher: Matcher::Never,
			page_id: PageId::NotFound,
		}
	}

	/// Returns the source pattern (empty for the fallback).
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the matcher.
	pub fn matcher(&self) -> &Matcher {
		&self.matcher
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		self.matcher.param_names()
	}

	/// Returns the page this entry serves.
	pub fn page_id(&self) -> PageId {
		self.page_id
	}
}

/// The result of resolving a URL. Produced fresh for every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// The resolved page.
	pub page_id: PageId,
	/// Path parameters keyed by name.
	pub params: HashMap<String, String>,
	/// Decoded query parameters.
	pub query: QueryParams,
	/// Matched path with the base path stripped.
	pub path: String,
}

impl RouteMatch {
	/// Returns a path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Returns a query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query.get(name)
	}

	/// Returns whether no route matched.
	pub fn is_not_found(&self) -> bool {
		self.page_id == PageId::NotFound
	}

	/// Rebuilds the matched URL, relative to the base path, with `query`
	/// in place of the original query.
	pub fn to_url_with(&self, query: &QueryParams) -> Result<String, RouterError> {
		if query.is_empty() {
			return Ok(self.path.clone());
		}
		Ok(format!("{}?{}", self.path, query.to_query_string()?))
	}

	/// Rebuilds the matched URL, relative to the base path.
	pub fn to_url(&self) -> Result<String, RouterError> {
		self.to_url_with(&self.query)
	}
}

/// Ordered route table with a not-found fallback.
#[derive(Debug, Clone)]
pub struct RouterTable {
	entries: Vec<RouteEntry>,
	fallback: RouteEntry,
	/// Deployment prefix without trailing slash; empty when served at `/`.
	base_path: String,
}

impl Default for RouterTable {
	fn default() -> Self {
		Self::new()
	}
}

impl RouterTable {
	/// Creates an empty table holding only the fallback entry.
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
			fallback: RouteEntry::fallback(),
			base_path: String::new(),
		}
	}

	/// Creates the storefront table: home, product detail, and an explicit
	/// not-found path.
	pub fn storefront() -> Result<Self, RouterError> {
		Self::new()
			.route("/", PageId::Home)?
			.route("/product/:id/", PageId::ProductDetail)?
			.route("/404", PageId::NotFound)
	}

	/// Sets the deployment prefix stripped before matching and prepended when
	/// building URLs. `""` and `"/"` both mean "served at the root".
	pub fn with_base_path(mut self, base_path: &str) -> Self {
		let trimmed = base_path.trim_end_matches('/');
		self.base_path = if trimmed.is_empty() {
			String::new()
		} else if trimmed.starts_with('/') {
			trimmed.to_string()
		} else {
			format!("/{}", trimmed)
		};
		self
	}

	/// Returns the normalized base path.
	pub fn base_path(&self) -> &str {
		&self.base_path
	}

	/// Appends a route. Registration order is match priority.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] for a malformed pattern.
	pub fn add_route(&mut self, pattern: &str, page_id: PageId) -> Result<&mut Self, RouterError> {
		self.entries.push(RouteEntry::new(pattern, page_id)?);
		Ok(self)
	}

	/// Builder-style [`add_route`](Self::add_route).
	pub fn route(mut self, pattern: &str, page_id: PageId) -> Result<Self, RouterError> {
		self.add_route(pattern, page_id)?;
		Ok(self)
	}

	/// Returns the registered entries in priority order.
	pub fn entries(&self) -> &[RouteEntry] {
		&self.entries
	}

	/// Returns the not-found fallback entry.
	pub fn fallback(&self) -> &RouteEntry {
		&self.fallback
	}

	/// Removes the base path from `path`, if present.
	pub fn strip_base<'a>(&self, path: &'a str) -> &'a str {
		if self.base_path.is_empty() {
			return path;
		}
		match path.strip_prefix(self.base_path.as_str()) {
			Some("") => "/",
			Some(rest) if rest.starts_with('/') => rest,
			_ => path,
		}
	}

	/// Prepends the base path to a base-relative URL.
	pub fn absolute(&self, relative: &str) -> String {
		if self.base_path.is_empty() {
			return relative.to_string();
		}
		format!("{}{}", self.base_path, relative)
	}

	/// Resolves a URL to the first matching route, or the not-found page.
	pub fn resolve(&self, url: &str) -> RouteMatch {
		let (raw_path, raw_query) = split_url(url);
		let path = self.strip_base(raw_path);
		let query = QueryParams::parse(raw_query);

		let (entry, values) = self
			.entries
			.iter()
			.find_map(|entry| entry.matcher.captures(path).map(|values| (entry, values)))
			.unwrap_or((&self.fallback, Vec::new()));

		let params: HashMap<String, String> = entry
			.param_names()
			.iter()
			.cloned()
			.zip(values)
			.collect();

		tracing::debug!(url, page = ?entry.page_id, pattern = entry.pattern(), "resolved route");

		RouteMatch {
			page_id: entry.page_id,
			params,
			query,
			path: path.to_string(),
		}
	}

	/// Builds the URL of the first route serving `page_id`, including the
	/// base path and an optional query.
	pub fn url_for(
		&self,
		page_id: PageId,
		params: &[(&str, &str)],
		query: &QueryParams,
	) -> Result<String, RouterError> {
		let entry = self
			.entries
			.iter()
			.find(|entry| entry.page_id == page_id)
			.ok_or(RouterError::NoRouteForPage(page_id))?;

		let Matcher::Pattern(pattern) = &entry.matcher else {
			return Err(RouterError::NoRouteForPage(page_id));
		};

		let params_map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		let path = pattern.reverse(&params_map).ok_or_else(|| {
			let name = pattern
				.param_names()
				.iter()
				.find(|name| params_map.get(*name).is_none_or(|v| v.is_empty() || v.contains('/')))
				.cloned()
				.unwrap_or_default();
			RouterError::MissingParameter {
				pattern: entry.pattern.clone(),
				name,
			}
		})?;

		let mut url = format!("{}{}", self.base_path, path);
		if !query.is_empty() {
			url.push('?');
			url.push_str(&query.to_query_string()?);
		}
		Ok(url)
	}
}
