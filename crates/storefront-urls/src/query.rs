//! URL splitting and query-string parameters.

use std::collections::BTreeMap;

use crate::error::RouterError;

/// Splits a URL into its path and raw query string.
///
/// Any `#fragment` is discarded first, then the remainder is split at the
/// first `?`. A URL without a query yields an empty query string.
pub fn split_url(url: &str) -> (&str, &str) {
	let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
	without_fragment
		.split_once('?')
		.unwrap_or((without_fragment, ""))
}

/// Decoded query parameters.
///
/// Keys are unique: when a raw query repeats a key, the last occurrence
/// wins. Iteration and encoding order is sorted by key so that equal
/// parameter sets always produce the same URL on server and client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a raw (undecoded) query string, without the leading `?`.
	///
	/// Malformed input never fails resolution: undecodable input is logged
	/// and treated as an empty query.
	pub fn parse(raw: &str) -> Self {
		if raw.is_empty() {
			return Self::new();
		}
		match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
			Ok(pairs) => pairs.into_iter().collect(),
			Err(e) => {
				tracing::warn!(query = raw, error = %e, "ignoring undecodable query string");
				Self::new()
			}
		}
	}

	/// Returns the value for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Sets `key` to `value`, replacing any previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Builder-style [`insert`](Self::insert).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);
		self
	}

	/// Removes `key`, returning its value.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}

	/// Returns the number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns whether there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates parameters in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Encodes the parameters as `application/x-www-form-urlencoded`,
	/// without the leading `?`.
	pub fn to_query_string(&self) -> Result<String, RouterError> {
		serde_urlencoded::to_string(&self.0).map_err(|e| RouterError::QueryEncoding(e.to_string()))
	}
}

impl FromIterator<(String, String)> for QueryParams {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		let mut params = Self::new();
		for (key, value) in iter {
			params.insert(key, value);
		}
		params
	}
}
