//! Path pattern compilation and matching.
//!
//! A pattern is a `/`-separated path where any segment starting with `:`
//! captures exactly one non-empty path segment:
//!
//! - `/` - the root path only
//! - `/product/:id/` - one parameter, trailing slash required
//! - `/a/:x/b/:y` - several parameters, no trailing slash
//!
//! Matching is case-sensitive and exact on segment count, so a trailing
//! separator in the pattern is significant.

use std::collections::HashMap;

use crate::error::PatternError;

/// Character that marks a segment as a named parameter.
pub const PARAM_MARKER: char = ':';

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for the compiled regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex, anchored on both ends.
	regex: regex::Regex,
	/// Parameter names in declaration order.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] when the pattern is malformed: it does not
	/// start with `/`, has a bare `:` marker, uses a parameter name outside
	/// `[A-Za-z0-9_]`, repeats a name, or exceeds the length/segment limits.
	pub fn compile(pattern: &str) -> Result<Self, PatternError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				len: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}
		if !pattern.starts_with('/') {
			return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let (regex_str, param_names) = compile_segments(pattern)?;

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex {
				pattern: pattern.to_string(),
				message: e.to_string(),
			})?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether the pattern has no parameters.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Matches a path, returning the captured values aligned with
	/// [`param_names`](Self::param_names).
	pub fn captures(&self, path: &str) -> Option<Vec<String>> {
		let caps = self.regex.captures(path)?;
		Some(
			caps.iter()
				.skip(1)
				.flatten()
				.map(|m| m.as_str().to_string())
				.collect(),
		)
	}

	/// Matches a path, returning parameters keyed by name.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.captures(path).map(|values| {
			self.param_names
				.iter()
				.cloned()
				.zip(values)
				.collect()
		})
	}

	/// Checks if this pattern matches the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Builds a concrete path by substituting parameter values.
	///
	/// Returns `None` when a parameter is missing or its value is empty or
	/// contains `/` (the result would not match this pattern again).
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut segments = Vec::new();
		for segment in self.pattern.split('/') {
			match segment.strip_prefix(PARAM_MARKER) {
				Some(name) => {
					let value = params.get(name)?;
					if value.is_empty() || value.contains('/') {
						return None;
					}
					segments.push(value.as_str());
				}
				None => segments.push(segment),
			}
		}
		Some(segments.join("/"))
	}
}

/// Translates pattern segments into an anchored regex and collects names.
fn compile_segments(pattern: &str) -> Result<(String, Vec<String>), PatternError> {
	let mut regex_str = String::from("^");
	let mut param_names: Vec<String> = Vec::new();

	for (index, segment) in pattern.split('/').enumerate() {
		if index > 0 {
			regex_str.push('/');
		}

		let Some(name) = segment.strip_prefix(PARAM_MARKER) else {
			regex_str.push_str(&regex::escape(segment));
			continue;
		};

		if name.is_empty() {
			return Err(PatternError::UnterminatedParameter {
				pattern: pattern.to_string(),
				segment: index,
			});
		}
		if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(PatternError::InvalidParameterName {
				pattern: pattern.to_string(),
				name: name.to_string(),
			});
		}
		if param_names.iter().any(|existing| existing == name) {
			return Err(PatternError::DuplicateParameter {
				pattern: pattern.to_string(),
				name: name.to_string(),
			});
		}

		param_names.push(name.to_string());
		regex_str.push_str("([^/]+)");
	}

	regex_str.push('$');
	Ok((regex_str, param_names))
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
