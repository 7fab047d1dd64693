//! Error types for pattern compilation and route resolution.

use crate::router::PageId;

/// Error raised while compiling a route pattern.
///
/// These are configuration errors: they surface when a route is registered at
/// startup and never while a request or navigation is being resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
	/// The pattern exceeds the maximum length.
	#[error("pattern length {len} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		len: usize,
		/// Maximum length in bytes.
		max: usize,
	},
	/// The pattern has too many segments.
	#[error("pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Maximum segment count.
		max: usize,
	},
	/// The pattern does not start with `/`.
	#[error("pattern `{0}` must start with `/`")]
	MissingLeadingSlash(String),
	/// A parameter marker is not followed by a name.
	#[error("pattern `{pattern}` has an unterminated parameter marker in segment {segment}")]
	UnterminatedParameter {
		/// The offending pattern.
		pattern: String,
		/// Zero-based segment index (the leading empty segment is index 0).
		segment: usize,
	},
	/// A parameter name contains characters outside `[A-Za-z0-9_]`.
	#[error("pattern `{pattern}` has invalid parameter name `{name}`")]
	InvalidParameterName {
		/// The offending pattern.
		pattern: String,
		/// The rejected name.
		name: String,
	},
	/// The same parameter name appears twice.
	#[error("pattern `{pattern}` declares parameter `{name}` more than once")]
	DuplicateParameter {
		/// The offending pattern.
		pattern: String,
		/// The repeated name.
		name: String,
	},
	/// The generated regex failed to build.
	#[error("failed to compile pattern `{pattern}`: {message}")]
	Regex {
		/// The offending pattern.
		pattern: String,
		/// Message from the regex engine.
		message: String,
	},
}

/// Error type for router table operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// A route was registered with a malformed pattern.
	#[error("invalid route pattern: {0}")]
	InvalidPattern(#[from] PatternError),
	/// No registered route serves the requested page.
	#[error("no route registered for page {0:?}")]
	NoRouteForPage(PageId),
	/// A parameter needed to build a URL was not supplied.
	#[error("missing parameter `{name}` for route `{pattern}`")]
	MissingParameter {
		/// Pattern being reversed.
		pattern: String,
		/// Name of the missing parameter.
		name: String,
	},
	/// Query parameters could not be encoded.
	#[error("failed to encode query string: {0}")]
	QueryEncoding(String),
}
