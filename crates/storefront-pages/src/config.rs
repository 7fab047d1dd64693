//! Site settings
//!
//! Settings come from an optional TOML file and are then overridden by
//! `STOREFRONT_`-prefixed environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `STOREFRONT_BASE_PATH` | `base_path` |
//! | `STOREFRONT_MODE` | `mode` |
//! | `STOREFRONT_PAGE_SIZE` | `page_size` |
//! | `STOREFRONT_RELATED_LIMIT` | `related_limit` |
//! | `STOREFRONT_LANG` | `lang` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_urls::{RouterError, RouterTable};

use crate::api::{CatalogQuery, DEFAULT_PAGE_SIZE, DEFAULT_RELATED_LIMIT};
use crate::loader::PageLoader;
use crate::ssr::SsrOptions;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The settings file could not be read.
	#[error("failed to read settings file {path}: {source}")]
	Io {
		/// File path.
		path: PathBuf,
		/// Underlying error.
		source: std::io::Error,
	},
	/// The settings file is not valid TOML for [`SiteSettings`].
	#[error("invalid settings: {0}")]
	Parse(#[from] toml::de::Error),
	/// An environment override has an unusable value.
	#[error("invalid value for {key}: {message}")]
	InvalidEnv {
		/// Full variable name.
		key: String,
		/// Why the value was rejected.
		message: String,
	},
	/// A setting failed validation.
	#[error("invalid setting `{field}`: {message}")]
	Invalid {
		/// Field name.
		field: &'static str,
		/// Why the value was rejected.
		message: String,
	},
	/// The route table could not be built.
	#[error(transparent)]
	Router(#[from] RouterError),
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// Local development.
	#[default]
	Development,
	/// Production deployment.
	Production,
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Development => f.write_str("development"),
			Self::Production => f.write_str("production"),
		}
	}
}

impl FromStr for Mode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"development" | "dev" => Ok(Self::Development),
			"production" | "prod" => Ok(Self::Production),
			other => Err(format!("unknown mode `{}`", other)),
		}
	}
}

/// Storefront settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
	/// Deployment prefix stripped before routing, e.g. `/shop`.
	pub base_path: String,
	/// Deployment mode.
	pub mode: Mode,
	/// Listing page size when the URL has no `limit`.
	pub page_size: u32,
	/// Related products shown on a detail page.
	pub related_limit: usize,
	/// Document language.
	pub lang: String,
}

impl Default for SiteSettings {
	fn default() -> Self {
		Self {
			base_path: String::new(),
			mode: Mode::default(),
			page_size: DEFAULT_PAGE_SIZE,
			related_limit: DEFAULT_RELATED_LIMIT,
			lang: "ko".to_string(),
		}
	}
}

impl SiteSettings {
	/// Parses settings from TOML. Missing fields take their defaults.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let settings: Self = toml::from_str(raw)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&raw)
	}

	/// Loads settings from an optional file, then applies process
	/// environment overrides.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env_with(|key| std::env::var(key).ok())
	}

	/// Applies `STOREFRONT_*` overrides read through `lookup`.
	pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| {
			let key = format!("{}{}", ENV_PREFIX, name);
			lookup(&key).map(|value| (key, value))
		};

		if let Some((_, value)) = var("BASE_PATH") {
			self.base_path = value;
		}
		if let Some((key, value)) = var("MODE") {
			self.mode = value
				.parse()
				.map_err(|message| ConfigError::InvalidEnv { key, message })?;
		}
		if let Some((key, value)) = var("PAGE_SIZE") {
			self.page_size = value.trim().parse().map_err(|e: std::num::ParseIntError| {
				ConfigError::InvalidEnv {
					key,
					message: e.to_string(),
				}
			})?;
		}
		if let Some((key, value)) = var("RELATED_LIMIT") {
			self.related_limit = value.trim().parse().map_err(|e: std::num::ParseIntError| {
				ConfigError::InvalidEnv {
					key,
					message: e.to_string(),
				}
			})?;
		}
		if let Some((_, value)) = var("LANG") {
			self.lang = value;
		}

		self.validate()?;
		tracing::debug!(base_path = %self.base_path, mode = %self.mode, "settings loaded");
		Ok(self)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.page_size == 0 {
			return Err(ConfigError::Invalid {
				field: "page_size",
				message: "must be at least 1".to_string(),
			});
		}
		if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
			return Err(ConfigError::Invalid {
				field: "base_path",
				message: format!("`{}` must start with `/`", self.base_path),
			});
		}
		Ok(())
	}

	/// Whether this is a production deployment.
	pub fn is_production(&self) -> bool {
		self.mode == Mode::Production
	}

	/// Builds the storefront route table under `base_path`.
	pub fn router(&self) -> Result<RouterTable, ConfigError> {
		Ok(RouterTable::storefront()?.with_base_path(&self.base_path))
	}

	/// Builds a page loader over `catalog`.
	pub fn loader(&self, catalog: Arc<dyn CatalogQuery>) -> PageLoader {
		PageLoader::new(catalog)
			.with_page_size(self.page_size)
			.with_related_limit(self.related_limit)
	}

	/// Renderer options.
	pub fn ssr_options(&self) -> SsrOptions {
		SsrOptions::new().lang(self.lang.clone())
	}
}
