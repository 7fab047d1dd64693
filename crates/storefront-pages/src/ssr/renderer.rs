//! Per-request server renderer.

use std::sync::Arc;

use storefront_urls::{PageId, RouterTable};

use super::head::PageHead;
use super::state::HydrationPayload;
use crate::loader::PageLoader;
use crate::markup::MarkupRenderer;
use crate::store::{StoreError, StoreSet};

/// Placeholder replaced with the rendered head elements.
pub const HEAD_PLACEHOLDER: &str = "<!--app-head-->";

/// Placeholder replaced with the rendered body markup.
pub const HTML_PLACEHOLDER: &str = "<!--app-html-->";

/// Errors raised while rendering a request.
///
/// Catalog failures are not errors here: they end up in the product store's
/// `error` field and are rendered like any other state.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// A store rejected a dispatch.
	#[error(transparent)]
	Store(#[from] StoreError),
	/// The initial data could not be serialized.
	#[error("failed to serialize initial data: {0}")]
	Payload(#[from] serde_json::Error),
	/// The document template lacks a required placeholder.
	#[error("template is missing the `{0}` placeholder")]
	MissingPlaceholder(&'static str),
}

/// Options for SSR rendering.
#[derive(Debug, Clone)]
pub struct SsrOptions {
	/// Whether to include the initial-data script.
	pub include_state_script: bool,
	/// Language attribute for the HTML element of the default template.
	pub lang: String,
}

impl Default for SsrOptions {
	fn default() -> Self {
		Self {
			include_state_script: true,
			lang: "ko".to_string(),
		}
	}
}

impl SsrOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the language.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}

	/// Disables the initial-data script.
	pub fn no_hydration(mut self) -> Self {
		self.include_state_script = false;
		self
	}
}

/// Result of rendering one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
	/// Resolved page.
	pub page_id: PageId,
	/// Body markup.
	pub markup: String,
	/// Head computed from the same state as the markup.
	pub head: PageHead,
	/// State for the client to hydrate from, `None` for pages without data.
	pub initial_data: Option<HydrationPayload>,
}

/// The server renderer.
///
/// Holds only immutable configuration; every call to
/// [`render`](Self::render) builds its own stores, so concurrent requests
/// never observe each other's state.
#[derive(Clone)]
pub struct SsrRenderer {
	router: Arc<RouterTable>,
	loader: PageLoader,
	markup: Arc<dyn MarkupRenderer>,
	options: SsrOptions,
}

impl std::fmt::Debug for SsrRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SsrRenderer")
			.field("router", &self.router)
			.field("loader", &self.loader)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

impl SsrRenderer {
	/// Creates a renderer with default options.
	pub fn new(
		router: Arc<RouterTable>,
		loader: PageLoader,
		markup: Arc<dyn MarkupRenderer>,
	) -> Self {
		Self::with_options(router, loader, markup, SsrOptions::default())
	}

	/// Creates a renderer with custom options.
	pub fn with_options(
		router: Arc<RouterTable>,
		loader: PageLoader,
		markup: Arc<dyn MarkupRenderer>,
		options: SsrOptions,
	) -> Self {
		Self {
			router,
			loader,
			markup,
			options,
		}
	}

	/// Returns the renderer options.
	pub fn options(&self) -> &SsrOptions {
		&self.options
	}

	/// Renders `url` with a fresh set of server stores.
	pub async fn render(&self, url: &str) -> Result<RenderOutput, RenderError> {
		let stores = StoreSet::server();
		let route = self.router.resolve(url);
		tracing::debug!(url, page = ?route.page_id, "server render");

		let data = self.loader.fetch(&route).await;
		data.apply(&stores)?;

		let snapshot = stores.snapshot();
		let markup = self.markup.render(&route, &snapshot);
		let head = PageHead::for_page(route.page_id, &snapshot.product);
		let initial_data = if self.options.include_state_script {
			HydrationPayload::from_state(route.page_id, &snapshot.product)
		} else {
			None
		};

		Ok(RenderOutput {
			page_id: route.page_id,
			markup,
			head,
			initial_data,
		})
	}

	/// Renders `url` into the default document shell.
	pub async fn render_page(&self, url: &str) -> Result<String, RenderError> {
		let output = self.render(url).await?;
		render_document(&default_template(&self.options.lang), &output)
	}
}

/// Minimal HTML shell carrying both placeholders.
pub fn default_template(lang: &str) -> String {
	format!(
		"<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"UTF-8\">\n\
		 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
		 {}\n</head>\n<body>\n<div id=\"root\">{}</div>\n</body>\n</html>",
		super::head::html_escape(lang),
		HEAD_PLACEHOLDER,
		HTML_PLACEHOLDER
	)
}

/// Fills `template` with a render result.
///
/// The head placeholder is optional. The initial-data script goes right
/// before `</body>`, or at the end when the template has no body tag.
pub fn render_document(template: &str, output: &RenderOutput) -> Result<String, RenderError> {
	if !template.contains(HTML_PLACEHOLDER) {
		return Err(RenderError::MissingPlaceholder(HTML_PLACEHOLDER));
	}

	let mut html = template
		.replace(HEAD_PLACEHOLDER, &output.head.to_html())
		.replace(HTML_PLACEHOLDER, &output.markup);

	if let Some(payload) = &output.initial_data {
		let script = payload.to_script_tag()?;
		match html.rfind("</body>") {
			Some(index) => html.insert_str(index, &format!("{}\n", script)),
			None => html.push_str(&script),
		}
	}
	Ok(html)
}
