//! Document head derived from the resolved page and product state.

use storefront_urls::PageId;

use crate::store::ProductState;

/// Suffix appended to every page title.
pub const SITE_NAME: &str = "Shopping Mall";

/// `<head>` contents for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHead {
	/// Unescaped document title.
	pub title: String,
	/// Unescaped meta description.
	pub description: Option<String>,
}

impl PageHead {
	/// Computes the head from the same state the markup was rendered from.
	pub fn for_page(page: PageId, state: &ProductState) -> Self {
		match page {
			PageId::Home => Self {
				title: format!("{} - Home", SITE_NAME),
				description: None,
			},
			PageId::ProductDetail => match &state.current_product {
				Some(product) => Self {
					title: format!("{} - {}", product.title, SITE_NAME),
					description: Some(product.title.clone()),
				},
				None => Self::not_found(),
			},
			PageId::NotFound => Self::not_found(),
		}
	}

	fn not_found() -> Self {
		Self {
			title: format!("Page Not Found - {}", SITE_NAME),
			description: None,
		}
	}

	/// Renders escaped head elements.
	pub fn to_html(&self) -> String {
		let mut html = format!("<title>{}</title>", html_escape(&self.title));
		if let Some(description) = &self.description {
			html.push_str(&format!(
				"\n<meta name=\"description\" content=\"{}\">",
				html_escape(description)
			));
		}
		html
	}
}

/// Simple HTML escape function.
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
