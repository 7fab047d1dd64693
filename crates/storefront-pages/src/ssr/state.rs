//! Initial-data payload handed from the server render to the client stores.
//!
//! The payload is the minimal product-state subset the resolved page needs.
//! It is embedded in the document as
//! `window.__INITIAL_DATA__ = {...};` and read back exactly once during
//! hydration.

use serde::{Deserialize, Serialize};
use storefront_urls::PageId;

use crate::api::{Categories, Product};
use crate::store::{ProductSetup, ProductState};

/// The global JavaScript variable carrying the payload.
pub const INITIAL_DATA_VAR: &str = "__INITIAL_DATA__";

/// Serialized product state for one rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum HydrationPayload {
	/// Listing page data.
	#[serde(rename_all = "camelCase")]
	Home {
		/// Listing page.
		products: Vec<Product>,
		/// Listing total.
		total_count: u64,
		/// Category tree.
		categories: Categories,
		/// Error recorded while loading.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		error: Option<String>,
	},
	/// Detail page data.
	#[serde(rename_all = "camelCase")]
	ProductDetail {
		/// Detail product, absent when the lookup failed.
		current_product: Option<Product>,
		/// Related products.
		related_products: Vec<Product>,
		/// Error recorded while loading.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		error: Option<String>,
	},
}

impl HydrationPayload {
	/// Extracts the subset of `state` relevant to `page`.
	///
	/// The not-found page carries no data and yields `None`.
	pub fn from_state(page: PageId, state: &ProductState) -> Option<Self> {
		match page {
			PageId::Home => Some(Self::Home {
				products: state.products.clone(),
				total_count: state.total_count,
				categories: state.categories.clone(),
				error: state.error.clone(),
			}),
			PageId::ProductDetail => Some(Self::ProductDetail {
				current_product: state.current_product.clone(),
				related_products: state.related_products.clone(),
				error: state.error.clone(),
			}),
			PageId::NotFound => None,
		}
	}

	/// Page this payload belongs to.
	pub fn page_id(&self) -> PageId {
		match self {
			Self::Home { .. } => PageId::Home,
			Self::ProductDetail { .. } => PageId::ProductDetail,
		}
	}

	/// Converts the payload into the product store setup action payload.
	pub fn into_setup(self) -> ProductSetup {
		match self {
			Self::Home {
				products,
				total_count,
				categories,
				error,
			} => ProductSetup {
				products: Some(products),
				total_count: Some(total_count),
				categories: Some(categories),
				error,
				..ProductSetup::default()
			},
			Self::ProductDetail {
				current_product,
				related_products,
				error,
			} => ProductSetup {
				current_product,
				related_products: Some(related_products),
				error,
				..ProductSetup::default()
			},
		}
	}

	/// Serializes the payload to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Deserializes a payload from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Generates the `<script>` tag assigning the payload to
	/// `window.__INITIAL_DATA__`.
	pub fn to_script_tag(&self) -> Result<String, serde_json::Error> {
		let json = escape_json_for_script(&self.to_json()?);
		Ok(format!(
			"<script>window.{} = {};</script>",
			INITIAL_DATA_VAR, json
		))
	}
}

/// Finds the JSON assigned to `window.__INITIAL_DATA__` in a rendered
/// document.
pub fn extract_initial_data(document: &str) -> Option<&str> {
	let marker = format!("window.{} = ", INITIAL_DATA_VAR);
	let start = document.find(&marker)? + marker.len();
	let rest = &document[start..];
	let end = rest.find(";</script>")?;
	Some(rest[..end].trim())
}

/// Escapes JSON for embedding in a `<script>` element.
///
/// `</` becomes `<\/` so that a `</script>` inside a string value cannot
/// close the element; JSON parsers read `\/` as `/`.
pub(crate) fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn product(id: &str, title: &str) -> Product {
		Product {
			product_id: id.to_string(),
			title: title.to_string(),
			image: String::new(),
			link: String::new(),
			lprice: 500,
			hprice: 0,
			mall_name: String::new(),
			brand: String::new(),
			category1: String::new(),
			category2: String::new(),
		}
	}

	#[rstest]
	fn test_not_found_has_no_payload() {
		assert_eq!(
			HydrationPayload::from_state(PageId::NotFound, &ProductState::default()),
			None
		);
	}

	#[rstest]
	fn test_detail_payload_wire_format() {
		let state = ProductState {
			current_product: Some(product("42", "Pear")),
			..ProductState::default()
		};
		let payload = HydrationPayload::from_state(PageId::ProductDetail, &state).unwrap();
		let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

		assert_eq!(json["page"], "productDetail");
		assert_eq!(json["currentProduct"]["productId"], "42");
		assert_eq!(json["relatedProducts"], serde_json::json!([]));
		assert!(json.get("error").is_none());
	}

	#[rstest]
	fn test_home_payload_becomes_listing_setup() {
		let state = ProductState {
			products: vec![product("1", "Apple")],
			total_count: 1,
			..ProductState::default()
		};
		let setup = HydrationPayload::from_state(PageId::Home, &state)
			.unwrap()
			.into_setup();

		assert_eq!(setup.products, Some(vec![product("1", "Apple")]));
		assert_eq!(setup.total_count, Some(1));
		assert_eq!(setup.current_product, None);
		assert_eq!(setup.related_products, None);
	}

	#[rstest]
	fn test_script_tag_escapes_closing_tags() {
		let state = ProductState {
			current_product: Some(product("x", "</script><script>alert(1)</script>")),
			..ProductState::default()
		};
		let payload = HydrationPayload::from_state(PageId::ProductDetail, &state).unwrap();
		let tag = payload.to_script_tag().unwrap();

		assert!(tag.starts_with("<script>window.__INITIAL_DATA__ = "));
		assert_eq!(tag.matches("</script>").count(), 1);

		let json = extract_initial_data(&tag).unwrap();
		assert_eq!(HydrationPayload::from_json(json).unwrap(), payload);
	}

	#[rstest]
	#[case("<html><body></body></html>")]
	#[case("<script>window.__INITIAL_DATA__ = {\"page\":\"home\"}</script>")]
	fn test_extract_without_payload(#[case] document: &str) {
		assert_eq!(extract_initial_data(document), None);
	}
}
