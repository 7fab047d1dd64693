//! Catalog data-query interface.
//!
//! The product dataset and its filter/sort/paginate logic live outside this
//! crate. Renderer and navigation controller only see the [`CatalogQuery`]
//! trait and do not care whether it is backed by memory, a file or the
//! network.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_urls::QueryParams;

/// Default number of products per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default number of related products shown on a detail page.
pub const DEFAULT_RELATED_LIMIT: usize = 20;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Unique product id.
	pub product_id: String,
	/// Display title.
	pub title: String,
	/// Image URL.
	#[serde(default)]
	pub image: String,
	/// Outbound product link.
	#[serde(default)]
	pub link: String,
	/// Lowest price.
	pub lprice: u64,
	/// Highest price, `0` when unknown.
	#[serde(default)]
	pub hprice: u64,
	/// Seller name.
	#[serde(default)]
	pub mall_name: String,
	/// Brand name.
	#[serde(default)]
	pub brand: String,
	/// Top-level category.
	#[serde(default)]
	pub category1: String,
	/// Second-level category.
	#[serde(default)]
	pub category2: String,
}

/// Category tree: top-level category to its second-level categories.
pub type Categories = BTreeMap<String, BTreeSet<String>>;

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
	/// Cheapest first.
	#[default]
	PriceAsc,
	/// Most expensive first.
	PriceDesc,
	/// Title A-Z.
	NameAsc,
	/// Title Z-A.
	NameDesc,
}

impl SortOrder {
	/// Returns the query-string value.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::PriceAsc => "price_asc",
			Self::PriceDesc => "price_desc",
			Self::NameAsc => "name_asc",
			Self::NameDesc => "name_desc",
		}
	}
}

impl fmt::Display for SortOrder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortOrder {
	type Err = CatalogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"price_asc" => Ok(Self::PriceAsc),
			"price_desc" => Ok(Self::PriceDesc),
			"name_asc" => Ok(Self::NameAsc),
			"name_desc" => Ok(Self::NameDesc),
			other => Err(CatalogError::InvalidQuery(format!("unknown sort `{}`", other))),
		}
	}
}

/// Listing query built from URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
	/// One-based page number.
	pub page: u32,
	/// Page size.
	pub limit: u32,
	/// Free-text title search.
	pub search: Option<String>,
	/// Top-level category filter.
	pub category1: Option<String>,
	/// Second-level category filter.
	pub category2: Option<String>,
	/// Sort order.
	pub sort: SortOrder,
}

impl Default for ProductQuery {
	fn default() -> Self {
		Self {
			page: 1,
			limit: DEFAULT_PAGE_SIZE,
			search: None,
			category1: None,
			category2: None,
			sort: SortOrder::default(),
		}
	}
}

impl ProductQuery {
	/// Reads `page`, `limit`, `search`, `category1`, `category2` and `sort`
	/// from URL query parameters.
	///
	/// Missing, empty or unparseable values fall back to defaults so that a
	/// hand-edited URL still renders a listing.
	pub fn from_query(query: &QueryParams, default_limit: u32) -> Self {
		let non_empty = |key: &str| {
			query
				.get(key)
				.filter(|value| !value.is_empty())
				.map(str::to_string)
		};

		let page = query
			.get("page")
			.and_then(|v| v.parse::<u32>().ok())
			.filter(|page| *page > 0)
			.unwrap_or(1);
		let limit = query
			.get("limit")
			.and_then(|v| v.parse::<u32>().ok())
			.filter(|limit| *limit > 0)
			.unwrap_or(default_limit);
		let sort = match query.get("sort") {
			Some(raw) => raw.parse::<SortOrder>().unwrap_or_else(|e| {
				tracing::debug!(error = %e, "falling back to default sort");
				SortOrder::default()
			}),
			None => SortOrder::default(),
		};

		Self {
			page,
			limit,
			search: non_empty("search"),
			category1: non_empty("category1"),
			category2: non_empty("category2"),
			sort,
		}
	}

	/// Encodes the query back into URL parameters, omitting defaults.
	pub fn to_query(&self, default_limit: u32) -> QueryParams {
		let mut params = QueryParams::new();
		if self.page != 1 {
			params.insert("page", self.page.to_string());
		}
		if self.limit != default_limit {
			params.insert("limit", self.limit.to_string());
		}
		if let Some(search) = &self.search {
			params.insert("search", search.clone());
		}
		if let Some(category1) = &self.category1 {
			params.insert("category1", category1.clone());
		}
		if let Some(category2) = &self.category2 {
			params.insert("category2", category2.clone());
		}
		if self.sort != SortOrder::default() {
			params.insert("sort", self.sort.as_str());
		}
		params
	}
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	/// One-based page number.
	pub page: u32,
	/// Page size.
	pub limit: u32,
	/// Total matching products.
	pub total: u64,
	/// Number of pages.
	pub total_pages: u32,
	/// Whether a next page exists.
	pub has_next: bool,
	/// Whether a previous page exists.
	pub has_prev: bool,
}

/// One page of listing results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
	/// Products on this page.
	pub items: Vec<Product>,
	/// Pagination metadata.
	pub pagination: Pagination,
}

/// Errors reported by a catalog implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
	/// The backing source could not be reached.
	#[error("catalog unavailable: {0}")]
	Unavailable(String),
	/// The query was rejected.
	#[error("invalid catalog query: {0}")]
	InvalidQuery(String),
}

/// Data-query collaborator consumed by the renderer and navigation controller.
#[async_trait]
pub trait CatalogQuery: Send + Sync {
	/// Returns one listing page.
	async fn query_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError>;

	/// Returns the category tree.
	async fn query_categories(&self) -> Result<Categories, CatalogError>;

	/// Returns a product by id, or `None` when it does not exist.
	async fn query_product_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError>;

	/// Returns up to `limit` products related to `id`, excluding `id` itself.
	async fn query_related_products(
		&self,
		id: &str,
		limit: usize,
	) -> Result<Vec<Product>, CatalogError>;
}
