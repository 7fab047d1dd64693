//! In-memory collaborators for tests and demos.
//!
//! - [`MemoryCatalog`]: a [`CatalogQuery`] over a fixed product list with
//!   filtering, sorting and pagination, plus hooks to delay or fail queries
//! - [`PlainMarkup`]: a minimal [`MarkupRenderer`]
//! - [`sample_products`]: a small fixed dataset

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storefront_urls::{PageId, RouteMatch};

use crate::api::{
	CatalogError, CatalogQuery, Categories, Pagination, Product, ProductPage, ProductQuery,
	SortOrder,
};
use crate::markup::MarkupRenderer;
use crate::ssr::html_escape;
use crate::store::StoreSnapshot;

/// Shared count of catalog queries served.
#[derive(Debug, Clone, Default)]
pub struct QueryCounter(Arc<AtomicUsize>);

impl QueryCounter {
	/// Number of queries so far.
	pub fn get(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}

	fn bump(&self) {
		self.0.fetch_add(1, Ordering::SeqCst);
	}
}

/// Catalog backed by a product list held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
	products: Vec<Product>,
	queries: QueryCounter,
	failing: AtomicBool,
	detail_delays: HashMap<String, Duration>,
	listing_delay: Option<Duration>,
}

impl MemoryCatalog {
	/// Creates a catalog over `products`.
	pub fn new(products: Vec<Product>) -> Self {
		Self {
			products,
			..Self::default()
		}
	}

	/// Delays lookups of product `id` by `delay`.
	pub fn with_detail_delay(mut self, id: impl Into<String>, delay: Duration) -> Self {
		self.detail_delays.insert(id.into(), delay);
		self
	}

	/// Delays listing queries by `delay`.
	pub fn with_listing_delay(mut self, delay: Duration) -> Self {
		self.listing_delay = Some(delay);
		self
	}

	/// Makes every following query fail with [`CatalogError::Unavailable`].
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	/// Handle observing how many queries were served.
	pub fn query_counter(&self) -> QueryCounter {
		self.queries.clone()
	}

	async fn begin(&self, delay: Option<Duration>) -> Result<(), CatalogError> {
		self.queries.bump();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		if self.failing.load(Ordering::SeqCst) {
			return Err(CatalogError::Unavailable("memory catalog set to fail".to_string()));
		}
		Ok(())
	}
}

#[async_trait]
impl CatalogQuery for MemoryCatalog {
	async fn query_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
		self.begin(self.listing_delay).await?;

		let search = query.search.as_deref().map(str::to_lowercase);
		let mut matched: Vec<&Product> = self
			.products
			.iter()
			.filter(|p| {
				search
					.as_deref()
					.is_none_or(|s| p.title.to_lowercase().contains(s))
			})
			.filter(|p| query.category1.as_deref().is_none_or(|c| p.category1 == c))
			.filter(|p| query.category2.as_deref().is_none_or(|c| p.category2 == c))
			.collect();

		match query.sort {
			SortOrder::PriceAsc => matched.sort_by_key(|p| p.lprice),
			SortOrder::PriceDesc => matched.sort_by(|a, b| b.lprice.cmp(&a.lprice)),
			SortOrder::NameAsc => matched.sort_by(|a, b| a.title.cmp(&b.title)),
			SortOrder::NameDesc => matched.sort_by(|a, b| b.title.cmp(&a.title)),
		}

		let total = matched.len() as u64;
		let limit = query.limit.max(1);
		let total_pages = u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
		let start = (query.page.saturating_sub(1) as usize).saturating_mul(limit as usize);
		let items = matched
			.into_iter()
			.skip(start)
			.take(limit as usize)
			.cloned()
			.collect();

		Ok(ProductPage {
			items,
			pagination: Pagination {
				page: query.page,
				limit,
				total,
				total_pages,
				has_next: query.page < total_pages,
				has_prev: query.page > 1,
			},
		})
	}

	async fn query_categories(&self) -> Result<Categories, CatalogError> {
		self.begin(None).await?;
		let mut categories = Categories::new();
		for product in &self.products {
			if product.category1.is_empty() {
				continue;
			}
			let children = categories.entry(product.category1.clone()).or_default();
			if !product.category2.is_empty() {
				children.insert(product.category2.clone());
			}
		}
		Ok(categories)
	}

	async fn query_product_by_id(&self, id: &str) -> Result<Option<Product>, CatalogError> {
		self.begin(self.detail_delays.get(id).copied()).await?;
		Ok(self.products.iter().find(|p| p.product_id == id).cloned())
	}

	async fn query_related_products(
		&self,
		id: &str,
		limit: usize,
	) -> Result<Vec<Product>, CatalogError> {
		self.begin(None).await?;
		let Some(base) = self.products.iter().find(|p| p.product_id == id) else {
			return Ok(Vec::new());
		};
		Ok(self
			.products
			.iter()
			.filter(|p| p.product_id != id && p.category2 == base.category2)
			.take(limit)
			.cloned()
			.collect())
	}
}

/// Minimal semantic markup for every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl MarkupRenderer for PlainMarkup {
	fn render(&self, route: &RouteMatch, snapshot: &StoreSnapshot) -> String {
		let product = &snapshot.product;
		let mut html = format!(
			"<header><a href=\"/\">Shopping Mall</a><span class=\"cart-count\">{}</span></header>",
			snapshot.cart.item_count()
		);

		if let Some(error) = &product.error {
			html.push_str(&format!("<p class=\"error\">{}</p>", html_escape(error)));
		}

		match route.page_id {
			PageId::Home => {
				html.push_str(&format!(
					"<main data-page=\"home\"><p class=\"total\">{}</p><ul class=\"products\">",
					product.total_count
				));
				for item in &product.products {
					html.push_str(&product_card(item));
				}
				html.push_str("</ul></main>");
			}
			PageId::ProductDetail => {
				html.push_str("<main data-page=\"product-detail\">");
				if let Some(current) = &product.current_product {
					html.push_str(&format!(
						"<article data-product-id=\"{}\"><h1>{}</h1><p class=\"price\">{}</p></article>",
						html_escape(&current.product_id),
						html_escape(&current.title),
						current.lprice
					));
				}
				html.push_str("<ul class=\"related\">");
				for item in &product.related_products {
					html.push_str(&product_card(item));
				}
				html.push_str("</ul></main>");
			}
			PageId::NotFound => {
				html.push_str("<main data-page=\"not-found\"><h1>404</h1></main>");
			}
		}
		html
	}
}

fn product_card(product: &Product) -> String {
	format!(
		"<li data-product-id=\"{}\"><a href=\"/product/{}/\">{}</a><span>{}</span></li>",
		html_escape(&product.product_id),
		html_escape(&product.product_id),
		html_escape(&product.title),
		product.lprice
	)
}

/// A small fixed product dataset.
pub fn sample_products() -> Vec<Product> {
	let rows = [
		("85067212996", "Apple Fuji 2kg", 12900, "food", "fruit"),
		("86940857379", "Banana Bundle", 4900, "food", "fruit"),
		("82094468339", "Pear Gift Box", 32000, "food", "fruit"),
		("11111111111", "Cherry Tomato 1kg", 8900, "food", "vegetable"),
		("22222222222", "Wireless Earbuds", 89000, "digital", "audio"),
		("33333333333", "Bluetooth Speaker", 45000, "digital", "audio"),
	];
	rows.into_iter()
		.map(|(id, title, price, category1, category2)| Product {
			product_id: id.to_string(),
			title: title.to_string(),
			image: format!("https://shopping-phinf.example/{}.jpg", id),
			link: format!("https://search.example/catalog/{}", id),
			lprice: price,
			hprice: 0,
			mall_name: "Example Mall".to_string(),
			brand: String::new(),
			category1: category1.to_string(),
			category2: category2.to_string(),
		})
		.collect()
}
