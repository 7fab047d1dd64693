//! Page data loading shared by the server renderer and client navigation.

use std::sync::Arc;

use storefront_urls::{PageId, RouteMatch};

use crate::api::{
	CatalogError, CatalogQuery, Categories, DEFAULT_PAGE_SIZE, DEFAULT_RELATED_LIMIT, Product,
	ProductQuery,
};
use crate::store::{ProductAction, StoreError, StoreSet};

/// Data loaded for one resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageData {
	/// Listing page data.
	Listing {
		/// Listing page.
		products: Vec<Product>,
		/// Listing total.
		total_count: u64,
		/// Category tree.
		categories: Categories,
	},
	/// Detail page data.
	Detail {
		/// Detail product.
		product: Product,
		/// Related products.
		related: Vec<Product>,
	},
	/// Loading failed or the record does not exist.
	Failed(String),
	/// The page needs no data.
	Empty,
}

impl PageData {
	/// Product store actions that install this data.
	pub fn actions(&self) -> Vec<ProductAction> {
		match self {
			Self::Listing {
				products,
				total_count,
				categories,
			} => vec![
				ProductAction::SetProducts {
					products: products.clone(),
					total_count: *total_count,
				},
				ProductAction::SetCategories(categories.clone()),
			],
			Self::Detail { product, related } => vec![
				ProductAction::SetCurrentProduct(product.clone()),
				ProductAction::SetRelatedProducts(related.clone()),
			],
			Self::Failed(message) => vec![ProductAction::SetError(message.clone())],
			Self::Empty => vec![ProductAction::ClearCurrentProduct],
		}
	}

	/// Dispatches [`actions`](Self::actions) into `stores`.
	pub fn apply(&self, stores: &StoreSet) -> Result<(), StoreError> {
		for action in self.actions() {
			stores.dispatch(action)?;
		}
		Ok(())
	}

	/// Whether this is a failure.
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed(_))
	}
}

/// Fetches page data from the catalog.
#[derive(Clone)]
pub struct PageLoader {
	catalog: Arc<dyn CatalogQuery>,
	page_size: u32,
	related_limit: usize,
}

impl std::fmt::Debug for PageLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PageLoader")
			.field("page_size", &self.page_size)
			.field("related_limit", &self.related_limit)
			.finish_non_exhaustive()
	}
}

impl PageLoader {
	/// Creates a loader with default page size and related limit.
	pub fn new(catalog: Arc<dyn CatalogQuery>) -> Self {
		Self {
			catalog,
			page_size: DEFAULT_PAGE_SIZE,
			related_limit: DEFAULT_RELATED_LIMIT,
		}
	}

	/// Sets the listing page size used when the URL has no `limit`.
	pub fn with_page_size(mut self, page_size: u32) -> Self {
		self.page_size = page_size.max(1);
		self
	}

	/// Sets the number of related products loaded on a detail page.
	pub fn with_related_limit(mut self, related_limit: usize) -> Self {
		self.related_limit = related_limit;
		self
	}

	/// Default listing page size.
	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	/// The catalog this loader queries.
	pub fn catalog(&self) -> &Arc<dyn CatalogQuery> {
		&self.catalog
	}

	/// Loads the data for `route`.
	///
	/// Never fails: catalog errors and missing records come back as
	/// [`PageData::Failed`].
	pub async fn fetch(&self, route: &RouteMatch) -> PageData {
		let result = match route.page_id {
			PageId::Home => self.fetch_listing(route).await,
			PageId::ProductDetail => self.fetch_detail(route).await,
			PageId::NotFound => Ok(PageData::Empty),
		};
		result.unwrap_or_else(|error| {
			tracing::warn!(path = %route.path, %error, "page data load failed");
			PageData::Failed(error.to_string())
		})
	}

	async fn fetch_listing(&self, route: &RouteMatch) -> Result<PageData, CatalogError> {
		let query = ProductQuery::from_query(&route.query, self.page_size);
		let (page, categories) = tokio::join!(
			self.catalog.query_products(&query),
			self.catalog.query_categories()
		);
		let page = page?;
		Ok(PageData::Listing {
			total_count: page.pagination.total,
			products: page.items,
			categories: categories?,
		})
	}

	async fn fetch_detail(&self, route: &RouteMatch) -> Result<PageData, CatalogError> {
		let Some(id) = route.param("id") else {
			return Ok(PageData::Failed("missing product id".to_string()));
		};
		let Some(product) = self.catalog.query_product_by_id(id).await? else {
			return Ok(PageData::Failed(format!("product `{}` not found", id)));
		};
		let related = self
			.catalog
			.query_related_products(id, self.related_limit)
			.await?;
		Ok(PageData::Detail { product, related })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MemoryCatalog, sample_products};
	use rstest::rstest;
	use storefront_urls::RouterTable;

	fn loader(catalog: MemoryCatalog) -> PageLoader {
		PageLoader::new(Arc::new(catalog))
	}

	fn resolve(url: &str) -> RouteMatch {
		RouterTable::storefront().unwrap().resolve(url)
	}

	#[rstest]
	#[tokio::test]
	async fn test_listing_uses_query_parameters() {
		let loader = loader(MemoryCatalog::new(sample_products()));
		let data = loader.fetch(&resolve("/?limit=2&sort=price_desc")).await;

		let PageData::Listing {
			products,
			total_count,
			categories,
		} = data
		else {
			panic!("expected listing, got {:?}", data);
		};
		assert_eq!(products.len(), 2);
		assert_eq!(total_count, sample_products().len() as u64);
		assert!(products[0].lprice >= products[1].lprice);
		assert!(!categories.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_detail_loads_related() {
		let catalog = MemoryCatalog::new(sample_products());
		let id = sample_products()[0].product_id.clone();
		let data = loader(catalog).fetch(&resolve(&format!("/product/{}/", id))).await;

		let PageData::Detail { product, related } = data else {
			panic!("expected detail, got {:?}", data);
		};
		assert_eq!(product.product_id, id);
		assert!(related.iter().all(|p| p.product_id != id));
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_product_is_failure() {
		let data = loader(MemoryCatalog::new(sample_products()))
			.fetch(&resolve("/product/does-not-exist/"))
			.await;
		assert_eq!(
			data,
			PageData::Failed("product `does-not-exist` not found".to_string())
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_catalog_error_is_failure() {
		let catalog = MemoryCatalog::new(sample_products());
		catalog.set_failing(true);
		let data = loader(catalog).fetch(&resolve("/")).await;
		assert!(data.is_failed());
	}

	#[rstest]
	#[tokio::test]
	async fn test_not_found_page_needs_no_data() {
		let catalog = MemoryCatalog::new(sample_products());
		let counter = catalog.query_counter();
		let data = loader(catalog).fetch(&resolve("/nowhere")).await;

		assert_eq!(data, PageData::Empty);
		assert_eq!(counter.get(), 0);
	}

	#[rstest]
	fn test_apply_failure_sets_error() {
		let stores = StoreSet::server();
		PageData::Failed("boom".to_string()).apply(&stores).unwrap();

		let state = stores.product.get_state();
		assert_eq!(state.error.as_deref(), Some("boom"));
		assert!(!state.loading);
	}
}
