use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::product::{
    NewProduct, Product, ProductLink, ProductListQuery, ProductSummary, UpdateProduct,
};
use crate::domain::visit::{NewVisit, VisitStats};

pub mod category;
pub mod errors;
pub mod product;
pub mod visit;

pub use errors::{RepositoryError, RepositoryResult};

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    link_base: String,
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    ///
    /// Product permalinks are relative until [`Self::with_link_base`] is called.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            link_base: String::new(),
        }
    }

    /// Prefix product permalinks with the public site URL.
    pub fn with_link_base(mut self, site_url: impl Into<String>) -> Self {
        self.link_base = site_url.into().trim_end_matches('/').to_string();
        self
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: &str) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn count_category_products(&self, id: &str) -> RepositoryResult<i64>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<String>;
    fn update_category(&self, id: &str, updates: &UpdateCategory) -> RepositoryResult<()>;
    fn delete_category(&self, id: &str) -> RepositoryResult<()>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: &str) -> RepositoryResult<Option<Product>>;
    fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<ProductSummary>>;
    fn count_products(&self) -> RepositoryResult<i64>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<ProductLink>;
    fn update_product(&self, id: &str, updates: &UpdateProduct) -> RepositoryResult<ProductLink>;
    fn delete_product(&self, id: &str) -> RepositoryResult<()>;
}

/// Records product page views.
pub trait VisitRecorder {
    fn record_visit(&self, visit: &NewVisit) -> RepositoryResult<()>;
}

/// Aggregated traffic figures per product.
pub trait VisitReader {
    fn get_visit_stats(&self, product_id: &str) -> RepositoryResult<VisitStats>;
}
