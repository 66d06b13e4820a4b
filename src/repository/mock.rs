use mockall::mock;

use super::{
    CategoryReader, CategoryWriter, ProductReader, ProductWriter, RepositoryResult, VisitReader,
    VisitRecorder,
};
use crate::domain::{
    category::{Category, NewCategory, UpdateCategory},
    product::{NewProduct, Product, ProductLink, ProductListQuery, ProductSummary, UpdateProduct},
    visit::{NewVisit, VisitStats},
};

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: &str) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
        fn count_category_products(&self, id: &str) -> RepositoryResult<i64>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<String>;
        fn update_category(&self, id: &str, updates: &UpdateCategory) -> RepositoryResult<()>;
        fn delete_category(&self, id: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: &str) -> RepositoryResult<Option<Product>>;
        fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<ProductSummary>>;
        fn count_products(&self) -> RepositoryResult<i64>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<ProductLink>;
        fn update_product(
            &self,
            id: &str,
            updates: &UpdateProduct,
        ) -> RepositoryResult<ProductLink>;
        fn delete_product(&self, id: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub VisitRecorder {}

    impl VisitRecorder for VisitRecorder {
        fn record_visit(&self, visit: &NewVisit) -> RepositoryResult<()>;
    }
}

mock! {
    pub VisitReader {}

    impl VisitReader for VisitReader {
        fn get_visit_stats(&self, product_id: &str) -> RepositoryResult<VisitStats>;
    }
}
