//! Helpers for integration tests.
#![allow(dead_code)]

use pushkind_rebrand::db::{DbPool, establish_connection_pool};
use pushkind_rebrand::domain::category::NewCategory;
use pushkind_rebrand::domain::product::NewProduct;
use pushkind_rebrand::repository::{CategoryWriter, DieselRepository, ProductWriter};
use pushkind_rebrand::schema_init::ensure_schema;

pub const SITE_URL: &str = "https://rebrand.example.com";

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        remove_db_files(filename); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        ensure_schema(&mut conn);
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool()).with_link_base(SITE_URL)
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_db_files(&self.filename);
    }
}

fn remove_db_files(filename: &str) {
    std::fs::remove_file(filename).ok();
    std::fs::remove_file(format!("{filename}-shm")).ok();
    std::fs::remove_file(format!("{filename}-wal")).ok();
}

/// Insert a category with one description point and return its id.
pub fn seed_category(repo: &DieselRepository, name: &str) -> String {
    let category = NewCategory::new(
        name,
        format!("{name} description"),
        vec![format!("{name} point")],
    );
    repo.create_category(&category)
        .expect("Failed to seed category")
}

/// Insert a minimal product in `category_id` and return its id.
pub fn seed_product(repo: &DieselRepository, old_name: &str, category_id: &str) -> String {
    let product = NewProduct::new(old_name, format!("{old_name} Next"), category_id)
        .with_redirect("https://shop.example.com", 5);
    repo.create_product(&product)
        .expect("Failed to seed product")
        .id
}
