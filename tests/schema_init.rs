use diesel::connection::SimpleConnection;

use pushkind_rebrand::repository::ProductReader;
use pushkind_rebrand::schema_init::{ensure_schema, has_foreign_key, table_columns};

mod common;

const LEGACY_PRODUCTS: &str = "
    DROP TABLE IF EXISTS visit_stats;
    DROP TABLE products;
    CREATE TABLE products (
        id TEXT PRIMARY KEY NOT NULL,
        old_name TEXT NOT NULL,
        new_name TEXT NOT NULL,
        description TEXT,
        description_points TEXT,
        old_images TEXT,
        new_images TEXT,
        badge_image_url TEXT,
        extra_badge_1 TEXT,
        extra_badge_2 TEXT,
        next_redirect_url TEXT,
        redirect_timer INTEGER,
        theme TEXT,
        generated_link TEXT,
        meta_description TEXT,
        seo_title TEXT,
        total_clicks INTEGER,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    INSERT INTO products (id, old_name, new_name, description, old_images, theme)
    VALUES ('0b6f6a52-7f0e-4c4b-9a3e-2d1f5e8c9a10', 'Vita Max', 'Vita Ultra',
            'legacy copy', '[\"/a.png\",\"/b.png\"]', 'dark');
";

#[test]
fn test_legacy_products_table_is_upgraded_in_place() {
    let test_db = common::TestDb::new("test_legacy_products_table_is_upgraded_in_place.db");
    let mut conn = test_db.pool().get().expect("connection");
    conn.batch_execute(LEGACY_PRODUCTS)
        .expect("create legacy schema");

    ensure_schema(&mut conn);

    let columns = table_columns(&mut conn, "products").expect("inspect products");
    assert!(columns.iter().any(|column| column == "category_id"));
    assert!(columns.iter().any(|column| column == "domain"));
    assert!(!columns.iter().any(|column| column == "description"));
    assert!(!columns.iter().any(|column| column == "description_points"));
    assert!(
        has_foreign_key(&mut conn, "products", "category_id", "categories")
            .expect("inspect foreign keys")
    );
    assert!(
        has_foreign_key(&mut conn, "visit_stats", "product_id", "products")
            .expect("inspect foreign keys")
    );
    drop(conn);

    let product = test_db
        .repo()
        .get_product_by_id("0b6f6a52-7f0e-4c4b-9a3e-2d1f5e8c9a10")
        .expect("load migrated product")
        .expect("row survived the rebuild");
    assert_eq!(product.old_images, vec!["/a.png".to_string(), "/b.png".to_string()]);
    assert!(product.new_images.is_empty());
    assert_eq!(product.redirect_timer, 0);
    assert_eq!(product.total_clicks, 0);
    assert_eq!(product.category_id, None);
    assert_eq!(product.description, None);
}

#[test]
fn test_ensure_schema_twice_keeps_data() {
    let test_db = common::TestDb::new("test_ensure_schema_twice_keeps_data.db");
    let repo = test_db.repo();
    let category_id = common::seed_category(&repo, "Supplements");
    let id = common::seed_product(&repo, "Vita Max", &category_id);

    let mut conn = test_db.pool().get().expect("connection");
    ensure_schema(&mut conn);
    drop(conn);

    assert!(repo.get_product_by_id(&id).expect("get").is_some());
}
