//! Idempotent schema setup executed once at process start.
//!
//! There is no migrations table: every step inspects the live schema and only
//! changes what is missing. A failing step is logged and skipped so that the
//! remaining steps still run.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

const CREATE_CATEGORIES: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        description_points TEXT NOT NULL DEFAULT '[]',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )";

const CREATE_VISIT_STATS: &str = "
    CREATE TABLE IF NOT EXISTS visit_stats (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        ip_address TEXT NOT NULL,
        country TEXT NOT NULL DEFAULT 'Unknown',
        visit_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (product_id, ip_address)
    )";

/// Column definitions of `products`, paired with the value substituted for
/// NULLs when rows are copied out of an older table layout.
const PRODUCT_COLUMNS: &[(&str, &str, &str)] = &[
    ("id", "TEXT PRIMARY KEY NOT NULL", "NULL"),
    ("old_name", "TEXT NOT NULL DEFAULT ''", "''"),
    ("new_name", "TEXT NOT NULL DEFAULT ''", "''"),
    (
        "category_id",
        "TEXT DEFAULT NULL REFERENCES categories(id)",
        "NULL",
    ),
    ("old_images", "TEXT NOT NULL DEFAULT '[]'", "'[]'"),
    ("new_images", "TEXT NOT NULL DEFAULT '[]'", "'[]'"),
    ("badge_image_url", "TEXT DEFAULT NULL", "NULL"),
    ("extra_badge_1", "TEXT DEFAULT NULL", "NULL"),
    ("extra_badge_2", "TEXT DEFAULT NULL", "NULL"),
    ("next_redirect_url", "TEXT NOT NULL DEFAULT ''", "''"),
    ("redirect_timer", "INTEGER NOT NULL DEFAULT 0", "0"),
    ("theme", "TEXT NOT NULL DEFAULT 'light'", "'light'"),
    ("generated_link", "TEXT NOT NULL DEFAULT ''", "''"),
    ("meta_description", "TEXT DEFAULT NULL", "NULL"),
    ("seo_title", "TEXT DEFAULT NULL", "NULL"),
    ("domain", "TEXT DEFAULT NULL", "NULL"),
    ("total_clicks", "INTEGER NOT NULL DEFAULT 0", "0"),
    (
        "created_at",
        "TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP",
        "CURRENT_TIMESTAMP",
    ),
];

/// Columns that used to live on `products` and now come from the category join.
const OBSOLETE_PRODUCT_COLUMNS: &[&str] = &["description", "description_points"];

#[derive(QueryableByName)]
struct ColumnName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ForeignKey {
    #[diesel(sql_type = Text)]
    parent_table: String,
    #[diesel(sql_type = Text)]
    from_column: String,
}

/// Bring the database to the expected shape without touching existing rows.
///
/// Safe to call on every start and from several processes: each step is
/// guarded by `IF NOT EXISTS` or an explicit inspection of the live schema.
pub fn ensure_schema(conn: &mut SqliteConnection) {
    run_step(conn, "create categories table", |conn| {
        conn.batch_execute(CREATE_CATEGORIES)?;
        Ok(false)
    });
    run_step(conn, "create products table", |conn| {
        conn.batch_execute(&create_products_sql("products"))?;
        Ok(false)
    });
    run_step(conn, "add products.category_id", |conn| {
        add_column_if_missing(conn, "products", "category_id")
    });
    run_step(conn, "add products.domain", |conn| {
        add_column_if_missing(conn, "products", "domain")
    });
    run_step(conn, "rebuild products table", rebuild_products_if_needed);
    run_step(conn, "create visit_stats table", |conn| {
        conn.batch_execute(CREATE_VISIT_STATS)?;
        Ok(false)
    });

    log::info!("Database tables are ready");
}

/// Run a single schema step, logging instead of propagating failures.
fn run_step<F>(conn: &mut SqliteConnection, step: &str, action: F)
where
    F: FnOnce(&mut SqliteConnection) -> QueryResult<bool>,
{
    match action(conn) {
        Ok(true) => log::info!("Schema step applied: {step}"),
        Ok(false) => log::debug!("Schema step already satisfied: {step}"),
        Err(err) => log::warn!("Schema step `{step}` failed and was skipped: {err}"),
    }
}

fn create_products_sql(table: &str) -> String {
    let columns: Vec<String> = PRODUCT_COLUMNS
        .iter()
        .map(|(name, definition, _)| format!("{name} {definition}"))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    {}\n)",
        columns.join(",\n    ")
    )
}

/// Names of the columns currently present on `table`.
pub fn table_columns(conn: &mut SqliteConnection, table: &str) -> QueryResult<Vec<String>> {
    let columns = sql_query("SELECT name FROM pragma_table_info(?)")
        .bind::<Text, _>(table)
        .load::<ColumnName>(conn)?;
    Ok(columns.into_iter().map(|column| column.name).collect())
}

/// Whether `table.column` carries a foreign key into `parent`.
pub fn has_foreign_key(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    parent: &str,
) -> QueryResult<bool> {
    let keys = sql_query(
        "SELECT \"table\" AS parent_table, \"from\" AS from_column FROM pragma_foreign_key_list(?)",
    )
    .bind::<Text, _>(table)
    .load::<ForeignKey>(conn)?;

    Ok(keys
        .iter()
        .any(|key| key.from_column == column && key.parent_table == parent))
}

fn add_column_if_missing(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> QueryResult<bool> {
    if table_columns(conn, table)?.iter().any(|name| name == column) {
        return Ok(false);
    }

    let Some((_, definition, _)) = PRODUCT_COLUMNS.iter().find(|(name, ..)| *name == column)
    else {
        return Ok(false);
    };

    conn.batch_execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"))?;
    Ok(true)
}

/// Recreate `products` when it still carries obsolete columns or lacks the
/// category foreign key; SQLite can add neither constraint in place.
fn rebuild_products_if_needed(conn: &mut SqliteConnection) -> QueryResult<bool> {
    let existing = table_columns(conn, "products")?;
    let has_obsolete = existing
        .iter()
        .any(|column| OBSOLETE_PRODUCT_COLUMNS.contains(&column.as_str()));
    let has_category_fk = has_foreign_key(conn, "products", "category_id", "categories")?;

    if !has_obsolete && has_category_fk {
        return Ok(false);
    }

    let (targets, sources): (Vec<&str>, Vec<String>) = PRODUCT_COLUMNS
        .iter()
        .filter(|(name, ..)| existing.iter().any(|column| column == name))
        .map(|(name, _, fallback)| (*name, format!("COALESCE({name}, {fallback})")))
        .unzip();

    let copy_rows = format!(
        "INSERT INTO products_rebuild ({}) SELECT {} FROM products",
        targets.join(", "),
        sources.join(", ")
    );

    // Dropping `products` with enforcement on would cascade into visit_stats.
    conn.batch_execute("PRAGMA foreign_keys = OFF")?;
    let rebuilt = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        conn.batch_execute("DROP TABLE IF EXISTS products_rebuild")?;
        conn.batch_execute(&create_products_sql("products_rebuild"))?;
        conn.batch_execute(&copy_rows)?;
        conn.batch_execute("DROP TABLE products")?;
        conn.batch_execute("ALTER TABLE products_rebuild RENAME TO products")?;
        Ok(())
    });
    conn.batch_execute("PRAGMA foreign_keys = ON")?;

    rebuilt.map(|()| true)
}
