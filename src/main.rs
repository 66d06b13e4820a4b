use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use tera::Tera;

use pushkind_rebrand::config::ServerConfig;
use pushkind_rebrand::db::establish_connection_pool;
use pushkind_rebrand::repository::DieselRepository;
use pushkind_rebrand::routes;
use pushkind_rebrand::schema_init::ensure_schema;
use pushkind_rebrand::storage::ImageStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => ensure_schema(&mut conn),
        Err(e) => {
            log::error!("Failed to open database {}: {e}", config.database_url);
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool).with_link_base(config.site_url.as_str());

    let tera = match Tera::new(&format!("{}/**/*", config.templates_dir)) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let image_store = match ImageStore::new(&config.upload_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot use upload directory {}: {e}", config.upload_dir);
            std::process::exit(1);
        }
    };

    log::info!(
        "Serving {} on {}:{}",
        config.site_url,
        config.address,
        config.port
    );

    let upload_dir = config.upload_dir.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/uploads", upload_dir.as_str()))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(image_store.clone()))
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}
