use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use tera::{Context, Tera};

use crate::repository::DieselRepository;
use crate::routes::visitor_from_request;
use crate::services::{ServiceError, main as main_service};

/// Public rename announcement for a product.
#[get("/product/{slug}")]
pub async fn show_product_page(
    req: HttpRequest,
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let visitor = visitor_from_request(&req);
    match main_service::load_product_page(repo.get_ref(), &path, visitor) {
        Ok(product) => {
            let mut context = Context::new();
            let page_title = product
                .seo_title
                .clone()
                .unwrap_or_else(|| format!("{} is now {}", product.old_name, product.new_name));
            context.insert("page_title", &page_title);
            context.insert("theme", product.theme.as_str());
            context.insert("product", &product);
            render_template(&tera, "product.html", &context, StatusCode::OK)
        }
        Err(ServiceError::NotFound) => {
            let mut context = Context::new();
            context.insert("slug", path.as_str());
            render_template(&tera, "not_found.html", &context, StatusCode::NOT_FOUND)
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

fn render_template(
    tera: &Tera,
    template: &str,
    context: &Context,
    status: StatusCode,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
