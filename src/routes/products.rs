use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::forms::products::ProductUploadForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::products::{self, ProductsQuery};
use crate::storage::ImageStore;

#[get("/products")]
pub async fn list_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::load_products(repo.get_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(&err),
    }
}

#[post("/products")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    store: web::Data<ImageStore>,
    MultipartForm(upload): MultipartForm<ProductUploadForm>,
) -> impl Responder {
    let (form, uploads) = upload.into_parts();
    match products::create_product(repo.get_ref(), store.get_ref(), form, uploads) {
        Ok(link) => HttpResponse::Created().json(json!({
            "message": "Product created successfully",
            "id": link.id,
            "generatedLink": link.generated_link,
        })),
        Err(err) => error_response(&err),
    }
}

#[get("/product/{id}")]
pub async fn show_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::load_product(repo.get_ref(), &path) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(&err),
    }
}

#[put("/product/{id}")]
pub async fn edit_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    store: web::Data<ImageStore>,
    MultipartForm(upload): MultipartForm<ProductUploadForm>,
) -> impl Responder {
    let (form, uploads) = upload.into_parts();
    match products::modify_product(repo.get_ref(), store.get_ref(), &path, form, uploads) {
        Ok(link) => HttpResponse::Ok().json(json!({
            "message": "Product updated",
            "id": link.id,
            "generated_link": link.generated_link,
        })),
        Err(err) => error_response(&err),
    }
}

#[delete("/product/{id}")]
pub async fn delete_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match products::remove_product(repo.get_ref(), &id) {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Product deleted", "id": id })),
        Err(err) => error_response(&err),
    }
}
