use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde_json::json;

use crate::forms::categories::{AddCategoryForm, EditCategoryForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::categories;

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories::load_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(&err),
    }
}

#[post("/categories")]
pub async fn add_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCategoryForm>,
) -> impl Responder {
    match categories::create_category(repo.get_ref(), form) {
        Ok(id) => HttpResponse::Created().json(json!({
            "message": "Category created successfully",
            "id": id,
        })),
        Err(err) => error_response(&err),
    }
}

#[get("/categories/{id}")]
pub async fn show_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::load_category(repo.get_ref(), &path) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[put("/categories/{id}")]
pub async fn edit_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<EditCategoryForm>,
) -> impl Responder {
    match categories::modify_category(repo.get_ref(), &path, form) {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Category updated successfully" })),
        Err(err) => error_response(&err),
    }
}

#[delete("/categories/{id}")]
pub async fn delete_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::remove_category(repo.get_ref(), &path) {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })),
        Err(err) => error_response(&err),
    }
}
