use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::forms::analytics::VisitForm;
use crate::repository::DieselRepository;
use crate::routes::{error_response, visitor_from_request};
use crate::services::analytics;

#[post("/analytics/visit")]
pub async fn track_visit(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<VisitForm>,
) -> impl Responder {
    let visitor = visitor_from_request(&req);
    match analytics::track_visit(repo.get_ref(), form, visitor) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => error_response(&err),
    }
}

#[get("/analytics/{id}")]
pub async fn show_visit_stats(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match analytics::load_visit_stats(repo.get_ref(), &path) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(err) => error_response(&err),
    }
}
