use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::domain::visit::Visitor;
use crate::services::ServiceError;

pub mod analytics;
pub mod categories;
pub mod main;
pub mod products;

/// Geolocation headers set by the CDN in front of the site, in priority order.
const COUNTRY_HEADERS: [&str; 2] = ["CF-IPCountry", "X-Vercel-IP-Country"];

/// Register the JSON API under `/api` and the public product page.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(categories::list_categories)
            .service(categories::add_category)
            .service(categories::show_category)
            .service(categories::edit_category)
            .service(categories::delete_category)
            .service(products::list_products)
            .service(products::add_product)
            .service(products::show_product)
            .service(products::edit_product)
            .service(products::delete_product)
            .service(analytics::track_visit)
            .service(analytics::show_visit_stats),
    )
    .service(main::show_product_page);
}

/// Map a service failure to the JSON error body and status used by the API.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        ServiceError::Form(_) | ServiceError::InvalidCategory => {
            HttpResponse::BadRequest().json(body)
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::DuplicateName => HttpResponse::Conflict().json(body),
        ServiceError::CategoryInUse(count) => HttpResponse::Conflict().json(json!({
            "error": err.to_string(),
            "productCount": count,
        })),
        ServiceError::Internal => HttpResponse::InternalServerError().json(body),
    }
}

/// Client address and country of the request.
///
/// The address honours `Forwarded` / `X-Forwarded-For`; a missing address is
/// recorded as `unknown`.
pub fn visitor_from_request(req: &HttpRequest) -> Visitor {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(strip_port)
        .unwrap_or("unknown")
        .to_string();

    let country = COUNTRY_HEADERS.iter().find_map(|name| {
        req.headers()
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    });

    Visitor::new(ip_address, country)
}

/// `realip_remote_addr` falls back to the peer socket address, port included.
fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => host,
        _ => addr,
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn strip_port_handles_v4_and_v6() {
        assert_eq!(strip_port("203.0.113.7:5123"), "203.0.113.7");
        assert_eq!(strip_port("203.0.113.7"), "203.0.113.7");
        assert_eq!(strip_port("[2001:db8::1]:443"), "2001:db8::1");
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn visitor_prefers_forwarded_address_and_country_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.4"))
            .insert_header(("X-Vercel-IP-Country", "FR"))
            .to_http_request();

        let visitor = visitor_from_request(&req);

        assert_eq!(visitor.ip_address, "198.51.100.4");
        assert_eq!(visitor.country, "FR");
    }

    #[test]
    fn visitor_country_defaults_to_unknown() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4000".parse().expect("socket addr"))
            .to_http_request();

        let visitor = visitor_from_request(&req);

        assert_eq!(visitor.ip_address, "192.0.2.1");
        assert_eq!(visitor.country, "Unknown");
    }

    #[actix_web::test]
    async fn category_in_use_reports_count() {
        let response = error_response(&ServiceError::CategoryInUse(2));

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["productCount"], 2);
    }

    #[test]
    fn error_statuses_follow_error_kind() {
        assert_eq!(
            error_response(&ServiceError::Form("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&ServiceError::InvalidCategory).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&ServiceError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&ServiceError::DuplicateName).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(&ServiceError::Internal).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
