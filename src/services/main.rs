use crate::domain::product::Product;
use crate::domain::visit::{NewVisit, Visitor};
use crate::repository::{ProductReader, VisitRecorder};
use crate::services::errors::log_repository_error;
use crate::services::{ServiceError, ServiceResult};

/// Resolves the public product page for `slug` and counts the view.
///
/// A failure to record the visit is logged and does not prevent rendering.
pub fn load_product_page<R>(repo: &R, slug: &str, visitor: Visitor) -> ServiceResult<Product>
where
    R: ProductReader + VisitRecorder + ?Sized,
{
    let product = repo
        .get_product_by_slug(slug)
        .map_err(|err| log_repository_error("Failed to load product page", err))?
        .ok_or(ServiceError::NotFound)?;

    if let Err(err) = repo.record_visit(&NewVisit::new(product.id.as_str(), visitor)) {
        log::warn!("Failed to record visit to product {}: {err}", product.id);
    }

    Ok(product)
}
