use validator::Validate;

use crate::domain::visit::{NewVisit, VisitStats, Visitor};
use crate::forms::analytics::VisitForm;
use crate::repository::{VisitReader, VisitRecorder};
use crate::services::errors::log_repository_error;
use crate::services::{ServiceError, ServiceResult};

/// Records a product page view reported by the client.
///
/// Repeat visits from the same address only bump the click counter.
pub fn track_visit<R>(repo: &R, form: VisitForm, visitor: Visitor) -> ServiceResult<()>
where
    R: VisitRecorder + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product_id = form.product_id.trim();
    if product_id.is_empty() {
        return Err(ServiceError::Form("productId is required".to_string()));
    }

    repo.record_visit(&NewVisit::new(product_id, visitor))
        .map_err(|err| log_repository_error("Failed to record visit", err))
}

/// Loads the traffic summary of a product; unknown products yield zeros.
pub fn load_visit_stats<R>(repo: &R, product_id: &str) -> ServiceResult<VisitStats>
where
    R: VisitReader + ?Sized,
{
    repo.get_visit_stats(product_id)
        .map_err(|err| log_repository_error("Failed to load visit stats", err))
}
