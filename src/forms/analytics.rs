use serde::Deserialize;
use validator::Validate;

/// JSON body posted by the product page when it is viewed.
#[derive(Debug, Deserialize, Validate)]
pub struct VisitForm {
    #[serde(rename = "productId")]
    #[validate(length(min = 1, max = 64))]
    pub product_id: String,
}
