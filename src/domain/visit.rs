use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Country recorded when the request carries no geolocation header.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Who is looking at a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub ip_address: String,
    pub country: String,
}

impl Visitor {
    pub fn new(ip_address: impl Into<String>, country: Option<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            country: country
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        }
    }
}

/// A page view to be recorded for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub product_id: String,
    pub ip_address: String,
    pub country: String,
    pub visit_date: NaiveDateTime,
}

impl NewVisit {
    pub fn new(product_id: impl Into<String>, visitor: Visitor) -> Self {
        Self {
            product_id: product_id.into(),
            ip_address: visitor.ip_address,
            country: visitor.country,
            visit_date: Local::now().naive_utc(),
        }
    }
}

/// Number of unique visitors coming from one country.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryVisits {
    pub country: String,
    pub count: i64,
}

/// Traffic summary of a single product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    /// Raw page views.
    pub total_clicks: i64,
    /// Distinct IP addresses that viewed the page.
    pub unique_visitors: i64,
    /// Unique visitors per country, most frequent first.
    pub countries: Vec<CountryVisits>,
}
