use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::visit::NewVisit as DomainNewVisit;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::visit_stats)]
pub struct Visit {
    pub id: i32,
    pub product_id: String,
    pub ip_address: String,
    pub country: String,
    pub visit_date: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::visit_stats)]
pub struct NewVisit<'a> {
    pub product_id: &'a str,
    pub ip_address: &'a str,
    pub country: &'a str,
    pub visit_date: NaiveDateTime,
}

impl<'a> From<&'a DomainNewVisit> for NewVisit<'a> {
    fn from(value: &'a DomainNewVisit) -> Self {
        Self {
            product_id: value.product_id.as_str(),
            ip_address: value.ip_address.as_str(),
            country: value.country.as_str(),
            visit_date: value.visit_date,
        }
    }
}
