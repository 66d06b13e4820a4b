use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, MAX_DESCRIPTION_POINTS, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::models::{decode_list, encode_list};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub description_points: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub description_points: String,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct UpdateCategory<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub description_points: Option<String>,
}

impl Category {
    /// Convert the row into the domain type, attaching the computed product count.
    pub fn into_domain(self, product_count: i64) -> Result<DomainCategory, serde_json::Error> {
        Ok(DomainCategory {
            description_points: decode_list(&self.description_points)?,
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            product_count,
        })
    }
}

impl<'a> NewCategory<'a> {
    pub fn from_domain(
        id: &'a str,
        value: &'a DomainNewCategory,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            name: value.name.trim(),
            description: value.description.trim(),
            description_points: encode_points(&value.description_points)?,
            created_at: value.created_at,
        })
    }
}

impl<'a> TryFrom<&'a DomainUpdateCategory> for UpdateCategory<'a> {
    type Error = serde_json::Error;

    fn try_from(value: &'a DomainUpdateCategory) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.as_deref().map(str::trim),
            description: value.description.as_deref().map(str::trim),
            description_points: value
                .description_points
                .as_deref()
                .map(encode_points)
                .transpose()?,
        })
    }
}

/// The point limit is enforced here as well, at the last step before storage.
fn encode_points(points: &[String]) -> Result<String, serde_json::Error> {
    let limit = points.len().min(MAX_DESCRIPTION_POINTS);
    encode_list(&points[..limit])
}
