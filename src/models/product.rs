use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    ProductSummary as DomainProductSummary, Theme, UpdateProduct as DomainUpdateProduct,
};
use crate::models::{decode_list, encode_list};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: String,
    pub old_name: String,
    pub new_name: String,
    pub category_id: Option<String>,
    pub old_images: String,
    pub new_images: String,
    pub badge_image_url: Option<String>,
    pub extra_badge_1: Option<String>,
    pub extra_badge_2: Option<String>,
    pub next_redirect_url: String,
    pub redirect_timer: i32,
    pub theme: String,
    pub generated_link: String,
    pub meta_description: Option<String>,
    pub seo_title: Option<String>,
    pub domain: Option<String>,
    pub total_clicks: i32,
    pub created_at: NaiveDateTime,
}

/// Category columns left-joined onto a product row.
#[derive(Debug, Clone, Default)]
pub struct CategoryCopy {
    pub name: Option<String>,
    pub description: Option<String>,
    pub description_points: Option<String>,
}

/// Row of the product listing query.
#[derive(Debug, Clone, Queryable)]
pub struct ProductSummary {
    pub id: String,
    pub old_name: String,
    pub new_name: String,
    pub created_at: NaiveDateTime,
    pub generated_link: String,
    pub total_clicks: i32,
    pub domain: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub id: &'a str,
    pub old_name: &'a str,
    pub new_name: &'a str,
    pub category_id: Option<&'a str>,
    pub old_images: String,
    pub new_images: String,
    pub badge_image_url: Option<&'a str>,
    pub extra_badge_1: Option<&'a str>,
    pub extra_badge_2: Option<&'a str>,
    pub next_redirect_url: &'a str,
    pub redirect_timer: i32,
    pub theme: &'static str,
    pub generated_link: &'a str,
    pub meta_description: Option<&'a str>,
    pub seo_title: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub old_name: Option<&'a str>,
    pub new_name: Option<&'a str>,
    pub category_id: Option<Option<&'a str>>,
    pub old_images: Option<String>,
    pub new_images: Option<String>,
    pub badge_image_url: Option<Option<&'a str>>,
    pub extra_badge_1: Option<Option<&'a str>>,
    pub extra_badge_2: Option<Option<&'a str>>,
    pub next_redirect_url: Option<&'a str>,
    pub redirect_timer: Option<i32>,
    pub theme: Option<&'static str>,
    pub generated_link: Option<&'a str>,
    pub meta_description: Option<Option<&'a str>>,
    pub seo_title: Option<Option<&'a str>>,
    pub domain: Option<Option<&'a str>>,
}

impl Product {
    /// Convert the row into the domain type using the joined category copy.
    pub fn into_domain(self, category: CategoryCopy) -> Result<DomainProduct, serde_json::Error> {
        let theme = self.theme.parse::<Theme>().unwrap_or_else(|err| {
            log::warn!("Product {} has {err}, using the default theme", self.id);
            Theme::default()
        });
        let description_points = match category.description_points.as_deref() {
            Some(raw) => decode_list(raw)?,
            None => Vec::new(),
        };

        Ok(DomainProduct {
            old_images: decode_list(&self.old_images)?,
            new_images: decode_list(&self.new_images)?,
            id: self.id,
            old_name: self.old_name,
            new_name: self.new_name,
            category_id: self.category_id,
            badge_image_url: self.badge_image_url,
            extra_badge_1: self.extra_badge_1,
            extra_badge_2: self.extra_badge_2,
            next_redirect_url: self.next_redirect_url,
            redirect_timer: self.redirect_timer,
            theme,
            generated_link: self.generated_link,
            meta_description: self.meta_description,
            seo_title: self.seo_title,
            domain: self.domain,
            total_clicks: i64::from(self.total_clicks),
            created_at: self.created_at,
            category_name: category.name,
            description: category.description,
            description_points,
        })
    }
}

impl From<ProductSummary> for DomainProductSummary {
    fn from(value: ProductSummary) -> Self {
        Self {
            id: value.id,
            old_name: value.old_name,
            new_name: value.new_name,
            created_at: value.created_at,
            generated_link: value.generated_link,
            total_clicks: i64::from(value.total_clicks),
            domain: value.domain,
            category_name: value.category_name,
        }
    }
}

impl<'a> NewProduct<'a> {
    pub fn from_domain(
        id: &'a str,
        generated_link: &'a str,
        value: &'a DomainNewProduct,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            old_name: value.old_name.as_str(),
            new_name: value.new_name.as_str(),
            category_id: Some(value.category_id.as_str()),
            old_images: encode_list(&value.old_images)?,
            new_images: encode_list(&value.new_images)?,
            badge_image_url: value.badge_image_url.as_deref(),
            extra_badge_1: value.extra_badge_1.as_deref(),
            extra_badge_2: value.extra_badge_2.as_deref(),
            next_redirect_url: value.next_redirect_url.as_str(),
            redirect_timer: value.redirect_timer.max(0),
            theme: value.theme.as_str(),
            generated_link,
            meta_description: value.meta_description.as_deref(),
            seo_title: value.seo_title.as_deref(),
            domain: value.domain.as_deref(),
            created_at: value.created_at,
        })
    }
}

impl<'a> UpdateProduct<'a> {
    /// Build the changeset; `generated_link` is supplied by the caller whenever
    /// the patch renames the product.
    pub fn from_domain(
        value: &'a DomainUpdateProduct,
        generated_link: Option<&'a str>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            old_name: value.old_name.as_deref(),
            new_name: value.new_name.as_deref(),
            category_id: value.category_id.as_deref().map(Some),
            old_images: value.old_images.as_deref().map(encode_list).transpose()?,
            new_images: value.new_images.as_deref().map(encode_list).transpose()?,
            badge_image_url: value.badge_image_url.as_ref().map(Option::as_deref),
            extra_badge_1: value.extra_badge_1.as_ref().map(Option::as_deref),
            extra_badge_2: value.extra_badge_2.as_ref().map(Option::as_deref),
            next_redirect_url: value.next_redirect_url.as_deref(),
            redirect_timer: value.redirect_timer.map(|seconds| seconds.max(0)),
            theme: value.theme.map(Theme::as_str),
            generated_link,
            meta_description: value.meta_description.as_ref().map(Option::as_deref),
            seo_title: value.seo_title.as_ref().map(Option::as_deref),
            domain: value.domain.as_ref().map(Option::as_deref),
        })
    }
}
