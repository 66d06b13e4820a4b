use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Length of a hyphenated UUID such as the ones used for product ids.
pub const UUID_LEN: usize = 36;

/// Default page size used by the product listing.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Colour scheme of the public product page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a theme string is neither `light` nor `dark`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(value.to_string())),
        }
    }
}

/// Full rename announcement, including the descriptive copy of its category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// UUID assigned on creation.
    pub id: String,
    /// Name the product used to be sold under.
    pub old_name: String,
    /// Name the product is sold under now.
    pub new_name: String,
    /// Assigned category; only legacy rows may lack one.
    pub category_id: Option<String>,
    /// Images of the product under its old name.
    pub old_images: Vec<String>,
    /// Images of the product under its new name.
    pub new_images: Vec<String>,
    pub badge_image_url: Option<String>,
    pub extra_badge_1: Option<String>,
    pub extra_badge_2: Option<String>,
    /// Call-to-action and auto-redirect destination.
    pub next_redirect_url: String,
    /// Seconds before the public page redirects; `0` disables the redirect.
    pub redirect_timer: i32,
    pub theme: Theme,
    /// Canonical permalink built from `old_name` and `id`.
    pub generated_link: String,
    pub meta_description: Option<String>,
    pub seo_title: Option<String>,
    /// Domain the product page is meant to be served from.
    pub domain: Option<String>,
    /// Raw page views, duplicates included.
    pub total_clicks: i64,
    pub created_at: NaiveDateTime,
    /// Name of the joined category.
    pub category_name: Option<String>,
    /// Description copied from the joined category.
    pub description: Option<String>,
    /// Bullet points copied from the joined category.
    pub description_points: Vec<String>,
}

/// Projection used by the product listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: String,
    pub old_name: String,
    pub new_name: String,
    pub created_at: NaiveDateTime,
    pub generated_link: String,
    pub total_clicks: i64,
    pub domain: Option<String>,
    pub category_name: Option<String>,
}

/// Identifier and permalink returned after a product write.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProductLink {
    pub id: String,
    pub generated_link: String,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub old_name: String,
    pub new_name: String,
    /// Must reference an existing category.
    pub category_id: String,
    pub old_images: Vec<String>,
    pub new_images: Vec<String>,
    pub badge_image_url: Option<String>,
    pub extra_badge_1: Option<String>,
    pub extra_badge_2: Option<String>,
    pub next_redirect_url: String,
    pub redirect_timer: i32,
    pub theme: Theme,
    pub meta_description: Option<String>,
    pub seo_title: Option<String>,
    pub domain: Option<String>,
    /// Timestamp captured when the product payload was created.
    pub created_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with empty media and no redirect.
    pub fn new(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            category_id: category_id.into(),
            old_images: Vec::new(),
            new_images: Vec::new(),
            badge_image_url: None,
            extra_badge_1: None,
            extra_badge_2: None,
            next_redirect_url: String::new(),
            redirect_timer: 0,
            theme: Theme::default(),
            meta_description: None,
            seo_title: None,
            domain: None,
            created_at: Local::now().naive_utc(),
        }
    }

    pub fn with_images(mut self, old_images: Vec<String>, new_images: Vec<String>) -> Self {
        self.old_images = old_images;
        self.new_images = new_images;
        self
    }

    pub fn with_badges(
        mut self,
        badge_image_url: Option<String>,
        extra_badge_1: Option<String>,
        extra_badge_2: Option<String>,
    ) -> Self {
        self.badge_image_url = badge_image_url;
        self.extra_badge_1 = extra_badge_1;
        self.extra_badge_2 = extra_badge_2;
        self
    }

    /// Configure the call-to-action target and the auto-redirect delay.
    pub fn with_redirect(mut self, next_redirect_url: impl Into<String>, timer: i32) -> Self {
        self.next_redirect_url = next_redirect_url.into();
        self.redirect_timer = timer.max(0);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_seo(mut self, seo_title: Option<String>, meta_description: Option<String>) -> Self {
        self.seo_title = seo_title;
        self.meta_description = meta_description;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Patch data applied when updating an existing product. Outer `None` leaves
/// a field untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub category_id: Option<String>,
    pub old_images: Option<Vec<String>>,
    pub new_images: Option<Vec<String>>,
    pub badge_image_url: Option<Option<String>>,
    pub extra_badge_1: Option<Option<String>>,
    pub extra_badge_2: Option<Option<String>>,
    pub next_redirect_url: Option<String>,
    pub redirect_timer: Option<i32>,
    pub theme: Option<Theme>,
    pub meta_description: Option<Option<String>>,
    pub seo_title: Option<Option<String>>,
    pub domain: Option<Option<String>>,
}

impl UpdateProduct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the old product identity; the permalink follows.
    pub fn old_name(mut self, old_name: impl Into<String>) -> Self {
        self.old_name = Some(old_name.into());
        self
    }

    pub fn new_name(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn old_images(mut self, images: Vec<String>) -> Self {
        self.old_images = Some(images);
        self
    }

    pub fn new_images(mut self, images: Vec<String>) -> Self {
        self.new_images = Some(images);
        self
    }

    pub fn next_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.next_redirect_url = Some(url.into());
        self
    }

    pub fn badge_image_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.badge_image_url = Some(url.map(|value| value.into()));
        self
    }

    pub fn extra_badge_1(mut self, url: Option<impl Into<String>>) -> Self {
        self.extra_badge_1 = Some(url.map(|value| value.into()));
        self
    }

    pub fn extra_badge_2(mut self, url: Option<impl Into<String>>) -> Self {
        self.extra_badge_2 = Some(url.map(|value| value.into()));
        self
    }

    pub fn redirect_timer(mut self, seconds: i32) -> Self {
        self.redirect_timer = Some(seconds.max(0));
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn seo_title(mut self, seo_title: Option<impl Into<String>>) -> Self {
        self.seo_title = Some(seo_title.map(|value| value.into()));
        self
    }

    pub fn meta_description(mut self, meta_description: Option<impl Into<String>>) -> Self {
        self.meta_description = Some(meta_description.map(|value| value.into()));
        self
    }

    pub fn domain(mut self, domain: Option<impl Into<String>>) -> Self {
        self.domain = Some(domain.map(|value| value.into()));
        self
    }

    /// Whether the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Page of the product listing, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductListQuery {
    pub limit: i64,
    pub offset: i64,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }

    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit.max(0);
        self.offset = offset.max(0);
        self
    }
}

/// Lowercase `name` and collapse every run of non-alphanumeric characters
/// into a single dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Permalink of a product: `{base}/product/{slug}-{id}`.
pub fn generate_link(base_url: &str, old_name: &str, id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let slug = slugify(old_name);
    if slug.is_empty() {
        format!("{base}/product/{id}")
    } else {
        format!("{base}/product/{slug}-{id}")
    }
}

/// Extract the product id embedded at the end of a slug.
///
/// A trailing `-<uuid>` wins; otherwise the whole slug is taken as the id.
/// UUIDs are returned in their lowercase hyphenated form so they match the
/// stored ids whatever case the link was typed in.
pub fn product_id_from_slug(slug: &str) -> Cow<'_, str> {
    let slug = slug.trim();
    let candidate = trailing_uuid(slug).unwrap_or(slug);

    if candidate.len() != UUID_LEN {
        return Cow::Borrowed(candidate);
    }

    match Uuid::try_parse(candidate) {
        Ok(uuid) => Cow::Owned(uuid.hyphenated().to_string()),
        Err(_) => Cow::Borrowed(candidate),
    }
}

fn trailing_uuid(slug: &str) -> Option<&str> {
    if slug.len() <= UUID_LEN {
        return None;
    }

    let split = slug.len() - UUID_LEN;
    if !slug.is_char_boundary(split) || !slug[..split].ends_with('-') {
        return None;
    }

    let candidate = &slug[split..];
    Uuid::try_parse(candidate).ok().map(|_| candidate)
}

/// Whether `id` looks like a shortened id eligible for suffix matching.
pub fn is_partial_id(id: &str) -> bool {
    !id.is_empty() && id.len() < UUID_LEN && id.chars().all(|ch| ch.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0b6f6a52-7f0e-4c4b-9a3e-2d1f5e8c9a10";

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Vita Max  Pro! "), "vita-max-pro");
        assert_eq!(slugify("Omega-3 (Fish Oil)"), "omega-3-fish-oil");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn generate_link_appends_id() {
        let link = generate_link("https://example.com/", "Vita Max", ID);

        assert_eq!(link, format!("https://example.com/product/vita-max-{ID}"));
    }

    #[test]
    fn generate_link_without_slug_uses_bare_id() {
        assert_eq!(generate_link("", "???", ID), format!("/product/{ID}"));
    }

    #[test]
    fn product_id_from_slug_extracts_trailing_uuid() {
        assert_eq!(product_id_from_slug(&format!("vita-max-{ID}")), ID);
        let upper = ID.to_uppercase();
        assert_eq!(product_id_from_slug(&format!("vita-max-{upper}")), ID);
        assert_eq!(product_id_from_slug(&upper), ID);
    }

    #[test]
    fn product_id_from_slug_falls_back_to_whole_slug() {
        assert_eq!(product_id_from_slug(ID), ID);
        assert_eq!(product_id_from_slug("plain-slug"), "plain-slug");
        assert_eq!(
            product_id_from_slug("vita-max-not-a-uuid-at-all-but-long-enough"),
            "vita-max-not-a-uuid-at-all-but-long-enough"
        );
    }

    #[test]
    fn partial_ids_are_short_and_alphanumeric() {
        assert!(is_partial_id("9a10"));
        assert!(!is_partial_id(""));
        assert!(!is_partial_id("2d1f-9a10"));
        assert!(!is_partial_id(ID));
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn update_product_reports_emptiness() {
        assert!(UpdateProduct::new().is_empty());
        assert!(!UpdateProduct::new().old_name("Foo").is_empty());
    }

    #[test]
    fn update_product_setters_distinguish_clear_from_untouched() {
        let update = UpdateProduct::new()
            .seo_title(None::<String>)
            .badge_image_url(Some("/uploads/badge.png"));

        assert_eq!(update.seo_title, Some(None));
        assert_eq!(
            update.badge_image_url,
            Some(Some("/uploads/badge.png".to_string()))
        );
        assert_eq!(update.meta_description, None);
        assert_eq!(update.extra_badge_1, None);
    }
}
