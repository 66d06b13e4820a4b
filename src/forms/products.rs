use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, Product, Theme, UnknownTheme, UpdateProduct};
use crate::forms::{non_blank, sanitize_inline_text};
use crate::storage::{ImageStore, StorageError};

/// Maximum allowed length for the old and new product names.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for URLs and image references.
const URL_MAX_LEN: usize = 2048;
const URL_MAX_LEN_VALIDATOR: u64 = URL_MAX_LEN as u64;

const SEO_TITLE_MAX_LEN_VALIDATOR: u64 = 255;
const META_DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 1024;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("`{0}` is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Theme(#[from] UnknownTheme),
    #[error("redirect_timer must be a non-negative integer, got `{0}`")]
    InvalidTimer(String),
    #[error("`{field}` must be a JSON array of image URLs")]
    InvalidImageList { field: &'static str },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Multipart payload posted by the product upload and edit screens.
#[derive(Debug, MultipartForm)]
pub struct ProductUploadForm {
    pub old_name: Option<Text<String>>,
    pub new_name: Option<Text<String>>,
    pub category_id: Option<Text<String>>,
    pub next_redirect_url: Option<Text<String>>,
    pub redirect_timer: Option<Text<String>>,
    pub theme: Option<Text<String>>,
    pub seo_title: Option<Text<String>>,
    pub meta_description: Option<Text<String>>,
    pub domain: Option<Text<String>>,
    pub badge_image_url: Option<Text<String>>,
    pub extra_badge_1: Option<Text<String>>,
    pub extra_badge_2: Option<Text<String>>,
    /// JSON array of previously stored old images the client keeps.
    pub old_images_existing: Option<Text<String>>,
    /// JSON array of previously stored new images the client keeps.
    pub new_images_existing: Option<Text<String>>,
    #[multipart(limit = "20MB")]
    pub old_images: Vec<TempFile>,
    #[multipart(limit = "20MB")]
    pub new_images: Vec<TempFile>,
    #[multipart(limit = "5MB")]
    pub badge_image: Option<TempFile>,
    #[multipart(limit = "5MB")]
    pub extra_badge_1_image: Option<TempFile>,
    #[multipart(limit = "5MB")]
    pub extra_badge_2_image: Option<TempFile>,
}

impl ProductUploadForm {
    /// Split the multipart payload into its text fields and file parts.
    pub fn into_parts(self) -> (ProductForm, ProductUploads) {
        fn text(value: Option<Text<String>>) -> Option<String> {
            value.map(Text::into_inner)
        }

        let form = ProductForm {
            old_name: text(self.old_name),
            new_name: text(self.new_name),
            category_id: text(self.category_id),
            next_redirect_url: text(self.next_redirect_url),
            redirect_timer: text(self.redirect_timer),
            theme: text(self.theme),
            seo_title: text(self.seo_title),
            meta_description: text(self.meta_description),
            domain: text(self.domain),
            badge_image_url: text(self.badge_image_url),
            extra_badge_1: text(self.extra_badge_1),
            extra_badge_2: text(self.extra_badge_2),
            old_images_existing: text(self.old_images_existing),
            new_images_existing: text(self.new_images_existing),
        };

        let uploads = ProductUploads {
            old_images: self.old_images,
            new_images: self.new_images,
            badge_image: self.badge_image,
            extra_badge_1_image: self.extra_badge_1_image,
            extra_badge_2_image: self.extra_badge_2_image,
        };

        (form, uploads)
    }
}

/// Files attached to a product form.
#[derive(Debug, Default)]
pub struct ProductUploads {
    pub old_images: Vec<TempFile>,
    pub new_images: Vec<TempFile>,
    pub badge_image: Option<TempFile>,
    pub extra_badge_1_image: Option<TempFile>,
    pub extra_badge_2_image: Option<TempFile>,
}

impl ProductUploads {
    /// Copy every attached file into `store` and collect the resulting URLs.
    pub fn store(self, store: &ImageStore) -> ProductFormResult<StoredImages> {
        let single = |upload: Option<TempFile>| -> ProductFormResult<Option<String>> {
            match upload {
                Some(file) => Ok(store.save(&file)?),
                None => Ok(None),
            }
        };

        Ok(StoredImages {
            old_images: store.save_all(&self.old_images)?,
            new_images: store.save_all(&self.new_images)?,
            badge_image_url: single(self.badge_image)?,
            extra_badge_1: single(self.extra_badge_1_image)?,
            extra_badge_2: single(self.extra_badge_2_image)?,
        })
    }
}

/// Public URLs of the images stored for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredImages {
    pub old_images: Vec<String>,
    pub new_images: Vec<String>,
    pub badge_image_url: Option<String>,
    pub extra_badge_1: Option<String>,
    pub extra_badge_2: Option<String>,
}

/// Text fields of a product form. Every field is optional so the same
/// payload serves both creation and partial updates.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub old_name: Option<String>,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub new_name: Option<String>,
    pub category_id: Option<String>,
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub next_redirect_url: Option<String>,
    pub redirect_timer: Option<String>,
    pub theme: Option<String>,
    #[validate(length(max = SEO_TITLE_MAX_LEN_VALIDATOR))]
    pub seo_title: Option<String>,
    #[validate(length(max = META_DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub meta_description: Option<String>,
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub domain: Option<String>,
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub badge_image_url: Option<String>,
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub extra_badge_1: Option<String>,
    #[validate(length(max = URL_MAX_LEN_VALIDATOR))]
    pub extra_badge_2: Option<String>,
    pub old_images_existing: Option<String>,
    pub new_images_existing: Option<String>,
}

impl ProductForm {
    /// Validates the form and combines it with freshly stored images into a
    /// domain `NewProduct`.
    ///
    /// Uploaded badge files take precedence over badge URLs typed in the form.
    pub fn into_new_product(self, images: StoredImages) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let old_name = required(self.old_name.as_deref(), "old_name")?;
        let new_name = required(self.new_name.as_deref(), "new_name")?;
        let category_id = required(self.category_id.as_deref(), "category_id")?;
        let next_redirect_url = required(self.next_redirect_url.as_deref(), "next_redirect_url")?;

        let timer = match self.redirect_timer.as_deref() {
            Some(value) => parse_timer(value)?,
            None => 0,
        };
        let theme = parse_theme(self.theme.as_deref())?.unwrap_or_default();

        let mut old_images =
            parse_image_list(self.old_images_existing.as_deref(), "old_images_existing")?
                .unwrap_or_default();
        old_images.extend(images.old_images);
        let mut new_images =
            parse_image_list(self.new_images_existing.as_deref(), "new_images_existing")?
                .unwrap_or_default();
        new_images.extend(images.new_images);

        let mut product = NewProduct::new(old_name, new_name, category_id)
            .with_images(old_images, new_images)
            .with_badges(
                images.badge_image_url.or_else(|| non_blank(self.badge_image_url.as_deref())),
                images.extra_badge_1.or_else(|| non_blank(self.extra_badge_1.as_deref())),
                images.extra_badge_2.or_else(|| non_blank(self.extra_badge_2.as_deref())),
            )
            .with_redirect(next_redirect_url, timer)
            .with_theme(theme)
            .with_seo(
                non_blank(self.seo_title.as_deref()),
                non_blank(self.meta_description.as_deref()),
            );

        if let Some(domain) = non_blank(self.domain.as_deref()) {
            product = product.with_domain(domain);
        }

        Ok(product)
    }

    /// Validates the form into a domain `UpdateProduct`.
    ///
    /// Only fields present in the payload are changed. Blank names are
    /// ignored while blank optional fields clear the stored value. Image lists
    /// start from the `*_existing` JSON when supplied (otherwise from
    /// `current`) and gain any newly uploaded files.
    pub fn into_update_product(
        self,
        images: StoredImages,
        current: &Product,
    ) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut update = UpdateProduct::new();

        if let Some(old_name) = non_blank(self.old_name.as_deref()) {
            update = update.old_name(old_name);
        }
        if let Some(new_name) = non_blank(self.new_name.as_deref()) {
            update = update.new_name(new_name);
        }
        if let Some(category_id) = non_blank(self.category_id.as_deref()) {
            update = update.category_id(category_id);
        }
        if let Some(url) = non_blank(self.next_redirect_url.as_deref()) {
            update = update.next_redirect_url(url);
        }
        if let Some(value) = self.redirect_timer.as_deref() {
            update = update.redirect_timer(parse_timer(value)?);
        }
        if let Some(theme) = parse_theme(self.theme.as_deref())? {
            update = update.theme(theme);
        }

        if let Some(seo_title) = self.seo_title.as_deref() {
            update = update.seo_title(non_blank(Some(seo_title)));
        }
        if let Some(meta_description) = self.meta_description.as_deref() {
            update = update.meta_description(non_blank(Some(meta_description)));
        }
        if let Some(domain) = self.domain.as_deref() {
            update = update.domain(non_blank(Some(domain)));
        }

        let badge = badge_update(images.badge_image_url, self.badge_image_url.as_deref());
        if let Some(badge) = badge {
            update = update.badge_image_url(badge);
        }
        if let Some(badge) = badge_update(images.extra_badge_1, self.extra_badge_1.as_deref()) {
            update = update.extra_badge_1(badge);
        }
        if let Some(badge) = badge_update(images.extra_badge_2, self.extra_badge_2.as_deref()) {
            update = update.extra_badge_2(badge);
        }

        let retained_old =
            parse_image_list(self.old_images_existing.as_deref(), "old_images_existing")?;
        if let Some(list) = merge_images(retained_old, images.old_images, &current.old_images) {
            update = update.old_images(list);
        }
        let retained_new =
            parse_image_list(self.new_images_existing.as_deref(), "new_images_existing")?;
        if let Some(list) = merge_images(retained_new, images.new_images, &current.new_images) {
            update = update.new_images(list);
        }

        Ok(update)
    }
}

fn required(value: Option<&str>, field: &'static str) -> ProductFormResult<String> {
    non_blank(value).ok_or(ProductFormError::MissingField(field))
}

fn parse_timer(value: &str) -> ProductFormResult<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i32>()
        .ok()
        .filter(|seconds| *seconds >= 0)
        .ok_or_else(|| ProductFormError::InvalidTimer(value.to_string()))
}

fn parse_theme(value: Option<&str>) -> ProductFormResult<Option<Theme>> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(value.parse()?)),
        None => Ok(None),
    }
}

/// Blank input yields `Ok(None)`; anything else must be a JSON string array.
fn parse_image_list(
    value: Option<&str>,
    field: &'static str,
) -> ProductFormResult<Option<Vec<String>>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let images: Vec<String> =
        serde_json::from_str(raw).map_err(|_| ProductFormError::InvalidImageList { field })?;

    Ok(Some(
        images
            .iter()
            .map(|image| sanitize_inline_text(image))
            .filter(|image| !image.is_empty())
            .collect(),
    ))
}

fn merge_images(
    retained: Option<Vec<String>>,
    uploaded: Vec<String>,
    current: &[String],
) -> Option<Vec<String>> {
    if retained.is_none() && uploaded.is_empty() {
        return None;
    }
    let mut images = retained.unwrap_or_else(|| current.to_vec());
    images.extend(uploaded);
    Some(images)
}

fn badge_update(uploaded: Option<String>, typed: Option<&str>) -> Option<Option<String>> {
    match (uploaded, typed) {
        (Some(url), _) => Some(Some(url)),
        (None, Some(value)) => Some(non_blank(Some(value))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn create_form() -> ProductForm {
        ProductForm {
            old_name: Some("  Vita Max ".to_string()),
            new_name: Some("Vita Ultra".to_string()),
            category_id: Some("cat-1".to_string()),
            next_redirect_url: Some("https://shop.example.com".to_string()),
            redirect_timer: Some("15".to_string()),
            theme: Some("dark".to_string()),
            ..ProductForm::default()
        }
    }

    fn current_product() -> Product {
        Product {
            id: "p-1".to_string(),
            old_name: "Vita Max".to_string(),
            new_name: "Vita Ultra".to_string(),
            category_id: Some("cat-1".to_string()),
            old_images: vec!["/uploads/a.png".to_string()],
            new_images: vec!["/uploads/b.png".to_string()],
            badge_image_url: Some("/uploads/badge.png".to_string()),
            extra_badge_1: None,
            extra_badge_2: None,
            next_redirect_url: "https://shop.example.com".to_string(),
            redirect_timer: 10,
            theme: Theme::Light,
            generated_link: "http://localhost:8080/product/vita-max-p-1".to_string(),
            meta_description: None,
            seo_title: None,
            domain: None,
            total_clicks: 0,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("timestamp"),
            category_name: None,
            description: None,
            description_points: Vec::new(),
        }
    }

    #[test]
    fn create_form_converts_with_uploaded_images() {
        let images = StoredImages {
            old_images: vec!["/uploads/old.png".to_string()],
            badge_image_url: Some("/uploads/badge.png".to_string()),
            ..StoredImages::default()
        };
        let form = ProductForm {
            badge_image_url: Some("https://cdn.example.com/typed.png".to_string()),
            extra_badge_1: Some("https://cdn.example.com/extra.png".to_string()),
            seo_title: Some("  ".to_string()),
            ..create_form()
        };

        let product = form.into_new_product(images).expect("conversion");

        assert_eq!(product.old_name, "Vita Max");
        assert_eq!(product.category_id, "cat-1");
        assert_eq!(product.redirect_timer, 15);
        assert_eq!(product.theme, Theme::Dark);
        assert_eq!(product.old_images, vec!["/uploads/old.png".to_string()]);
        assert!(product.new_images.is_empty());
        assert_eq!(product.badge_image_url.as_deref(), Some("/uploads/badge.png"));
        assert_eq!(
            product.extra_badge_1.as_deref(),
            Some("https://cdn.example.com/extra.png")
        );
        assert_eq!(product.seo_title, None);
        assert_eq!(product.domain, None);
    }

    #[test]
    fn create_form_requires_names_category_and_redirect() {
        let missing_category = ProductForm {
            category_id: Some(" ".to_string()),
            ..create_form()
        };
        let missing_redirect = ProductForm {
            next_redirect_url: None,
            ..create_form()
        };

        assert!(matches!(
            missing_category.into_new_product(StoredImages::default()),
            Err(ProductFormError::MissingField("category_id"))
        ));
        assert!(matches!(
            missing_redirect.into_new_product(StoredImages::default()),
            Err(ProductFormError::MissingField("next_redirect_url"))
        ));
    }

    #[test]
    fn create_form_rejects_bad_timer_and_theme() {
        let negative = ProductForm {
            redirect_timer: Some("-5".to_string()),
            ..create_form()
        };
        let garbage = ProductForm {
            redirect_timer: Some("soon".to_string()),
            ..create_form()
        };
        let theme = ProductForm {
            theme: Some("neon".to_string()),
            ..create_form()
        };

        assert!(matches!(
            negative.into_new_product(StoredImages::default()),
            Err(ProductFormError::InvalidTimer(_))
        ));
        assert!(matches!(
            garbage.into_new_product(StoredImages::default()),
            Err(ProductFormError::InvalidTimer(_))
        ));
        assert!(matches!(
            theme.into_new_product(StoredImages::default()),
            Err(ProductFormError::Theme(_))
        ));
    }

    #[test]
    fn image_lists_must_be_json_string_arrays() {
        let form = ProductForm {
            old_images_existing: Some("{\"url\": 1}".to_string()),
            ..ProductForm::default()
        };

        assert!(matches!(
            form.into_update_product(StoredImages::default(), &current_product()),
            Err(ProductFormError::InvalidImageList {
                field: "old_images_existing"
            })
        ));
    }

    #[test]
    fn empty_edit_form_changes_nothing() {
        let update = ProductForm::default()
            .into_update_product(StoredImages::default(), &current_product())
            .expect("conversion");

        assert!(update.is_empty());
    }

    #[test]
    fn edit_form_merges_retained_and_uploaded_images() {
        let form = ProductForm {
            old_images_existing: Some("[]".to_string()),
            ..ProductForm::default()
        };
        let images = StoredImages {
            old_images: vec!["/uploads/c.png".to_string()],
            new_images: vec!["/uploads/d.png".to_string()],
            ..StoredImages::default()
        };

        let update = form
            .into_update_product(images, &current_product())
            .expect("conversion");

        assert_eq!(update.old_images, Some(vec!["/uploads/c.png".to_string()]));
        assert_eq!(
            update.new_images,
            Some(vec!["/uploads/b.png".to_string(), "/uploads/d.png".to_string()])
        );
    }

    #[test]
    fn edit_form_clears_blank_optional_fields() {
        let form = ProductForm {
            old_name: Some(" ".to_string()),
            badge_image_url: Some(String::new()),
            domain: Some(" ".to_string()),
            seo_title: Some("Fresh title".to_string()),
            redirect_timer: Some("0".to_string()),
            ..ProductForm::default()
        };

        let update = form
            .into_update_product(StoredImages::default(), &current_product())
            .expect("conversion");

        assert_eq!(update.old_name, None);
        assert_eq!(update.badge_image_url, Some(None));
        assert_eq!(update.domain, Some(None));
        assert_eq!(update.seo_title, Some(Some("Fresh title".to_string())));
        assert_eq!(update.redirect_timer, Some(0));
        assert_eq!(update.extra_badge_1, None);
    }
}
