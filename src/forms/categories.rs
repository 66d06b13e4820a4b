use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory, truncate_points};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum length allowed for a category name.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum length allowed for a category description.
const DESCRIPTION_MAX_LEN: usize = 4096;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Result type returned by the category form helpers.
pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category forms.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("category name is required")]
    EmptyName,
    #[error("category description is required")]
    EmptyDescription,
    #[error("at least one description point is required")]
    NoDescriptionPoints,
}

/// JSON payload accepted when creating a category.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: String,
    /// Bullet points; only the first four are kept.
    #[serde(default)]
    pub description_points: Vec<String>,
}

impl AddCategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self) -> CategoryFormResult<NewCategory> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let description = sanitize_multiline_text(&self.description);
        if description.is_empty() {
            return Err(CategoryFormError::EmptyDescription);
        }

        let points = truncate_points(sanitize_points(self.description_points));
        if points.iter().all(String::is_empty) {
            return Err(CategoryFormError::NoDescriptionPoints);
        }

        Ok(NewCategory::new(name, description, points))
    }
}

/// JSON payload accepted when updating a category; absent fields stay as they are.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditCategoryForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
    pub description_points: Option<Vec<String>>,
}

impl EditCategoryForm {
    /// Validates and sanitizes the payload into a domain `UpdateCategory`.
    ///
    /// Blank names and descriptions are ignored rather than stored.
    pub fn into_update_category(self) -> CategoryFormResult<UpdateCategory> {
        self.validate()?;

        let mut update = UpdateCategory::new();

        let name = self
            .name
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());
        if let Some(name) = name {
            update = update.name(name);
        }

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());
        if let Some(description) = description {
            update = update.description(description);
        }

        if let Some(points) = self.description_points {
            update = update.description_points(sanitize_points(points));
        }

        Ok(update)
    }
}

fn sanitize_points(points: Vec<String>) -> Vec<String> {
    points
        .iter()
        .map(|point| sanitize_inline_text(point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn add_category_form_sanitizes_and_converts() {
        let form = AddCategoryForm {
            name: "  Supplements  ".to_string(),
            description: "  Daily\n\n\n vitamins  ".to_string(),
            description_points: strings(&[" p1 ", "", "p2"]),
        };

        let category = form
            .into_new_category()
            .expect("expected conversion to succeed");

        assert_eq!(category.name, "Supplements");
        assert_eq!(category.description, "Daily\n\nvitamins");
        assert_eq!(category.description_points, strings(&["p1", "", "p2"]));
    }

    #[test]
    fn add_category_form_keeps_first_four_points() {
        let form = AddCategoryForm {
            name: "Supplements".to_string(),
            description: "d".to_string(),
            description_points: strings(&["1", "2", "3", "4", "5", "6"]),
        };

        let category = form.into_new_category().expect("conversion");

        assert_eq!(category.description_points, strings(&["1", "2", "3", "4"]));
    }

    #[test]
    fn add_category_form_requires_every_field() {
        let missing_name = AddCategoryForm {
            name: "  ".to_string(),
            description: "d".to_string(),
            description_points: strings(&["p"]),
        };
        let missing_description = AddCategoryForm {
            name: "n".to_string(),
            description: String::new(),
            description_points: strings(&["p"]),
        };
        let missing_points = AddCategoryForm {
            name: "n".to_string(),
            description: "d".to_string(),
            description_points: strings(&[" "]),
        };

        assert!(matches!(
            missing_name.into_new_category(),
            Err(CategoryFormError::EmptyName)
        ));
        assert!(matches!(
            missing_description.into_new_category(),
            Err(CategoryFormError::EmptyDescription)
        ));
        assert!(matches!(
            missing_points.into_new_category(),
            Err(CategoryFormError::NoDescriptionPoints)
        ));
    }

    #[test]
    fn add_category_form_rejects_overlong_name() {
        let form = AddCategoryForm {
            name: "x".repeat(NAME_MAX_LEN + 1),
            description: "d".to_string(),
            description_points: strings(&["p"]),
        };

        assert!(matches!(
            form.into_new_category(),
            Err(CategoryFormError::Validation(_))
        ));
    }

    #[test]
    fn edit_category_form_only_sets_supplied_fields() {
        let form = EditCategoryForm {
            name: Some("  ".to_string()),
            description: Some(" New copy ".to_string()),
            description_points: None,
        };

        let update = form.into_update_category().expect("conversion");

        assert_eq!(update.name, None);
        assert_eq!(update.description.as_deref(), Some("New copy"));
        assert_eq!(update.description_points, None);
    }

    #[test]
    fn edit_category_form_truncates_points() {
        let form = EditCategoryForm {
            description_points: Some(strings(&["a", " ", "b", "c", "d", "e"])),
            ..EditCategoryForm::default()
        };

        let update = form.into_update_category().expect("conversion");

        assert_eq!(
            update.description_points,
            Some(strings(&["a", "b", "c", "d"]))
        );
    }
}
