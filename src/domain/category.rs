use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Maximum number of bullet points a category may carry.
pub const MAX_DESCRIPTION_POINTS: usize = 4;

/// Reusable descriptive copy (text plus bullet points) shared by products.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    /// UUID assigned on creation.
    pub id: String,
    /// Unique display name.
    pub name: String,
    /// Free text shown on product pages.
    pub description: String,
    /// Up to four bullet points shown below the description.
    pub description_points: Vec<String>,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Number of products currently assigned to the category.
    pub product_count: i64,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub description_points: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl NewCategory {
    /// Build a new category payload; points are trimmed and truncated to
    /// [`MAX_DESCRIPTION_POINTS`], blank entries included.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        description_points: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            description_points: truncate_points(description_points),
            created_at: Local::now().naive_utc(),
        }
    }
}

/// Patch data applied when updating an existing category. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub description_points: Option<Vec<String>>,
}

impl UpdateCategory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the bullet points, normalized the same way as on creation.
    pub fn description_points(mut self, points: impl IntoIterator<Item = String>) -> Self {
        self.description_points = Some(normalize_points(points));
        self
    }

    /// Whether the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.description_points.is_none()
    }
}

/// Trim bullet points and keep the first [`MAX_DESCRIPTION_POINTS`] as given.
pub fn truncate_points(points: impl IntoIterator<Item = String>) -> Vec<String> {
    points
        .into_iter()
        .map(|point| point.trim().to_string())
        .take(MAX_DESCRIPTION_POINTS)
        .collect()
}

/// Trim bullet points, drop blank ones and keep at most
/// [`MAX_DESCRIPTION_POINTS`] in their original order.
pub fn normalize_points(points: impl IntoIterator<Item = String>) -> Vec<String> {
    points
        .into_iter()
        .map(|point| point.trim().to_string())
        .filter(|point| !point.is_empty())
        .take(MAX_DESCRIPTION_POINTS)
        .collect()
}
