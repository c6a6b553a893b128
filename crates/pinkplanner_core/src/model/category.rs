//! Category model shared by tasks, events and notes.

use serde::{Deserialize, Serialize};

/// Display label used when an entity has no category or a dangling one.
pub const NO_CATEGORY_LABEL: &str = "No category";

/// User-defined grouping with a display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Any CSS color expression; stored verbatim.
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Categories installed on first run.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("cat_school", "School", "var(--blue-accent)"),
        Category::new("cat_work", "Work", "var(--purple-accent)"),
        Category::new("cat_personal", "Personal", "var(--mint-accent)"),
    ]
}
