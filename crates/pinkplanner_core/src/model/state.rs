//! Root state record.

use crate::model::category::{default_categories, Category};
use crate::model::event::Event;
use crate::model::habit::Habit;
use crate::model::note::Note;
use crate::model::settings::Settings;
use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// The single tree holding every entity and the settings record.
///
/// Serialized as one JSON object; there is no schema version field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTree {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub settings: Settings,
}

impl StateTree {
    /// First-run tree: default categories, everything else empty.
    pub fn seeded() -> Self {
        Self {
            categories: default_categories(),
            ..Self::default()
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::StateTree;

    #[test]
    fn seeded_tree_has_three_named_categories_and_nothing_else() {
        let tree = StateTree::seeded();
        let names: Vec<&str> = tree.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["School", "Work", "Personal"]);
        assert!(tree.tasks.is_empty());
        assert!(tree.events.is_empty());
        assert!(tree.notes.is_empty());
        assert!(tree.habits.is_empty());
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let json = serde_json::to_value(StateTree::seeded()).expect("tree should encode");
        assert_eq!(json["settings"]["showQuotes"], serde_json::json!(true));
        assert_eq!(json["settings"]["theme"], "strawberry-milk");
        assert_eq!(json["categories"][0]["id"], "cat_school");
    }
}
