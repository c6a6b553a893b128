//! Category manager.
//!
//! # Invariants
//! - Deleting a category leaves referencing tasks, events and notes intact;
//!   their references dangle and resolve to `NO_CATEGORY_LABEL`.

use crate::model::category::{Category, NO_CATEGORY_LABEL};
use crate::model::ids::{issue_id, CATEGORY_ID_PREFIX};
use crate::model::validation::require_text;
use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::StateStore;
use log::info;

/// Caller-supplied category fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub color: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// One entry of a category select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

pub struct CategoryService<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> CategoryService<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    pub fn create(&mut self, input: CategoryInput) -> ServiceResult<Category> {
        let name = require_text("name", &input.name)?;
        let now = self.store.clock().now();
        let id = issue_id(
            CATEGORY_ID_PREFIX,
            now,
            self.store
                .get()
                .categories
                .iter()
                .map(|category| category.id.as_str()),
        );
        let category = Category::new(id, name, input.color.trim());

        let created = category.clone();
        self.store.mutate(EntityKind::Category, move |tree| {
            tree.categories.push(category)
        });
        info!(
            "event=category_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces name and color of category `id` in place.
    pub fn update(&mut self, id: &str, input: CategoryInput) -> ServiceResult<Category> {
        let name = require_text("name", &input.name)?;
        let index = self
            .store
            .get()
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Category, id))?;
        let category = Category::new(id, name, input.color.trim());

        let updated = category.clone();
        self.store.mutate(EntityKind::Category, move |tree| {
            tree.categories[index] = category
        });
        Ok(updated)
    }

    /// Removes category `id` without touching entities that reference it.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.store.mutate(EntityKind::Category, |tree| {
            tree.categories.retain(|category| category.id != id);
        });
        true
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.store.get().category(id)
    }

    pub fn list(&self) -> &[Category] {
        &self.store.get().categories
    }

    pub fn resolve(&self, id: Option<&str>) -> Option<&Category> {
        resolve(&self.store.get().categories, id)
    }

    pub fn label_for(&self, id: Option<&str>) -> &str {
        label_for(&self.store.get().categories, id)
    }

    pub fn options(&self) -> Vec<CategoryOption> {
        options(&self.store.get().categories)
    }
}

/// Looks up a possibly dangling reference.
pub fn resolve<'a>(categories: &'a [Category], id: Option<&str>) -> Option<&'a Category> {
    let id = id?;
    categories.iter().find(|category| category.id == id)
}

/// Category name for display, or `NO_CATEGORY_LABEL`.
pub fn label_for<'a>(categories: &'a [Category], id: Option<&str>) -> &'a str {
    resolve(categories, id).map_or(NO_CATEGORY_LABEL, |category| category.name.as_str())
}

/// Select-list entries in stored order.
pub fn options(categories: &[Category]) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|category| CategoryOption {
            id: category.id.clone(),
            name: category.name.clone(),
        })
        .collect()
}
