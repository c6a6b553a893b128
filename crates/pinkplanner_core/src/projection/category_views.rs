//! Category-derived lists: form select options and the sidebar.
//!
//! Every category change refreshes every view here, whether or not any
//! entity references the changed category.

use crate::notify::{ChangeListener, EntityKind, Snapshot};
use crate::service::category_service::{self, CategoryOption};

/// Edit form that shows a category select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Task,
    Event,
    Note,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::Task, FormKind::Event, FormKind::Note];
}

/// Select options for one form.
#[derive(Debug)]
pub struct CategoryOptionsView {
    form: FormKind,
    options: Vec<CategoryOption>,
    refreshes: usize,
}

impl CategoryOptionsView {
    pub fn new(form: FormKind) -> Self {
        Self {
            form,
            options: Vec::new(),
            refreshes: 0,
        }
    }

    pub fn form(&self) -> FormKind {
        self.form
    }

    pub fn options(&self) -> &[CategoryOption] {
        &self.options
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl ChangeListener for CategoryOptionsView {
    fn name(&self) -> &'static str {
        match self.form {
            FormKind::Task => "task_category_options",
            FormKind::Event => "event_category_options",
            FormKind::Note => "note_category_options",
        }
    }

    fn interests(&self) -> &[EntityKind] {
        &[EntityKind::Category]
    }

    fn refresh(&mut self, snapshot: &Snapshot<'_>) {
        self.options = category_service::options(&snapshot.tree.categories);
        self.refreshes += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Category list shown in the navigation sidebar.
#[derive(Debug, Default)]
pub struct CategorySidebarView {
    rows: Vec<SidebarRow>,
}

impl CategorySidebarView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[SidebarRow] {
        &self.rows
    }
}

impl ChangeListener for CategorySidebarView {
    fn name(&self) -> &'static str {
        "category_sidebar"
    }

    fn interests(&self) -> &[EntityKind] {
        &[EntityKind::Category]
    }

    fn refresh(&mut self, snapshot: &Snapshot<'_>) {
        self.rows = snapshot
            .tree
            .categories
            .iter()
            .map(|category| SidebarRow {
                id: category.id.clone(),
                name: category.name.clone(),
                color: category.color.clone(),
            })
            .collect();
    }
}
