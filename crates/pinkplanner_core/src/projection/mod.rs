//! Aggregates kept current by the change bus.
//!
//! Each view is a `ChangeListener` that caches the derived value a rendering
//! surface needs. Views never write to the state tree.

pub mod category_views;
pub mod dashboard;
pub mod today_panel;

pub use category_views::{CategoryOptionsView, CategorySidebarView, FormKind, SidebarRow};
pub use dashboard::{DashboardSummary, DashboardView, UpcomingEvent, WeekProgress};
pub use today_panel::{TodayPanel, TodayPanelView};
