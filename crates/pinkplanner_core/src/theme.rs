//! Theme palettes and the settings binding that selects one.
//!
//! # Invariants
//! - Only `strawberry-milk` and `blueberry-sky` are recognized; any other
//!   stored value resolves to the default palette.
//! - `toggle` persists the new name before the palette is reapplied.

use crate::notify::EntityKind;
use crate::repo::state_repo::StateRepository;
use crate::store::StateStore;
use log::info;

/// Recognized theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeName {
    StrawberryMilk,
    BlueberrySky,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrawberryMilk => "strawberry-milk",
            Self::BlueberrySky => "blueberry-sky",
        }
    }

    /// `None` for anything outside the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strawberry-milk" => Some(Self::StrawberryMilk),
            "blueberry-sky" => Some(Self::BlueberrySky),
            _ => None,
        }
    }

    /// Resolves a stored name, falling back to the default theme.
    pub fn resolve(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::StrawberryMilk)
    }

    pub fn other(self) -> Self {
        match self {
            Self::StrawberryMilk => Self::BlueberrySky,
            Self::BlueberrySky => Self::StrawberryMilk,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::StrawberryMilk => Palette {
                theme: self,
                vars: &[("--bg-main", "#fff6fb"), ("--pink-main", "#ff72b6")],
            },
            Self::BlueberrySky => Palette {
                theme: self,
                vars: &[("--bg-main", "#f3f5ff"), ("--pink-main", "#5f8bff")],
            },
        }
    }
}

/// Named style variables for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub theme: ThemeName,
    pub vars: &'static [(&'static str, &'static str)],
}

impl Palette {
    pub fn get(&self, var: &str) -> Option<&'static str> {
        self.vars
            .iter()
            .find(|(name, _)| *name == var)
            .map(|(_, value)| *value)
    }
}

/// Presentation layer that receives palettes.
pub trait PaletteSink {
    fn apply_palette(&mut self, palette: &Palette);
}

/// Settings-bound theme operations on a store.
pub struct ThemeController<'s, R: StateRepository> {
    store: &'s mut StateStore<R>,
}

impl<'s, R: StateRepository> ThemeController<'s, R> {
    pub fn new(store: &'s mut StateStore<R>) -> Self {
        Self { store }
    }

    /// Theme currently in effect for the stored settings.
    pub fn current(&self) -> ThemeName {
        ThemeName::resolve(&self.store.get().settings.theme)
    }

    /// Applies the palette of the stored theme.
    pub fn apply_saved(&self, sink: &mut dyn PaletteSink) -> ThemeName {
        let theme = self.current();
        sink.apply_palette(&theme.palette());
        theme
    }

    /// Switches to the other theme, persists it, and reapplies.
    pub fn toggle(&mut self, sink: &mut dyn PaletteSink) -> ThemeName {
        let next = self.current().other();
        self.store.mutate(EntityKind::Settings, |tree| {
            tree.settings.theme = next.as_str().to_string();
        });
        info!(
            "event=theme_toggle module=theme status=ok theme={}",
            next.as_str()
        );
        self.apply_saved(sink)
    }
}
