//! Color themes

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use tracing::{debug, info};

/// The selectable palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeId {
    Light,
    Dark,
    Retro,
    Sunset,
    Ocean,
    Yellow,
    Green,
    Purple,
    SkyBlue,
}

/// Background of a palette: a flat color or a left-to-right gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(&'static str),
    Gradient { from: &'static str, to: &'static str },
}

impl Background {
    /// CSS value for the background
    pub fn css(&self) -> String {
        match self {
            Background::Solid(color) => color.to_string(),
            Background::Gradient { from, to } => format!("linear-gradient(to right, {}, {})", from, to),
        }
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Colors consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteStyle {
    pub background: Background,
    pub text: &'static str,
    pub accent: &'static str,
}

impl ThemeId {
    pub fn all() -> [ThemeId; 9] {
        [
            ThemeId::Light,
            ThemeId::Dark,
            ThemeId::Retro,
            ThemeId::Sunset,
            ThemeId::Ocean,
            ThemeId::Yellow,
            ThemeId::Green,
            ThemeId::Purple,
            ThemeId::SkyBlue,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
            ThemeId::Retro => "retro",
            ThemeId::Sunset => "sunset",
            ThemeId::Ocean => "ocean",
            ThemeId::Yellow => "yellow",
            ThemeId::Green => "green",
            ThemeId::Purple => "purple",
            ThemeId::SkyBlue => "skyBlue",
        }
    }

    pub fn palette(self) -> PaletteStyle {
        use Background::{Gradient, Solid};

        let (background, text, accent) = match self {
            ThemeId::Light => (Solid("#ffffff"), "#000000", "#ff6347"),
            ThemeId::Dark => (Solid("#1a202c"), "#ffffff", "#48bb78"),
            ThemeId::Retro => (Solid("#fdf6e3"), "#657b83", "#b58900"),
            ThemeId::Sunset => (Gradient { from: "#ff9966", to: "#ff5e62" }, "#ffffff", "#ff5e62"),
            ThemeId::Ocean => (Gradient { from: "#2980B9", to: "#6DD5FA" }, "#ffffff", "#2980B9"),
            ThemeId::Yellow => (Gradient { from: "#F9D423", to: "#FFCC00" }, "#ffffff", "#F9D423"),
            ThemeId::Green => (Gradient { from: "#A8D5BA", to: "#71B280" }, "#ffffff", "#71B280"),
            ThemeId::Purple => (Gradient { from: "#654EA3", to: "#EAAFC8" }, "#ffffff", "#654EA3"),
            ThemeId::SkyBlue => (Gradient { from: "#87CEEB", to: "#B0E0E6" }, "#ffffff", "#71B280"),
        };
        PaletteStyle { background, text, accent }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeId::Light),
            "dark" => Ok(ThemeId::Dark),
            "retro" => Ok(ThemeId::Retro),
            "sunset" | "red" => Ok(ThemeId::Sunset),
            "ocean" | "blue" => Ok(ThemeId::Ocean),
            "yellow" => Ok(ThemeId::Yellow),
            "green" => Ok(ThemeId::Green),
            "purple" => Ok(ThemeId::Purple),
            "skyBlue" | "sky-blue" => Ok(ThemeId::SkyBlue),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Holds the user's current theme choice
#[derive(Debug, Clone)]
pub struct ThemeSelector {
    current: ThemeId,
}

impl ThemeSelector {
    pub fn new(initial: ThemeId) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> ThemeId {
        self.current
    }

    pub fn palette(&self) -> PaletteStyle {
        self.current.palette()
    }

    /// Switch to the theme named `id`. Unknown names leave the theme unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        match id.parse::<ThemeId>() {
            Ok(theme) => {
                info!("Theme changed: {} -> {}", self.current, theme);
                self.current = theme;
                true
            }
            Err(e) => {
                debug!("{}, keeping {}", e, self.current);
                false
            }
        }
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new(ThemeId::Light)
    }
}
