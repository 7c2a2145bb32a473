//! Theme preference values and resolution.

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Client hint header carrying the browser's colour-scheme preference.
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

/// Stored theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    /// Effective dark flag for this preference given the OS signal.
    #[must_use]
    pub fn resolve(self, os_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => os_prefers_dark,
        }
    }

    /// Global class applied to the document root.
    ///
    /// `theme-light` pins light styling, `dark` enables dark styling. A
    /// system preference under a light OS gets no class at all.
    #[must_use]
    pub fn root_class(self, os_prefers_dark: bool) -> &'static str {
        match self {
            Self::Light => "theme-light",
            Self::Dark => "dark",
            Self::System if os_prefers_dark => "dark",
            Self::System => "",
        }
    }

    /// Parse a stored value, treating anything missing or unknown as `system`.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(Error::InvalidPreference(other.to_string())),
        }
    }
}

/// The operating system's colour-scheme signal as reported by a browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsSignal {
    #[default]
    Light,
    Dark,
}

impl OsSignal {
    #[must_use]
    pub fn prefers_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Read the `Sec-CH-Prefers-Color-Scheme` client hint, defaulting to light.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(COLOR_SCHEME_HINT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"'))
            .map_or(Self::Light, |v| {
                if v.eq_ignore_ascii_case("dark") {
                    Self::Dark
                } else {
                    Self::Light
                }
            })
    }
}

impl From<bool> for OsSignal {
    fn from(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}
