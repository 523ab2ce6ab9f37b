//! Visitor settings: UI locale and colour theme.
//!
//! Both live in cookies and are read once per request. They change only
//! through [`Settings::update`], which reports its effects instead of
//! performing them, so the caller decides how to persist and apply.

use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";
pub const THEME_COOKIE: &str = "theme";
/// Local-storage key the page script mirrors the theme into.
pub const THEME_STORAGE_KEY: &str = "theme";
const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ko];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }

    /// Name shown in the language selector, in the language itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ko => "한국어",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExplorerError::InvalidSetting(format!("unsupported locale: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ExplorerError::InvalidSetting(format!("unsupported theme: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub locale: Locale,
    /// `None` until the visitor picks one; no root class is applied then.
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    SetLocale(Locale),
    ToggleTheme,
    SetTheme(Theme),
}

/// How a changed setting reaches the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootChange {
    /// Replace the root element's theme class before paint.
    ThemeClass(Theme),
    /// Re-render the whole document in the new locale.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEffect {
    /// `Set-Cookie` header values to send.
    Persist { cookies: Vec<String> },
    ApplyToRoot(RootChange),
}

impl Settings {
    pub fn new(default_locale: Locale) -> Self {
        Settings {
            locale: default_locale,
            theme: None,
        }
    }

    /// Reads both settings from a raw `Cookie` header. Unknown or malformed
    /// values fall back to the defaults.
    pub fn from_cookie_header(header: Option<&str>, default_locale: Locale) -> Self {
        let mut settings = Settings::new(default_locale);
        let Some(header) = header else {
            return settings;
        };

        for (name, value) in parse_cookie_pairs(header) {
            match name {
                LOCALE_COOKIE => {
                    if let Ok(locale) = value.parse() {
                        settings.locale = locale;
                    }
                }
                THEME_COOKIE => {
                    if let Ok(theme) = value.parse() {
                        settings.theme = Some(theme);
                    }
                }
                _ => {}
            }
        }

        settings
    }

    /// Class for the document root, empty when no theme was chosen.
    pub fn root_class(&self) -> &'static str {
        self.theme.map(|theme| theme.as_str()).unwrap_or("")
    }

    /// Applies an update. The returned effects are always exactly one
    /// `Persist` followed by one `ApplyToRoot`.
    pub fn update(&mut self, update: SettingsUpdate) -> Vec<SettingsEffect> {
        match update {
            SettingsUpdate::SetLocale(locale) => {
                self.locale = locale;
                vec![
                    SettingsEffect::Persist {
                        cookies: vec![set_cookie(LOCALE_COOKIE, locale.code())],
                    },
                    SettingsEffect::ApplyToRoot(RootChange::Reload),
                ]
            }
            SettingsUpdate::ToggleTheme => {
                let next = self.theme.unwrap_or(Theme::Light).toggled();
                self.update(SettingsUpdate::SetTheme(next))
            }
            SettingsUpdate::SetTheme(theme) => {
                self.theme = Some(theme);
                vec![
                    SettingsEffect::Persist {
                        cookies: vec![set_cookie(THEME_COOKIE, theme.as_str())],
                    },
                    SettingsEffect::ApplyToRoot(RootChange::ThemeClass(theme)),
                ]
            }
        }
    }
}

fn set_cookie(name: &str, value: &str) -> String {
    format!("{}={}; Path=/; Max-Age={}; SameSite=Lax", name, value, COOKIE_MAX_AGE_SECS)
}

fn parse_cookie_pairs(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        Some((name.trim(), value.trim().trim_matches('"')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookie_pairs_with_noise() {
        let pairs: Vec<_> = parse_cookie_pairs(" a=1; broken ; NEXT_LOCALE=\"ko\";theme=dark").collect();
        assert_eq!(pairs, vec![("a", "1"), ("NEXT_LOCALE", "ko"), ("theme", "dark")]);
    }

    #[test]
    fn set_cookie_carries_path_and_max_age() {
        let cookie = set_cookie(THEME_COOKIE, "dark");
        assert!(cookie.starts_with("theme=dark;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
    }
}
