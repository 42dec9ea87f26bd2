//! Variant resolution policy.
//!
//! The editor exposes a mode setting with three meaningful values:
//!
//! - `light` / `dark`: force that variant.
//! - `auto`: follow the active color theme. The theme is looked up by exact
//!   name in the installed-theme list; the first entry with that name wins.
//!   An unknown theme resolves to light.
//!
//! Any other value (including a missing setting) resolves to light, so newer
//! settings written by a future host degrade gracefully.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TitlebarError;
use crate::settings::{SettingsReader, MODE_KEY, THEME_KEY};
use crate::themes::ThemeInfo;

/// The light/dark classification written to `_GTK_THEME_VARIANT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Light,
    Dark,
}

impl Variant {
    /// The property value for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = TitlebarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Variant::Light),
            "dark" => Ok(Variant::Dark),
            other => Err(TitlebarError::UnknownVariant(other.to_string())),
        }
    }
}

/// The user's mode setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Light,
    Dark,
    /// Follow the active color theme.
    Auto,
    /// Any value this version does not understand, or a missing setting
    /// (stored as the empty string).
    Unsupported(String),
}

impl Mode {
    /// Interpret a raw setting value. Matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "light" => Mode::Light,
            "dark" => Mode::Dark,
            "auto" => Mode::Auto,
            other => Mode::Unsupported(other.to_string()),
        }
    }

    /// Interpret a setting that may be absent.
    pub fn from_setting(raw: Option<&str>) -> Self {
        raw.map(Mode::parse)
            .unwrap_or_else(|| Mode::Unsupported(String::new()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Light => f.write_str("light"),
            Mode::Dark => f.write_str("dark"),
            Mode::Auto => f.write_str("auto"),
            Mode::Unsupported(raw) => write!(f, "unsupported({:?})", raw),
        }
    }
}

impl From<&str> for Mode {
    fn from(raw: &str) -> Self {
        Mode::parse(raw)
    }
}

/// Resolve the effective variant.
///
/// `active_theme` is only consulted in [`Mode::Auto`].
pub fn resolve(mode: &Mode, themes: &[ThemeInfo], active_theme: Option<&str>) -> Variant {
    match mode {
        Mode::Light => Variant::Light,
        Mode::Dark => Variant::Dark,
        Mode::Auto => active_theme
            .and_then(|name| themes.iter().find(|theme| theme.name == name))
            .map(|theme| theme.variant)
            .unwrap_or(Variant::Light),
        Mode::Unsupported(_) => Variant::Light,
    }
}

/// Resolve the effective variant from editor settings.
///
/// Reads [`MODE_KEY`], and in `auto` mode also [`THEME_KEY`]. Values the
/// reader cannot supply count as absent.
pub fn resolve_from_settings<S>(settings: &S, themes: &[ThemeInfo]) -> Variant
where
    S: SettingsReader + ?Sized,
{
    let mode = Mode::from_setting(settings.get(MODE_KEY).as_deref());
    let active_theme = match mode {
        Mode::Auto => settings.get(THEME_KEY),
        _ => None,
    };
    let variant = resolve(&mode, themes, active_theme.as_deref());
    tracing::debug!(%mode, active_theme = ?active_theme, %variant, "resolved variant");
    variant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MapSettings;

    fn themes() -> Vec<ThemeInfo> {
        vec![
            ThemeInfo::new("Monokai", Variant::Dark),
            ThemeInfo::new("Tomorrow", Variant::Light),
        ]
    }

    #[test]
    fn light_mode_is_light() {
        assert_eq!(resolve(&Mode::Light, &[], None), Variant::Light);
    }

    #[test]
    fn dark_mode_is_dark() {
        assert_eq!(resolve(&Mode::Dark, &[], None), Variant::Dark);
    }

    #[test]
    fn forced_modes_ignore_active_theme() {
        assert_eq!(resolve(&Mode::Light, &themes(), Some("Monokai")), Variant::Light);
        assert_eq!(resolve(&Mode::Dark, &themes(), Some("Tomorrow")), Variant::Dark);
    }

    #[test]
    fn auto_follows_active_theme() {
        assert_eq!(resolve(&Mode::Auto, &themes(), Some("Monokai")), Variant::Dark);
        assert_eq!(resolve(&Mode::Auto, &themes(), Some("Tomorrow")), Variant::Light);
    }

    #[test]
    fn auto_with_unknown_theme_is_light() {
        let themes = vec![ThemeInfo::new("Monokai", Variant::Dark)];
        assert_eq!(resolve(&Mode::Auto, &themes, Some("Tomorrow")), Variant::Light);
    }

    #[test]
    fn auto_with_empty_list_or_no_theme_is_light() {
        assert_eq!(resolve(&Mode::Auto, &[], Some("Monokai")), Variant::Light);
        assert_eq!(resolve(&Mode::Auto, &themes(), None), Variant::Light);
    }

    #[test]
    fn auto_first_duplicate_wins() {
        let themes = vec![
            ThemeInfo::new("Solarized", Variant::Dark),
            ThemeInfo::new("Solarized", Variant::Light),
        ];
        assert_eq!(resolve(&Mode::Auto, &themes, Some("Solarized")), Variant::Dark);
    }

    #[test]
    fn auto_matches_names_exactly() {
        assert_eq!(resolve(&Mode::Auto, &themes(), Some("monokai")), Variant::Light);
        assert_eq!(resolve(&Mode::Auto, &themes(), Some("Monokai ")), Variant::Light);
    }

    #[test]
    fn unsupported_mode_is_light() {
        let mode = Mode::parse("something else");
        assert_eq!(mode, Mode::Unsupported("something else".to_string()));
        assert_eq!(resolve(&mode, &themes(), Some("Monokai")), Variant::Light);
    }

    #[test]
    fn mode_parse_is_case_sensitive() {
        assert!(matches!(Mode::parse("Dark"), Mode::Unsupported(_)));
        assert_eq!(Mode::from("auto"), Mode::Auto);
    }

    #[test]
    fn missing_mode_is_unsupported() {
        assert_eq!(Mode::from_setting(None), Mode::Unsupported(String::new()));
    }

    #[test]
    fn variant_round_trips_through_str() {
        assert_eq!("dark".parse::<Variant>().unwrap(), Variant::Dark);
        assert_eq!(Variant::Light.to_string(), "light");
        assert!(matches!(
            "dim".parse::<Variant>(),
            Err(TitlebarError::UnknownVariant(v)) if v == "dim"
        ));
    }

    #[test]
    fn settings_light() {
        let settings = MapSettings::new().with(MODE_KEY, "light");
        assert_eq!(resolve_from_settings(&settings, &[]), Variant::Light);
    }

    #[test]
    fn settings_dark() {
        let settings = MapSettings::new().with(MODE_KEY, "dark");
        assert_eq!(resolve_from_settings(&settings, &[]), Variant::Dark);
    }

    #[test]
    fn settings_auto_uses_color_theme() {
        let settings = MapSettings::new()
            .with(MODE_KEY, "auto")
            .with(THEME_KEY, "Monokai");
        assert_eq!(resolve_from_settings(&settings, &themes()), Variant::Dark);
    }

    #[test]
    fn settings_auto_unknown_theme() {
        let settings = MapSettings::new()
            .with(MODE_KEY, "auto")
            .with(THEME_KEY, "Tomorrow");
        let themes = vec![ThemeInfo::new("Monokai", Variant::Dark)];
        assert_eq!(resolve_from_settings(&settings, &themes), Variant::Light);
    }

    #[test]
    fn settings_unsupported_value() {
        let settings = MapSettings::new().with(MODE_KEY, "something else");
        assert_eq!(resolve_from_settings(&settings, &[]), Variant::Light);
    }

    #[test]
    fn settings_missing_everything() {
        assert_eq!(resolve_from_settings(&MapSettings::new(), &themes()), Variant::Light);
    }
}
