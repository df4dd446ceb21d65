//! Accent color resolution.
//!
//! Every template picks a single accent color and a set of visual roles ("targets") that are
//! allowed to use it.  Renderers never look at the accent directly; they ask a
//! [`ColorResolver`] for the color of a target and supply the color they would use otherwise.
//! The resolver is a plain value so it can be serialized next to the effective settings and
//! tested without any rendering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Color returned by [`ColorResolver::get_or_neutral`] when a target does not use the accent.
pub const NEUTRAL_COLOR: &str = "#333333";

/// Semantic role of a visual element that may opt into the accent color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTarget {
    /// The candidate name in the header.
    Name,
    /// The professional title below the name.
    Title,
    /// Section headings.
    Headings,
    /// The rule drawn under section headings.
    HeadingRule,
    /// Hyperlinks in body text and the contact line.
    Links,
    /// Link and contact glyphs.
    Icons,
    /// Date ranges next to entries.
    Dates,
    /// Entry titles such as job positions.
    EntryTitles,
    /// Entry subtitles such as company names.
    Subtitles,
    /// List markers.
    Bullets,
    /// Sidebar background fill.
    Sidebar,
}

impl ColorTarget {
    /// Every known target, mostly useful for templates that color everything.
    pub const ALL: [ColorTarget; 11] = [
        ColorTarget::Name,
        ColorTarget::Title,
        ColorTarget::Headings,
        ColorTarget::HeadingRule,
        ColorTarget::Links,
        ColorTarget::Icons,
        ColorTarget::Dates,
        ColorTarget::EntryTitles,
        ColorTarget::Subtitles,
        ColorTarget::Bullets,
        ColorTarget::Sidebar,
    ];
}

/// Strategy value mapping targets to either the accent color or a caller supplied fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorResolver {
    accent: String,
    targets: BTreeSet<ColorTarget>,
}

impl ColorResolver {
    /// Creates a resolver for `accent` that applies to the given targets.
    pub fn new<I>(accent: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = ColorTarget>,
    {
        Self {
            accent: accent.into(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Returns the accent color.
    pub fn accent(&self) -> &str {
        &self.accent
    }

    /// Returns whether `target` opts into the accent color.
    pub fn applies_to(&self, target: ColorTarget) -> bool {
        self.targets.contains(&target)
    }

    /// Returns the accent color if `target` is allowed, otherwise `fallback`.
    pub fn get<'a>(&'a self, target: ColorTarget, fallback: &'a str) -> &'a str {
        if self.applies_to(target) {
            &self.accent
        } else {
            fallback
        }
    }

    /// Like [`ColorResolver::get`] with [`NEUTRAL_COLOR`] as the fallback.
    pub fn get_or_neutral(&self, target: ColorTarget) -> &str {
        self.get(target, NEUTRAL_COLOR)
    }
}

/// An RGB triple parsed from a hex color string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parses `#RRGGBB` or `#RGB` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> Option<Rgb> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb(r, g, b))
        }
        3 => {
            let expand = |index: usize| {
                u8::from_str_radix(&hex[index..index + 1], 16)
                    .ok()
                    .map(|v| v * 17)
            };
            Some(Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_only_for_allowed_targets() {
        let resolver = ColorResolver::new("#0055aa", [ColorTarget::Headings, ColorTarget::Links]);
        for target in ColorTarget::ALL {
            let color = resolver.get(target, "#101010");
            if matches!(target, ColorTarget::Headings | ColorTarget::Links) {
                assert_eq!(color, "#0055aa");
            } else {
                assert_eq!(color, "#101010");
            }
        }
    }

    #[test]
    fn empty_allow_list_never_uses_accent() {
        let resolver = ColorResolver::new("#ff0000", []);
        assert_eq!(resolver.get_or_neutral(ColorTarget::Name), NEUTRAL_COLOR);
    }

    #[test]
    fn resolver_round_trips_through_json() {
        let resolver = ColorResolver::new("#123456", [ColorTarget::HeadingRule]);
        let json = serde_json::to_string(&resolver).expect("serialize");
        assert!(json.contains("heading-rule"));
        let back: ColorResolver = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, resolver);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#ff8000"), Some(Rgb(255, 128, 0)));
        assert_eq!(parse_hex("0a0"), Some(Rgb(0, 170, 0)));
        assert_eq!(parse_hex("#12FG34"), None);
        assert_eq!(parse_hex("#1234"), None);
    }
}
