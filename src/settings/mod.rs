//! Layout and theme settings.
//!
//! [`LayoutSettings`] is the full set of visual and structural knobs a resume template can
//! turn.  Every field has a default, so a settings object can always be produced from a
//! partial JSON document.  Templates and users never construct settings directly; they
//! provide JSON overrides that the [`merge`] module layers on top of the defaults to produce
//! the [`EffectiveSettings`] used for one render pass.

pub mod merge;

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::color::ColorTarget;
use crate::layout::HorizontalAlignment;

pub use merge::{merge_values, resolve};

/// Sections rendered when neither the template nor the user supplies an order.
pub const DEFAULT_SECTION_ORDER: &[&str] = &[
    "summary",
    "work",
    "education",
    "skills",
    "projects",
    "certificates",
    "languages",
    "interests",
    "publications",
    "awards",
    "references",
];

/// Marker style used by list-like sections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `•` markers.
    #[default]
    Bullet,
    /// `1.`, `2.`, ... markers.
    Number,
    /// `–` markers.
    Dash,
    /// Items are rendered as plain paragraphs.
    None,
}

impl ListStyle {
    /// Returns the marker for the item at `index` (zero based).
    pub fn marker(self, index: usize) -> Option<String> {
        match self {
            ListStyle::Bullet => Some("•".to_owned()),
            ListStyle::Number => Some(format!("{}.", index + 1)),
            ListStyle::Dash => Some("–".to_owned()),
            ListStyle::None => None,
        }
    }
}

/// How hyperlinks in the contact line are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDisplay {
    /// Contacts share one line, separated by the contact separator.
    #[default]
    Inline,
    /// Every contact is prefixed with the link icon.
    Icon,
    /// Link contacts are underlined.
    Underline,
    /// Every contact gets its own line.
    Newline,
}

/// Capitalization applied to section headings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingCase {
    /// `WORK EXPERIENCE`
    #[default]
    Uppercase,
    /// `work experience`
    Lowercase,
    /// `Work Experience`, with short function words kept lowercase.
    Titlecase,
    /// First letter of every word uppercased, the rest left untouched.
    Capitalize,
    /// Heading text is used as written.
    None,
}

/// How skills are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLayout {
    /// `Name: keyword, keyword` per skill.
    #[default]
    Grouped,
    /// All skill names joined on one line.
    Inline,
    /// One list item per skill name.
    List,
}

/// Placement of the date range relative to an entry title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePosition {
    /// Dates are right aligned on the title row.
    #[default]
    Right,
    /// Dates get their own line below the subtitle.
    Below,
}

/// Output format for parsed dates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `Jan 2023`
    #[default]
    Short,
    /// `January 2023`
    Long,
    /// `01/2023`
    Numeric,
    /// `2023`
    Year,
}

/// Paper sizes supported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// ISO A4, 595 × 842 pt.
    #[default]
    A4,
    /// US Letter, 612 × 792 pt.
    Letter,
}

impl PaperSize {
    /// Page dimensions in points.
    pub fn dimensions_pt(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (595.28, 841.89),
            PaperSize::Letter => (612.0, 792.0),
        }
    }
}

/// Typography of one sub-element (name, headings, body text, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    /// Fixed color; when unset the element's color target decides.
    pub color: Option<String>,
}

impl TextStyle {
    /// Creates a regular style with the given size.
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            bold: false,
            italic: false,
            color: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::sized(10.0)
    }
}

/// Font family names used for each weight/slant combination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontSet {
    pub regular: String,
    pub bold: Option<String>,
    pub italic: Option<String>,
    pub bold_italic: Option<String>,
}

impl FontSet {
    /// Picks the family for a run, preferring `boldItalic > bold > italic > regular`.
    pub fn resolve(&self, bold: bool, italic: bool) -> &str {
        let candidates = [
            (bold && italic, &self.bold_italic),
            (bold, &self.bold),
            (italic, &self.italic),
        ];
        candidates
            .iter()
            .find_map(|(wanted, family)| family.as_deref().filter(|_| *wanted))
            .unwrap_or(self.regular.as_str())
    }

    /// Every distinct family name referenced by this set.
    pub fn families(&self) -> Vec<&str> {
        let mut names = vec![self.regular.as_str()];
        for family in [&self.bold, &self.italic, &self.bold_italic]
            .into_iter()
            .flatten()
        {
            if !names.contains(&family.as_str()) {
                names.push(family);
            }
        }
        names
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            regular: crate::fonts::DEFAULT_FONT_FAMILY_NAME.to_owned(),
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }
}

/// Marker styles per list-bearing section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListStyles {
    pub summary: ListStyle,
    pub work: ListStyle,
    pub education: ListStyle,
    pub projects: ListStyle,
    pub skills: ListStyle,
    pub languages: ListStyle,
    pub interests: ListStyle,
    pub custom: ListStyle,
}

impl Default for ListStyles {
    fn default() -> Self {
        Self {
            summary: ListStyle::Bullet,
            work: ListStyle::Bullet,
            education: ListStyle::Bullet,
            projects: ListStyle::Bullet,
            skills: ListStyle::None,
            languages: ListStyle::None,
            interests: ListStyle::None,
            custom: ListStyle::Bullet,
        }
    }
}

/// Per-section content toggles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionOptions {
    pub show_skill_level: bool,
    pub skill_layout: SkillLayout,
    pub show_language_fluency: bool,
    pub show_interest_keywords: bool,
    pub show_award_summary: bool,
    pub show_publication_summary: bool,
    pub show_project_keywords: bool,
    pub show_education_score: bool,
    pub show_education_courses: bool,
    pub show_references: bool,
    pub show_location: bool,
    pub date_position: DatePosition,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            show_skill_level: false,
            skill_layout: SkillLayout::Grouped,
            show_language_fluency: true,
            show_interest_keywords: true,
            show_award_summary: true,
            show_publication_summary: true,
            show_project_keywords: true,
            show_education_score: true,
            show_education_courses: false,
            show_references: true,
            show_location: true,
            date_position: DatePosition::Right,
        }
    }
}

/// The complete set of layout, typography and behaviour settings.
///
/// Lengths are points.  Column widths are percentages of the content width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    // Structure.
    pub column_count: u8,
    pub left_column_width: f64,
    pub middle_column_width: f64,
    pub section_order: Vec<String>,
    pub left_column_sections: Option<Vec<String>>,
    pub middle_column_sections: Option<Vec<String>>,
    pub right_column_sections: Option<Vec<String>>,
    pub header_in_left_column: bool,
    pub column_gap: f64,
    pub section_spacing: f64,
    pub entry_spacing: f64,
    pub paper_size: PaperSize,
    pub margin_horizontal: f64,
    pub margin_vertical: f64,
    pub sidebar_background: bool,
    pub sidebar_background_color: Option<String>,
    pub show_page_numbers: bool,
    pub line_spacing: f64,

    // Typography.
    pub name: TextStyle,
    pub title: TextStyle,
    pub contact: TextStyle,
    pub heading: TextStyle,
    pub entry_title: TextStyle,
    pub entry_subtitle: TextStyle,
    pub entry_date: TextStyle,
    pub body: TextStyle,
    pub fonts: FontSet,

    // Headings.
    pub show_section_headings: bool,
    pub heading_case: HeadingCase,
    pub heading_rule: bool,
    pub section_titles: BTreeMap<String, String>,

    // Lists and section content.
    pub list_styles: ListStyles,
    pub section_options: SectionOptions,

    // Header and links.
    pub header_alignment: HorizontalAlignment,
    pub show_photo: bool,
    pub photo_size: f64,
    pub contact_separator: String,
    pub link_display: LinkDisplay,
    pub show_full_url: bool,
    pub show_link_icon: bool,
    pub link_icon: String,
    pub show_profiles: bool,

    // Dates.
    pub date_format: DateFormat,
    pub present_label: String,
    pub date_separator: String,

    // Colors.
    pub accent_color: Option<String>,
    pub color_targets: Option<Vec<ColorTarget>>,
    pub text_color: String,
    pub muted_color: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_count: 1,
            left_column_width: 32.0,
            middle_column_width: 34.0,
            section_order: DEFAULT_SECTION_ORDER
                .iter()
                .map(|id| (*id).to_owned())
                .collect(),
            left_column_sections: None,
            middle_column_sections: None,
            right_column_sections: None,
            header_in_left_column: false,
            column_gap: 14.0,
            section_spacing: 10.0,
            entry_spacing: 6.0,
            paper_size: PaperSize::A4,
            margin_horizontal: 40.0,
            margin_vertical: 36.0,
            sidebar_background: false,
            sidebar_background_color: None,
            show_page_numbers: false,
            line_spacing: 1.2,

            name: TextStyle::sized(24.0).bold(),
            title: TextStyle::sized(13.0),
            contact: TextStyle::sized(9.0),
            heading: TextStyle::sized(12.0).bold(),
            entry_title: TextStyle::sized(10.5).bold(),
            entry_subtitle: TextStyle::sized(10.0),
            entry_date: TextStyle::sized(9.0),
            body: TextStyle::sized(10.0),
            fonts: FontSet::default(),

            show_section_headings: true,
            heading_case: HeadingCase::Uppercase,
            heading_rule: true,
            section_titles: BTreeMap::new(),

            list_styles: ListStyles::default(),
            section_options: SectionOptions::default(),

            header_alignment: HorizontalAlignment::Left,
            show_photo: false,
            photo_size: 72.0,
            contact_separator: " | ".to_owned(),
            link_display: LinkDisplay::Inline,
            show_full_url: false,
            show_link_icon: false,
            link_icon: "→".to_owned(),
            show_profiles: true,

            date_format: DateFormat::Short,
            present_label: "Present".to_owned(),
            date_separator: " – ".to_owned(),

            accent_color: None,
            color_targets: None,
            text_color: "#222222".to_owned(),
            muted_color: "#666666".to_owned(),
        }
    }
}

/// Settings produced by layering overrides over [`LayoutSettings::default`].
///
/// Built fresh for each render and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EffectiveSettings(LayoutSettings);

impl EffectiveSettings {
    pub(crate) fn new(settings: LayoutSettings) -> Self {
        Self(settings)
    }
}

impl Deref for EffectiveSettings {
    type Target = LayoutSettings;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: LayoutSettings =
            serde_json::from_str(r#"{"columnCount": 2, "heading": {"fontSize": 14}}"#)
                .expect("parse settings");
        assert_eq!(settings.column_count, 2);
        assert_eq!(settings.heading.font_size, 14.0);
        assert!(!settings.heading.bold, "nested defaults come from TextStyle");
        assert_eq!(settings.section_order.len(), DEFAULT_SECTION_ORDER.len());
    }

    #[test]
    fn font_resolution_prefers_most_specific_family() {
        let fonts = FontSet {
            regular: "Base".into(),
            bold: Some("Heavy".into()),
            italic: Some("Slanted".into()),
            bold_italic: None,
        };
        assert_eq!(fonts.resolve(false, false), "Base");
        assert_eq!(fonts.resolve(true, false), "Heavy");
        assert_eq!(fonts.resolve(false, true), "Slanted");
        assert_eq!(fonts.resolve(true, true), "Heavy");

        let fonts = FontSet {
            bold_italic: Some("HeavySlanted".into()),
            ..fonts
        };
        assert_eq!(fonts.resolve(true, true), "HeavySlanted");
        assert_eq!(fonts.families(), vec!["Base", "Heavy", "Slanted", "HeavySlanted"]);
    }

    #[test]
    fn list_markers() {
        assert_eq!(ListStyle::Number.marker(2).as_deref(), Some("3."));
        assert_eq!(ListStyle::None.marker(0), None);
    }
}
