//! Template presets.
//!
//! A [`TemplateConfig`] picks the page structure ([`LayoutType`]), the accent color with
//! the roles it applies to, default column assignments and an optional theme that is
//! merged over the base settings.  The built-in catalog is created once and shared.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::ColorTarget;

/// Id of the preset used when a requested template is unknown.
pub const DEFAULT_TEMPLATE_ID: &str = "classic";

/// Column and region structure of a page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    #[default]
    SingleColumn,
    SingleColumnCentered,
    TwoColumnSidebarLeft,
    TwoColumnSidebarRight,
    TwoColumnEqual,
    ThreeColumn,
    CreativeSidebar,
}

impl LayoutType {
    pub const ALL: [LayoutType; 7] = [
        LayoutType::SingleColumn,
        LayoutType::SingleColumnCentered,
        LayoutType::TwoColumnSidebarLeft,
        LayoutType::TwoColumnSidebarRight,
        LayoutType::TwoColumnEqual,
        LayoutType::ThreeColumn,
        LayoutType::CreativeSidebar,
    ];
}

/// A static template preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    pub id: String,
    pub name: String,
    pub layout: LayoutType,
    /// Accent used unless the document settings pick their own.
    pub accent_color: String,
    pub left_sections: Vec<String>,
    pub middle_sections: Vec<String>,
    pub right_sections: Vec<String>,
    /// Roles that take the accent color.
    pub color_targets: Vec<ColorTarget>,
    /// Settings merged between the base theme and the document overrides.
    pub theme: Option<Value>,
}

impl TemplateConfig {
    /// Creates a bare preset with no column defaults or theme.
    pub fn new(id: impl Into<String>, name: impl Into<String>, layout: LayoutType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layout,
            accent_color: "#1f2937".to_owned(),
            ..Self::default()
        }
    }

    fn accent(mut self, color: &str, targets: &[ColorTarget]) -> Self {
        self.accent_color = color.to_owned();
        self.color_targets = targets.to_vec();
        self
    }

    fn columns(mut self, left: &[&str], middle: &[&str], right: &[&str]) -> Self {
        let owned = |ids: &[&str]| ids.iter().map(|id| (*id).to_owned()).collect();
        self.left_sections = owned(left);
        self.middle_sections = owned(middle);
        self.right_sections = owned(right);
        self
    }

    fn theme(mut self, theme: Value) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Sections a sidebar holds when a preset does not name its own.
pub const SIDEBAR_SECTIONS: &[&str] = &["skills", "languages", "interests", "certificates"];
const MAIN: &[&str] = &[
    "summary",
    "work",
    "education",
    "projects",
    "publications",
    "awards",
    "references",
];

fn build_catalog() -> Vec<TemplateConfig> {
    use ColorTarget::*;
    use LayoutType::*;

    vec![
        TemplateConfig::new("ats", "ATS Friendly", SingleColumn)
            .accent("#000000", &[])
            .theme(json!({
                "headingRule": false,
                "showLinkIcon": false,
                "showFullUrl": true,
                "showPhoto": false,
                "listStyles": {"skills": "none"}
            })),
        TemplateConfig::new("classic", "Classic", SingleColumnCentered)
            .accent("#1f2937", &[Headings, HeadingRule])
            .theme(json!({"headerAlignment": "center"})),
        TemplateConfig::new("modern", "Modern", TwoColumnSidebarLeft)
            .accent("#2563eb", &[Name, Headings, HeadingRule, Links, Bullets, Dates])
            .columns(SIDEBAR_SECTIONS, &[], MAIN)
            .theme(json!({"leftColumnWidth": 32})),
        TemplateConfig::new("creative", "Creative", CreativeSidebar)
            .accent("#7c3aed", &[Name, Headings, Icons, Bullets, EntryTitles])
            .columns(SIDEBAR_SECTIONS, &[], MAIN)
            .theme(json!({
                "sidebarBackground": true,
                "linkDisplay": "newline",
                "showLinkIcon": true,
                "headerAlignment": "center"
            })),
        TemplateConfig::new("professional", "Professional", TwoColumnSidebarRight)
            .accent("#0f766e", &[Name, Headings, HeadingRule, Dates])
            .columns(SIDEBAR_SECTIONS, &[], MAIN)
            .theme(json!({"leftColumnWidth": 30})),
        TemplateConfig::new("elegant", "Elegant", SingleColumnCentered)
            .accent("#9d174d", &[Name, Headings, Subtitles])
            .theme(json!({
                "headingCase": "titlecase",
                "headingRule": false,
                "name": {"fontSize": 28, "bold": false, "italic": true}
            })),
        TemplateConfig::new("glow", "Glow", CreativeSidebar)
            .accent("#f59e0b", &[Name, Headings, HeadingRule, Sidebar, Bullets, Icons])
            .columns(
                &["skills", "languages", "interests"],
                &["projects", "certificates", "awards"],
                &["summary", "work", "education", "publications", "references"],
            )
            .theme(json!({"sidebarBackground": true, "leftColumnWidth": 28})),
        TemplateConfig::new("multicolumn", "Multi Column", ThreeColumn)
            .accent("#0ea5e9", &[Headings, HeadingRule, Links, Dates])
            .columns(
                &["skills", "languages", "interests"],
                &["summary", "education", "certificates"],
                &["work", "projects", "publications", "awards", "references"],
            )
            .theme(json!({
                "leftColumnWidth": 26,
                "middleColumnWidth": 32,
                "body": {"fontSize": 9}
            })),
        TemplateConfig::new("developer", "Developer", TwoColumnSidebarLeft)
            .accent("#10b981", &[Headings, Links, Icons, Bullets, EntryTitles])
            .columns(&["skills", "languages", "certificates"], &[], &[
                "summary",
                "work",
                "projects",
                "education",
                "interests",
                "awards",
            ])
            .theme(json!({
                "linkDisplay": "icon",
                "sectionOptions": {"skillLayout": "list", "showProjectKeywords": true},
                "listStyles": {"work": "dash", "projects": "dash"}
            })),
        TemplateConfig::new("minimal", "Minimal", SingleColumn)
            .accent("#111827", &[])
            .theme(json!({
                "headingCase": "lowercase",
                "headingRule": false,
                "sectionOptions": {"showLocation": false}
            })),
        TemplateConfig::new("executive", "Executive", SingleColumn)
            .accent("#1e3a8a", &[Name, Headings, HeadingRule])
            .theme(json!({
                "name": {"fontSize": 26},
                "dateFormat": "long",
                "sectionSpacing": 14
            })),
        TemplateConfig::new("academic", "Academic", SingleColumn)
            .accent("#7f1d1d", &[Headings, HeadingRule, EntryTitles])
            .theme(json!({
                "sectionOrder": [
                    "summary", "education", "publications", "work", "awards",
                    "projects", "skills", "languages", "certificates", "interests", "references"
                ],
                "dateFormat": "year",
                "sectionOptions": {"showEducationCourses": true}
            })),
        TemplateConfig::new("compact", "Compact", TwoColumnEqual)
            .accent("#475569", &[Headings, Dates])
            .columns(&["summary", "work", "projects"], &[], &[
                "education",
                "skills",
                "certificates",
                "languages",
                "interests",
                "awards",
            ])
            .theme(json!({
                "body": {"fontSize": 9},
                "sectionSpacing": 6,
                "entrySpacing": 3,
                "marginHorizontal": 28,
                "marginVertical": 28
            })),
        TemplateConfig::new("timeline", "Timeline", SingleColumn)
            .accent("#db2777", &[Headings, Dates, Bullets])
            .theme(json!({
                "sectionOptions": {"datePosition": "below"},
                "dateFormat": "numeric"
            })),
        TemplateConfig::new("sidebar-right", "Sidebar Right", TwoColumnSidebarRight)
            .accent("#4f46e5", &[Name, Headings, Sidebar])
            .columns(SIDEBAR_SECTIONS, &[], MAIN)
            .theme(json!({"sidebarBackground": true})),
        TemplateConfig::new("bold", "Bold", ThreeColumn)
            .accent("#dc2626", &[Name, Title, Headings, HeadingRule, Bullets])
            .columns(
                &["skills", "languages", "interests"],
                &["work", "projects"],
                &["summary", "education", "certificates", "awards"],
            )
            .theme(json!({
                "headerInLeftColumn": true,
                "leftColumnWidth": 30,
                "middleColumnWidth": 40,
                "heading": {"fontSize": 13}
            })),
        TemplateConfig::new("corporate", "Corporate", TwoColumnEqual)
            .accent("#334155", &[Headings, HeadingRule, Subtitles])
            .columns(&["summary", "work", "education"], &[], &[
                "skills",
                "projects",
                "certificates",
                "languages",
                "awards",
                "references",
            ])
            .theme(json!({"paperSize": "letter"})),
    ]
}

/// The built-in presets.
pub fn catalog() -> &'static [TemplateConfig] {
    static CATALOG: OnceLock<Vec<TemplateConfig>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Looks up a preset by id.
pub fn find(id: &str) -> Option<&'static TemplateConfig> {
    catalog().iter().find(|template| template.id == id)
}

/// Looks up a preset, falling back to [`DEFAULT_TEMPLATE_ID`] for unknown ids.
pub fn get_or_default(id: &str) -> &'static TemplateConfig {
    if let Some(template) = find(id) {
        return template;
    }
    log::warn!(
        "Unknown template `{}`; using `{}` instead",
        id,
        DEFAULT_TEMPLATE_ID
    );
    find(DEFAULT_TEMPLATE_ID).unwrap_or(&catalog()[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{merge, LayoutSettings};
    use std::collections::HashSet;

    #[test]
    fn catalog_has_unique_ids_and_every_layout() {
        let ids: HashSet<_> = catalog().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog().len());
        assert_eq!(catalog().len(), 17);
        for layout in LayoutType::ALL {
            assert!(
                catalog().iter().any(|t| t.layout == layout),
                "no preset uses {layout:?}"
            );
        }
    }

    #[test]
    fn themes_resolve_cleanly() {
        for template in catalog() {
            let theme = template.theme.clone().unwrap_or(Value::Null);
            let resolved = merge::resolve(&LayoutSettings::default(), &[&theme]);
            if let Some(Value::Object(map)) = &template.theme {
                let round_trip = serde_json::to_value(&*resolved).expect("serialize");
                for key in map.keys() {
                    assert!(round_trip.get(key).is_some(), "{}: {key}", template.id);
                }
            }
        }
        let bold = find("bold").expect("bold preset");
        let settings = merge::resolve(&LayoutSettings::default(), &[bold.theme.as_ref().unwrap()]);
        assert!(settings.header_in_left_column);
        assert_eq!(settings.heading.font_size, 13.0);
        assert!(settings.heading.bold);
    }

    #[test]
    fn unknown_ids_fall_back() {
        assert_eq!(get_or_default("nope").id, DEFAULT_TEMPLATE_ID);
        assert_eq!(get_or_default("glow").layout, LayoutType::CreativeSidebar);
    }

    #[test]
    fn layout_type_uses_kebab_case() {
        let layout: LayoutType = serde_json::from_str("\"two-column-sidebar-left\"").unwrap();
        assert_eq!(layout, LayoutType::TwoColumnSidebarLeft);
        assert_eq!(
            serde_json::to_string(&LayoutType::CreativeSidebar).unwrap(),
            "\"creative-sidebar\""
        );
    }
}
