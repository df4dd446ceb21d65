//! Column/layout composition.
//!
//! [`compose`] dispatches on the template's [`LayoutType`] to one handler per variant.
//! Every handler places each section of the effective order exactly once, renders it
//! through the section registry and returns the same [`ComposedDocument`] shape.

use std::borrow::Cow;
use std::collections::HashSet;

use log::debug;

use crate::color::{ColorResolver, ColorTarget};
use crate::layout::{
    Column, ColumnRole, ColumnSet, ComposedDocument, DocumentInfo, HorizontalAlignment,
    LayoutNode, PageSpec,
};
use crate::resume::ResumeRecord;
use crate::sections;
use crate::settings::{EffectiveSettings, LayoutSettings};
use crate::template::{LayoutType, TemplateConfig, SIDEBAR_SECTIONS};

/// Narrowest column, in percent of the content width.
pub const MIN_COLUMN_PCT: f64 = 10.0;

const DEFAULT_SIDEBAR_BACKGROUND: &str = "#f3f4f6";

/// Where sections that no column claims end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Append to the right (or main) column.
    Right,
    /// Append to the middle column.
    Middle,
}

impl OrphanPolicy {
    /// Three-column pages collect orphans in the middle; every other layout on the right.
    pub fn for_layout(layout: LayoutType) -> Self {
        match layout {
            LayoutType::ThreeColumn => OrphanPolicy::Middle,
            _ => OrphanPolicy::Right,
        }
    }
}

/// Section ids per column after resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub left: Vec<String>,
    pub middle: Vec<String>,
    pub right: Vec<String>,
}

impl ColumnAssignment {
    /// Every assigned id, left column first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.left
            .iter()
            .chain(&self.middle)
            .chain(&self.right)
            .map(String::as_str)
    }
}

/// The effective section order without duplicates.
pub fn section_order(settings: &LayoutSettings) -> Vec<String> {
    let mut seen = HashSet::new();
    settings
        .section_order
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Assigns every id of the section order to a column.
///
/// Explicit lists from the settings are used in their own order, restricted to ids in the
/// section order; otherwise the template defaults are taken in section order.  An id keeps
/// its first placement.  Ids left unassigned are appended according to `policy`.  When
/// `with_middle` is false the middle list is ignored and its ids become orphans.
pub fn resolve_columns(
    settings: &LayoutSettings,
    template: &TemplateConfig,
    with_middle: bool,
    policy: OrphanPolicy,
) -> ColumnAssignment {
    let order = section_order(settings);
    let pick = |explicit: &Option<Vec<String>>, defaults: &[String]| -> Vec<String> {
        match explicit {
            Some(ids) => ids.iter().filter(|id| order.contains(id)).cloned().collect(),
            None => order
                .iter()
                .filter(|id| defaults.contains(id))
                .cloned()
                .collect(),
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut claim = |ids: Vec<String>| -> Vec<String> {
        ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
    };

    let left = claim(pick(&settings.left_column_sections, &template.left_sections));
    let mut middle = if with_middle {
        claim(pick(
            &settings.middle_column_sections,
            &template.middle_sections,
        ))
    } else {
        Vec::new()
    };
    let mut right = claim(pick(&settings.right_column_sections, &template.right_sections));

    let orphans: Vec<String> = order
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();
    if !orphans.is_empty() {
        debug!("Routing orphan sections {:?} with {:?}", orphans, policy);
        match policy {
            OrphanPolicy::Middle if with_middle => middle.extend(orphans),
            _ => right.extend(orphans),
        }
    }

    ColumnAssignment {
        left,
        middle,
        right,
    }
}

/// Column defaults for a single-column preset split in two by `columnCount`.
///
/// Single-column presets name no sidebar sections, so the shared sidebar list is used.
fn split_defaults(template: &TemplateConfig) -> Cow<'_, TemplateConfig> {
    if !template.left_sections.is_empty() {
        return Cow::Borrowed(template);
    }
    let mut split = template.clone();
    split.left_sections = SIDEBAR_SECTIONS.iter().map(|id| (*id).to_owned()).collect();
    Cow::Owned(split)
}

fn clamp_pct(value: f64, min: f64, max: f64, default: f64) -> f64 {
    let value = if value.is_finite() { value } else { default };
    value.clamp(min, max)
}

/// Left and right widths for a two-column page.
pub fn two_column_widths(left: f64) -> [f64; 2] {
    let left = clamp_pct(left, MIN_COLUMN_PCT, 100.0 - MIN_COLUMN_PCT, 32.0);
    [left, 100.0 - left]
}

/// Left, middle and right widths for a three-column page.
///
/// The right column takes the remainder.  When that would fall below
/// [`MIN_COLUMN_PCT`], the middle column shrinks to make room.
pub fn three_column_widths(left: f64, middle: f64) -> [f64; 3] {
    let left = clamp_pct(left, MIN_COLUMN_PCT, 100.0 - 2.0 * MIN_COLUMN_PCT, 32.0);
    let middle = clamp_pct(
        middle,
        MIN_COLUMN_PCT,
        100.0 - left - MIN_COLUMN_PCT,
        34.0,
    );
    [left, middle, 100.0 - left - middle]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SidebarSide {
    Left,
    Right,
    Equal,
}

struct Composer<'a> {
    template: &'a TemplateConfig,
    resume: &'a ResumeRecord,
    settings: &'a EffectiveSettings,
    colors: &'a ColorResolver,
}

/// Builds the page tree for one render.
pub fn compose(
    template: &TemplateConfig,
    resume: &ResumeRecord,
    settings: &EffectiveSettings,
    colors: &ColorResolver,
) -> ComposedDocument {
    let composer = Composer {
        template,
        resume,
        settings,
        colors,
    };
    debug!(
        "Composing template `{}` with {:?} layout",
        template.id, template.layout
    );

    let nodes = match template.layout {
        LayoutType::SingleColumn => composer.single_column(false),
        LayoutType::SingleColumnCentered => composer.single_column(true),
        LayoutType::TwoColumnSidebarLeft => composer.two_column(SidebarSide::Left),
        LayoutType::TwoColumnSidebarRight => composer.two_column(SidebarSide::Right),
        LayoutType::TwoColumnEqual => composer.two_column(SidebarSide::Equal),
        LayoutType::ThreeColumn => composer.three_column(),
        LayoutType::CreativeSidebar => composer.creative_sidebar(),
    };

    ComposedDocument {
        page: composer.page_spec(),
        info: composer.info(),
        nodes,
    }
}

impl Composer<'_> {
    fn header(&self, alignment: HorizontalAlignment) -> LayoutNode {
        LayoutNode::Header(sections::render_header(
            self.resume,
            self.settings,
            self.colors,
            alignment,
        ))
    }

    fn sections(&self, ids: &[String]) -> Vec<LayoutNode> {
        ids.iter()
            .filter_map(|id| sections::render(id, self.resume, self.settings, self.colors))
            .collect()
    }

    fn column(&self, role: ColumnRole, width_pct: f64, ids: &[String]) -> Column {
        let mut column = Column::new(role, width_pct);
        column.children = self.sections(ids);
        column
    }

    fn column_set(&self, columns: Vec<Column>) -> LayoutNode {
        LayoutNode::ColumnSet(ColumnSet {
            gap: self.settings.column_gap,
            columns,
        })
    }

    fn sidebar_background(&self) -> Option<String> {
        if !self.settings.sidebar_background {
            return None;
        }
        let color = match &self.settings.sidebar_background_color {
            Some(color) => color.clone(),
            None => self
                .colors
                .get(ColorTarget::Sidebar, DEFAULT_SIDEBAR_BACKGROUND)
                .to_owned(),
        };
        Some(color)
    }

    fn single_column(&self, centered: bool) -> Vec<LayoutNode> {
        let alignment = if centered {
            HorizontalAlignment::Center
        } else {
            self.settings.header_alignment
        };
        if self.settings.column_count >= 2 {
            debug!("Column count override splits the single-column page in two");
            let template = split_defaults(self.template);
            let mut nodes = vec![self.header(alignment)];
            nodes.push(self.two_column_set(&template, SidebarSide::Left));
            return nodes;
        }

        let mut nodes = vec![self.header(alignment)];
        nodes.extend(self.sections(&section_order(self.settings)));
        nodes
    }

    fn two_column(&self, side: SidebarSide) -> Vec<LayoutNode> {
        vec![
            self.header(self.settings.header_alignment),
            self.two_column_set(self.template, side),
        ]
    }

    fn two_column_set(&self, template: &TemplateConfig, side: SidebarSide) -> LayoutNode {
        let assignment = resolve_columns(self.settings, template, false, OrphanPolicy::Right);
        let columns = match side {
            SidebarSide::Equal => vec![
                self.column(ColumnRole::Left, 50.0, &assignment.left),
                self.column(ColumnRole::Right, 50.0, &assignment.right),
            ],
            SidebarSide::Left | SidebarSide::Right => {
                let [sidebar_pct, main_pct] = two_column_widths(self.settings.left_column_width);
                let mut sidebar = self.column(ColumnRole::Sidebar, sidebar_pct, &assignment.left);
                sidebar.background = self.sidebar_background();
                let main = self.column(ColumnRole::Main, main_pct, &assignment.right);
                if side == SidebarSide::Left {
                    vec![sidebar, main]
                } else {
                    vec![main, sidebar]
                }
            }
        };
        self.column_set(columns)
    }

    fn three_column(&self) -> Vec<LayoutNode> {
        let assignment = resolve_columns(
            self.settings,
            self.template,
            true,
            OrphanPolicy::for_layout(LayoutType::ThreeColumn),
        );
        let [left_pct, middle_pct, right_pct] = three_column_widths(
            self.settings.left_column_width,
            self.settings.middle_column_width,
        );

        let mut left = self.column(ColumnRole::Left, left_pct, &assignment.left);
        let middle = self.column(ColumnRole::Middle, middle_pct, &assignment.middle);
        let right = self.column(ColumnRole::Right, right_pct, &assignment.right);

        let mut nodes = Vec::new();
        if self.settings.header_in_left_column {
            left.children
                .insert(0, self.header(self.settings.header_alignment));
        } else {
            nodes.push(self.header(self.settings.header_alignment));
        }
        nodes.push(self.column_set(vec![left, middle, right]));
        nodes
    }

    fn creative_sidebar(&self) -> Vec<LayoutNode> {
        let assignment = resolve_columns(self.settings, self.template, true, OrphanPolicy::Right);
        let [sidebar_pct, main_pct] = two_column_widths(self.settings.left_column_width);

        let mut sidebar = Column::new(ColumnRole::Sidebar, sidebar_pct);
        sidebar.background = self.sidebar_background();
        sidebar
            .children
            .push(self.header(self.settings.header_alignment));
        sidebar.children.extend(self.sections(&assignment.left));

        let mut main = Column::new(ColumnRole::Main, main_pct);
        if assignment.middle.is_empty() {
            main.children = self.sections(&assignment.right);
        } else {
            main.children.push(self.column_set(vec![
                self.column(ColumnRole::Middle, 50.0, &assignment.middle),
                self.column(ColumnRole::Right, 50.0, &assignment.right),
            ]));
        }

        vec![self.column_set(vec![sidebar, main])]
    }

    fn page_spec(&self) -> PageSpec {
        let settings = self.settings;
        PageSpec {
            paper_size: settings.paper_size,
            margin_horizontal: settings.margin_horizontal,
            margin_vertical: settings.margin_vertical,
            show_page_numbers: settings.show_page_numbers,
            section_spacing: settings.section_spacing,
            font_size: settings.body.font_size,
            line_spacing: settings.line_spacing,
            text_color: settings.text_color.clone(),
            fonts: settings.fonts.clone(),
        }
    }

    fn info(&self) -> DocumentInfo {
        let basics = &self.resume.basics;
        let name = basics.name.trim();
        DocumentInfo {
            title: if name.is_empty() {
                "Resume".to_owned()
            } else {
                format!("{} - Resume", name)
            },
            author: name.to_owned(),
            subject: basics.label.trim().to_owned(),
            keywords: self
                .resume
                .skills
                .iter()
                .map(|skill| skill.name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}
