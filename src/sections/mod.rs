//! Section renderer registry.
//!
//! Every section id in the order list is resolved to a [`SectionKind`] and rendered into a
//! [`LayoutNode::Section`].  Renderers return `None` when the resume has no data for the
//! section; callers treat that as "leave the section out", never as an error.
//!
//! The shared [`SectionContext`] carries the resume, the effective settings and the color
//! resolver, and provides the building blocks every renderer uses: headings, styled
//! paragraphs, rich text bodies, lists and dated entries.

pub mod dates;
mod entries;
pub mod header;

use serde::{Deserialize, Serialize};

use crate::color::{ColorResolver, ColorTarget};
use crate::layout::{
    Block, HorizontalAlignment, LayoutNode, ListBlock, RichParagraph, SectionHeading,
    SectionNode,
};
use crate::resume::ResumeRecord;
use crate::richtext::{self, LinkOptions, RichLine, RunStyle, Span, StyledRun};
use crate::settings::{EffectiveSettings, HeadingCase, ListStyle, TextStyle};

pub use dates::{format_date, format_date_range};
pub use header::render_header;

/// The fixed set of section renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Work,
    Education,
    Skills,
    Projects,
    Certificates,
    Languages,
    Interests,
    Publications,
    Awards,
    References,
    /// A user-defined group looked up by id in [`ResumeRecord::custom`].
    Custom,
}

impl SectionKind {
    /// Resolves a section id.  Built-in names win over custom groups with the same id.
    pub fn from_id(id: &str, resume: &ResumeRecord) -> Option<SectionKind> {
        let kind = match id {
            "summary" => SectionKind::Summary,
            "work" => SectionKind::Work,
            "education" => SectionKind::Education,
            "skills" => SectionKind::Skills,
            "projects" => SectionKind::Projects,
            "certificates" => SectionKind::Certificates,
            "languages" => SectionKind::Languages,
            "interests" => SectionKind::Interests,
            "publications" => SectionKind::Publications,
            "awards" => SectionKind::Awards,
            "references" => SectionKind::References,
            other => {
                resume.custom_group(other)?;
                SectionKind::Custom
            }
        };
        Some(kind)
    }

    /// Heading used when the settings do not rename the section.
    pub fn default_title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Work => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certificates => "Certifications",
            SectionKind::Languages => "Languages",
            SectionKind::Interests => "Interests",
            SectionKind::Publications => "Publications",
            SectionKind::Awards => "Awards",
            SectionKind::References => "References",
            SectionKind::Custom => "",
        }
    }
}

/// Renders one section, or `None` when there is nothing to show.
pub fn render(
    section_id: &str,
    resume: &ResumeRecord,
    settings: &EffectiveSettings,
    colors: &ColorResolver,
) -> Option<LayoutNode> {
    let Some(kind) = SectionKind::from_id(section_id, resume) else {
        log::debug!("No renderer for section `{}`", section_id);
        return None;
    };
    let context = SectionContext {
        resume,
        settings,
        colors,
    };

    let (title, blocks) = match kind {
        SectionKind::Summary => (None, entries::summary(&context)?),
        SectionKind::Work => (None, entries::work(&context)?),
        SectionKind::Education => (None, entries::education(&context)?),
        SectionKind::Skills => (None, entries::skills(&context)?),
        SectionKind::Projects => (None, entries::projects(&context)?),
        SectionKind::Certificates => (None, entries::certificates(&context)?),
        SectionKind::Languages => (None, entries::languages(&context)?),
        SectionKind::Interests => (None, entries::interests(&context)?),
        SectionKind::Publications => (None, entries::publications(&context)?),
        SectionKind::Awards => (None, entries::awards(&context)?),
        SectionKind::References => (None, entries::references(&context)?),
        SectionKind::Custom => {
            let group = resume.custom_group(section_id)?;
            (Some(group.name.as_str()), entries::custom(&context, group)?)
        }
    };

    let title = settings
        .section_titles
        .get(section_id)
        .map(String::as_str)
        .or(title)
        .unwrap_or_else(|| kind.default_title());

    Some(LayoutNode::Section(SectionNode {
        id: section_id.to_owned(),
        kind,
        heading: context.heading(title),
        blocks,
    }))
}

/// Applies a heading capitalization policy.
pub fn apply_case(text: &str, case: HeadingCase) -> String {
    const MINOR_WORDS: &[&str] = &[
        "a", "an", "and", "as", "at", "but", "by", "for", "in", "of", "on", "or", "the", "to",
        "with",
    ];

    match case {
        HeadingCase::Uppercase => text.to_uppercase(),
        HeadingCase::Lowercase => text.to_lowercase(),
        HeadingCase::None => text.to_owned(),
        HeadingCase::Capitalize => text
            .split(' ')
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" "),
        HeadingCase::Titlecase => text
            .split(' ')
            .enumerate()
            .map(|(index, word)| {
                let lower = word.to_lowercase();
                if index > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                    lower
                } else {
                    capitalize_first(&lower)
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inputs shared by all renderers of one document.
pub struct SectionContext<'a> {
    pub resume: &'a ResumeRecord,
    pub settings: &'a EffectiveSettings,
    pub colors: &'a ColorResolver,
}

/// Title, subtitle and dates of a dated entry.
#[derive(Default)]
pub(crate) struct EntryParts<'a> {
    pub key: String,
    pub title: &'a str,
    pub subtitle: String,
    pub location: &'a str,
    pub dates: Option<String>,
    pub url: &'a str,
    pub body: Vec<Block>,
}

impl<'a> SectionContext<'a> {
    /// Link presentation derived from the settings.
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            show_full_url: self.settings.show_full_url,
            show_link_icon: self.settings.show_link_icon,
            icon: self.settings.link_icon.clone(),
        }
    }

    fn text_color(&self, style: &TextStyle, target: Option<ColorTarget>, fallback: &str) -> String {
        if let Some(color) = &style.color {
            return color.clone();
        }
        match target {
            Some(target) => self.colors.get(target, fallback).to_owned(),
            None => fallback.to_owned(),
        }
    }

    /// Builds the heading of a section, honouring visibility and capitalization.
    pub fn heading(&self, title: &str) -> Option<SectionHeading> {
        if !self.settings.show_section_headings || title.trim().is_empty() {
            return None;
        }
        let style = &self.settings.heading;
        let text = apply_case(title.trim(), self.settings.heading_case);
        let color = self.text_color(style, Some(ColorTarget::Headings), &self.settings.text_color);
        let span = Span::new(text)
            .with_bold(style.bold)
            .with_italic(style.italic);
        let rule = self.settings.heading_rule.then(|| {
            self.colors
                .get(ColorTarget::HeadingRule, &self.settings.muted_color)
                .to_owned()
        });
        Some(SectionHeading {
            paragraph: RichParagraph::new(vec![span], style.font_size, color),
            rule,
        })
    }

    /// A single-span paragraph without markup.
    pub fn plain(
        &self,
        text: &str,
        style: &TextStyle,
        target: Option<ColorTarget>,
        fallback: &str,
    ) -> RichParagraph {
        let span = Span::new(text.trim())
            .with_bold(style.bold)
            .with_italic(style.italic);
        RichParagraph::new(
            vec![span],
            style.font_size,
            self.text_color(style, target, fallback),
        )
    }

    /// A paragraph built from inline markup using the body style.
    pub fn inline(&self, text: &str) -> RichParagraph {
        let spans = richtext::flatten_runs(&richtext::parse_inline(text.trim()), &self.link_options());
        self.body_paragraph(spans)
    }

    /// Applies the body style to spans built directly from resume fields.
    ///
    /// Span text is never parsed for markup, so literal `*` or `[` characters survive.
    pub fn body_paragraph(&self, spans: Vec<Span>) -> RichParagraph {
        let style = &self.settings.body;
        let link_color = self
            .colors
            .applies_to(ColorTarget::Links)
            .then(|| self.colors.accent().to_owned());
        let spans = spans
            .into_iter()
            .map(|span| {
                let bold = span.is_bold() || style.bold;
                let italic = span.is_italic() || style.italic;
                let color = match (&link_color, span.is_link()) {
                    (Some(color), true) => Some(color.clone()),
                    _ => span.color().map(str::to_owned),
                };
                span.with_bold(bold).with_italic(italic).with_color(color)
            })
            .collect::<Vec<_>>();
        RichParagraph::new(
            spans,
            style.font_size,
            self.text_color(style, None, &self.settings.text_color),
        )
    }

    /// Parses multi-line rich text into paragraphs, spacers and bullet lists.
    pub fn rich_blocks(&self, text: &str, list_style: ListStyle) -> Vec<Block> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let parsed = richtext::parse_rich_text(text, self.settings.body.font_size);
        let links = self.link_options();
        let mut blocks = Vec::new();
        let mut bullets: Vec<RichParagraph> = Vec::new();

        for line in parsed.lines {
            match line {
                RichLine::Text {
                    alignment,
                    bullet: true,
                    runs,
                } => {
                    let paragraph = self.body_paragraph(richtext::flatten_runs(&runs, &links));
                    bullets.push(paragraph.with_alignment(alignment.unwrap_or_default()));
                }
                RichLine::Text {
                    alignment, runs, ..
                } => {
                    self.flush_list(&mut blocks, &mut bullets, list_style);
                    let paragraph = self.body_paragraph(richtext::flatten_runs(&runs, &links));
                    blocks.push(Block::Paragraph(
                        paragraph.with_alignment(alignment.unwrap_or(HorizontalAlignment::Left)),
                    ));
                }
                RichLine::Spacer { height } => {
                    self.flush_list(&mut blocks, &mut bullets, list_style);
                    blocks.push(Block::Spacer(height));
                }
            }
        }
        self.flush_list(&mut blocks, &mut bullets, list_style);
        blocks
    }

    fn flush_list(&self, blocks: &mut Vec<Block>, items: &mut Vec<RichParagraph>, style: ListStyle) {
        if !items.is_empty() {
            blocks.push(self.list(std::mem::take(items), style));
        }
    }

    /// Wraps paragraphs into a list block with the bullet color applied.
    pub fn list(&self, items: Vec<RichParagraph>, style: ListStyle) -> Block {
        Block::List(ListBlock {
            style,
            marker_color: self
                .colors
                .get(ColorTarget::Bullets, &self.settings.text_color)
                .to_owned(),
            items,
        })
    }

    /// Turns every non-blank string into a list item; `None` when nothing remains.
    pub fn string_list(&self, items: &[String], style: ListStyle) -> Option<Block> {
        let paragraphs: Vec<_> = items
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| self.inline(item))
            .collect();
        (!paragraphs.is_empty()).then(|| self.list(paragraphs, style))
    }

    /// A paragraph holding a single link.
    pub fn link(&self, url: &str) -> Option<RichParagraph> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        let run = StyledRun::Styled {
            style: RunStyle {
                link: Some(url.to_owned()),
                ..RunStyle::default()
            },
            children: vec![StyledRun::Text(display_url(url).to_owned())],
        };
        Some(self.body_paragraph(run.flatten(&self.link_options())))
    }

    /// Formats the date range of an entry with the configured format.
    pub fn date_range(&self, start: &str, end: &str) -> Option<String> {
        dates::format_date_range(
            start,
            end,
            self.settings.date_format,
            &self.settings.present_label,
            &self.settings.date_separator,
        )
    }

    /// Formats a single date with the configured format.
    pub fn date(&self, value: &str) -> Option<String> {
        dates::format_single_date(value, self.settings.date_format, &self.settings.present_label)
    }

    /// Lays out a dated entry: title row, subtitle line, optional link and body.
    pub(crate) fn entry(&self, parts: EntryParts<'_>) -> Option<Block> {
        let settings = self.settings;
        let options = &settings.section_options;
        let mut title = parts.title.trim();
        let mut subtitle = parts.subtitle.trim().to_owned();
        if title.is_empty() {
            title = subtitle.as_str();
        }
        let title = title.to_owned();
        if title == subtitle {
            subtitle.clear();
        }
        if options.show_location && !parts.location.trim().is_empty() {
            subtitle = if subtitle.is_empty() {
                parts.location.trim().to_owned()
            } else {
                format!("{} · {}", subtitle, parts.location.trim())
            };
        }

        let mut blocks = Vec::new();
        let date_paragraph = parts.dates.as_deref().map(|dates| {
            self.plain(
                dates,
                &settings.entry_date,
                Some(ColorTarget::Dates),
                &settings.muted_color,
            )
        });
        let dates_right = options.date_position == crate::settings::DatePosition::Right;

        if !title.is_empty() {
            let title_paragraph = self.plain(
                &title,
                &settings.entry_title,
                Some(ColorTarget::EntryTitles),
                &settings.text_color,
            );
            match (&date_paragraph, dates_right) {
                (Some(dates), true) => blocks.push(Block::Row {
                    left: title_paragraph,
                    right: dates.clone().with_alignment(HorizontalAlignment::Right),
                }),
                _ => blocks.push(Block::Paragraph(title_paragraph)),
            }
        }
        if !subtitle.is_empty() {
            blocks.push(Block::Paragraph(self.plain(
                &subtitle,
                &settings.entry_subtitle,
                Some(ColorTarget::Subtitles),
                &settings.muted_color,
            )));
        }
        if let Some(dates) = date_paragraph {
            if !dates_right || title.is_empty() {
                blocks.push(Block::Paragraph(dates));
            }
        }
        if let Some(link) = self.link(parts.url) {
            blocks.push(Block::Paragraph(link));
        }
        blocks.extend(parts.body);

        if blocks.is_empty() {
            None
        } else {
            Some(Block::Entry {
                key: parts.key,
                blocks,
            })
        }
    }

    /// Joins entries with the configured spacing; `None` when there are none.
    pub fn entries(&self, entries: Vec<Block>) -> Option<Vec<Block>> {
        if entries.is_empty() {
            return None;
        }
        let mut blocks = Vec::with_capacity(entries.len() * 2);
        for (index, entry) in entries.into_iter().enumerate() {
            if index > 0 {
                blocks.push(Block::Spacer(self.settings.entry_spacing));
            }
            blocks.push(entry);
        }
        Some(blocks)
    }

    /// Emits paragraphs either as a list or, for [`ListStyle::None`], as plain paragraphs.
    pub fn items(&self, items: Vec<RichParagraph>, style: ListStyle) -> Option<Vec<Block>> {
        if items.is_empty() {
            return None;
        }
        if style == ListStyle::None {
            Some(items.into_iter().map(Block::Paragraph).collect())
        } else {
            Some(vec![self.list(items, style)])
        }
    }
}

/// Strips the scheme, a leading `www.` and a trailing slash for display.
pub fn display_url(url: &str) -> &str {
    let trimmed = url.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .or_else(|| trimmed.strip_prefix("mailto:"))
        .unwrap_or(trimmed);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.strip_suffix('/').unwrap_or(without_www)
}

/// Stable render key for an item, falling back to its position.
pub(crate) fn item_key(prefix: &str, id: &str, index: usize) -> String {
    if id.trim().is_empty() {
        format!("{}-{}", prefix, index)
    } else {
        id.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Basics, CustomGroup, CustomItem, WorkItem};
    use crate::settings::{merge, LayoutSettings};
    use serde_json::json;

    fn settings(overrides: serde_json::Value) -> EffectiveSettings {
        merge::resolve(&LayoutSettings::default(), &[&overrides])
    }

    fn resume() -> ResumeRecord {
        ResumeRecord {
            basics: Basics {
                summary: "Builds **reliable** systems.".into(),
                ..Basics::default()
            },
            work: vec![WorkItem {
                id: "w1".into(),
                name: "Acme".into(),
                position: "Engineer".into(),
                start_date: "2020-02".into(),
                highlights: vec!["Shipped *things*".into(), "  ".into()],
                ..WorkItem::default()
            }],
            custom: vec![CustomGroup {
                id: "talks".into(),
                name: "Talks".into(),
                items: vec![CustomItem {
                    title: "RustConf".into(),
                    date: "2022-09".into(),
                    ..CustomItem::default()
                }],
            }],
            ..ResumeRecord::default()
        }
    }

    fn section(node: Option<LayoutNode>) -> SectionNode {
        match node {
            Some(LayoutNode::Section(section)) => section,
            other => panic!("expected a section, got {other:?}"),
        }
    }

    #[test]
    fn empty_sections_render_nothing() {
        let record = ResumeRecord::default();
        let settings = settings(json!({}));
        let colors = ColorResolver::default();
        for id in crate::settings::DEFAULT_SECTION_ORDER {
            assert!(render(id, &record, &settings, &colors).is_none(), "{id} rendered");
        }
        assert!(render("unknown", &record, &settings, &colors).is_none());
    }

    #[test]
    fn work_entry_has_dates_and_highlights() {
        let record = resume();
        let settings = settings(json!({}));
        let colors = ColorResolver::new("#0000ff", [ColorTarget::Dates]);
        let node = section(render("work", &record, &settings, &colors));

        let heading = node.heading.as_ref().expect("heading");
        assert_eq!(heading.paragraph.plain_text(), "WORK EXPERIENCE");
        match &node.blocks[0] {
            Block::Entry { key, blocks } => {
                assert_eq!(key, "w1");
                match &blocks[0] {
                    Block::Row { left, right } => {
                        assert_eq!(left.plain_text(), "Engineer");
                        assert_eq!(right.plain_text(), "Feb 2020 – Present");
                        assert_eq!(right.color(), "#0000ff");
                    }
                    other => panic!("expected title row, got {other:?}"),
                }
                let list = blocks
                    .iter()
                    .find_map(|block| match block {
                        Block::List(list) => Some(list),
                        _ => None,
                    })
                    .expect("highlights");
                assert_eq!(list.items.len(), 1);
                assert!(list.items[0].spans().iter().any(|s| s.is_italic()));
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn heading_toggles_and_titles() {
        let record = resume();
        let colors = ColorResolver::default();

        let hidden = settings(json!({"showSectionHeadings": false}));
        assert!(section(render("summary", &record, &hidden, &colors)).heading.is_none());

        let renamed = settings(json!({
            "headingCase": "titlecase",
            "sectionTitles": {"summary": "about THE candidate"}
        }));
        let heading = section(render("summary", &record, &renamed, &colors))
            .heading
            .expect("heading");
        assert_eq!(heading.paragraph.plain_text(), "About the Candidate");
    }

    #[test]
    fn custom_groups_use_their_name() {
        let record = resume();
        let settings = settings(json!({"headingCase": "none"}));
        let node = section(render("talks", &record, &settings, &ColorResolver::default()));
        assert_eq!(node.kind, SectionKind::Custom);
        assert_eq!(node.heading.as_ref().expect("heading").paragraph.plain_text(), "Talks");
        assert!(node.plain_text().contains("Sep 2022"));
    }

    #[test]
    fn heading_cases() {
        assert_eq!(apply_case("work experience", HeadingCase::Uppercase), "WORK EXPERIENCE");
        assert_eq!(apply_case("Work Experience", HeadingCase::Lowercase), "work experience");
        assert_eq!(apply_case("tools of the TRADE", HeadingCase::Titlecase), "Tools of the Trade");
        assert_eq!(apply_case("tools of the TRADE", HeadingCase::Capitalize), "Tools Of The TRADE");
        assert_eq!(apply_case("as-is", HeadingCase::None), "as-is");
    }

    #[test]
    fn urls_are_shortened_for_display() {
        assert_eq!(display_url("https://www.example.com/"), "example.com");
        assert_eq!(display_url("mailto:me@example.com"), "me@example.com");
        assert_eq!(display_url("github.com/me"), "github.com/me");
    }
}
