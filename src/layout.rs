//! The composed page tree handed to the rendering backend.
//!
//! A [`ComposedDocument`] is a list of [`LayoutNode`]s: headers, column sets and sections.
//! Columns only ever appear inside a [`ColumnSet`].  Section content is expressed as
//! [`Block`]s built from rich text [`Span`]s.  The tree does not reference the rendering
//! crate, so it can be inspected and serialized without producing a PDF.
//!
//! All lengths are points; [`pt_to_mm`] converts them to the backend unit.

use serde::{Deserialize, Serialize};

use crate::richtext::Span;
use crate::sections::SectionKind;
use crate::settings::{FontSet, ListStyle, PaperSize};

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Converts points to millimetres.
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_PT
}

/// Horizontal alignment of text and images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Fully justified paragraphs.
    #[serde(alias = "justify")]
    Justified,
}

/// Rich text paragraph carrying inline styling information and alignment metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
    font_size: f64,
    color: String,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>, font_size: f64, color: impl Into<String>) -> Self {
        Self {
            spans: spans.into(),
            alignment: HorizontalAlignment::Left,
            font_size,
            color: color.into(),
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Base font size in points.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Base text color; spans may override it.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns whether any span is underlined.
    pub fn has_underline(&self) -> bool {
        self.spans.iter().any(Span::is_underlined)
    }

    /// Concatenated span text.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Representation of image sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ImageSource {
    /// Image loaded from raw bytes.
    Bytes(Vec<u8>),
    /// Image referenced by a file path.
    Path(String),
}

/// An image with a requested rendered width.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageBlock {
    pub source: ImageSource,
    pub width: f64,
    pub alignment: HorizontalAlignment,
}

/// A list of paragraphs with a marker style.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListBlock {
    pub style: ListStyle,
    pub marker_color: String,
    pub items: Vec<RichParagraph>,
}

/// Content blocks that make up headers and sections.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Two paragraphs on one row, the right one right aligned (title and dates).
    Row {
        left: RichParagraph,
        right: RichParagraph,
    },
    /// Marked list items.
    List(ListBlock),
    /// Vertical gap in points.
    Spacer(f64),
    /// One resume item, keyed by its id.
    Entry { key: String, blocks: Vec<Block> },
    /// An image, such as the header photo.
    Image(ImageBlock),
}

impl Block {
    /// Text of the block and all nested blocks, one paragraph per line.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(paragraph) => paragraph.plain_text(),
            Block::Row { left, right } => format!("{} {}", left.plain_text(), right.plain_text()),
            Block::List(list) => list
                .items
                .iter()
                .map(RichParagraph::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Entry { blocks, .. } => blocks_text(blocks),
            Block::Spacer(_) | Block::Image(_) => String::new(),
        }
    }
}

fn blocks_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The document header: name, title, contacts and photo.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeaderNode {
    pub alignment: HorizontalAlignment,
    pub photo: Option<ImageBlock>,
    pub blocks: Vec<Block>,
}

/// Heading of a section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionHeading {
    pub paragraph: RichParagraph,
    /// Color of the rule below the heading, if one is drawn.
    pub rule: Option<String>,
}

/// A rendered resume section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionNode {
    pub id: String,
    pub kind: SectionKind,
    pub heading: Option<SectionHeading>,
    pub blocks: Vec<Block>,
}

impl SectionNode {
    /// Text of the section body.
    pub fn plain_text(&self) -> String {
        blocks_text(&self.blocks)
    }
}

/// Logical position of a column within its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Left,
    Middle,
    Right,
    Sidebar,
    Main,
}

/// A vertical region of a column set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub role: ColumnRole,
    /// Share of the set's width, in percent.
    pub width_pct: f64,
    pub background: Option<String>,
    pub children: Vec<LayoutNode>,
}

impl Column {
    /// Creates an empty column.
    pub fn new(role: ColumnRole, width_pct: f64) -> Self {
        Self {
            role,
            width_pct,
            background: None,
            children: Vec::new(),
        }
    }
}

/// Side-by-side columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnSet {
    /// Gap between neighbouring columns in points.
    pub gap: f64,
    pub columns: Vec<Column>,
}

/// Node of the composed page tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LayoutNode {
    Header(HeaderNode),
    ColumnSet(ColumnSet),
    Section(SectionNode),
}

impl LayoutNode {
    fn visit<'a>(&'a self, visitor: &mut dyn FnMut(&'a LayoutNode)) {
        visitor(self);
        if let LayoutNode::ColumnSet(set) = self {
            for column in &set.columns {
                for child in &column.children {
                    child.visit(visitor);
                }
            }
        }
    }
}

/// Page geometry and document-wide text defaults.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageSpec {
    pub paper_size: PaperSize,
    pub margin_horizontal: f64,
    pub margin_vertical: f64,
    pub show_page_numbers: bool,
    /// Vertical gap between stacked sections.
    pub section_spacing: f64,
    pub font_size: f64,
    pub line_spacing: f64,
    pub text_color: String,
    pub fonts: FontSet,
}

/// Document metadata forwarded to the PDF info dictionary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
}

/// Output of the layout composer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComposedDocument {
    pub page: PageSpec,
    pub info: DocumentInfo,
    pub nodes: Vec<LayoutNode>,
}

impl ComposedDocument {
    fn walk<'a>(&'a self, visitor: &mut dyn FnMut(&'a LayoutNode)) {
        for node in &self.nodes {
            node.visit(visitor);
        }
    }

    /// Section ids in document order, columns left to right.
    pub fn section_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.walk(&mut |node| {
            if let LayoutNode::Section(section) = node {
                ids.push(section.id.as_str());
            }
        });
        ids
    }

    /// Looks up a section by id.
    pub fn section(&self, id: &str) -> Option<&SectionNode> {
        let mut found = None;
        self.walk(&mut |node| match node {
            LayoutNode::Section(section) if found.is_none() && section.id == id => {
                found = Some(section)
            }
            _ => {}
        });
        found
    }

    /// Number of header nodes anywhere in the tree.
    pub fn header_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if matches!(node, LayoutNode::Header(_)) {
                count += 1;
            }
        });
        count
    }

    /// Returns the first header node.
    pub fn header(&self) -> Option<&HeaderNode> {
        let mut found = None;
        self.walk(&mut |node| match node {
            LayoutNode::Header(header) if found.is_none() => found = Some(header),
            _ => {}
        });
        found
    }

    /// Column sets in document order, nested sets included.
    pub fn column_sets(&self) -> Vec<&ColumnSet> {
        let mut sets = Vec::new();
        self.walk(&mut |node| {
            if let LayoutNode::ColumnSet(set) = node {
                sets.push(set);
            }
        });
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str) -> LayoutNode {
        LayoutNode::Section(SectionNode {
            id: id.to_owned(),
            kind: SectionKind::Custom,
            heading: None,
            blocks: vec![Block::Paragraph(RichParagraph::new(
                vec![Span::new(id)],
                10.0,
                "#000000",
            ))],
        })
    }

    #[test]
    fn walks_columns_left_to_right() {
        let mut left = Column::new(ColumnRole::Left, 40.0);
        left.children.push(section("a"));
        let mut right = Column::new(ColumnRole::Right, 60.0);
        right.children.push(section("b"));
        right.children.push(section("c"));

        let document = ComposedDocument {
            page: PageSpec {
                paper_size: PaperSize::A4,
                margin_horizontal: 10.0,
                margin_vertical: 10.0,
                show_page_numbers: false,
                section_spacing: 8.0,
                font_size: 10.0,
                line_spacing: 1.0,
                text_color: "#000000".into(),
                fonts: FontSet::default(),
            },
            info: DocumentInfo::default(),
            nodes: vec![
                section("top"),
                LayoutNode::ColumnSet(ColumnSet {
                    gap: 10.0,
                    columns: vec![left, right],
                }),
            ],
        };

        assert_eq!(document.section_ids(), ["top", "a", "b", "c"]);
        assert_eq!(document.section("c").map(SectionNode::plain_text).as_deref(), Some("c"));
        assert_eq!(document.column_sets().len(), 1);
        assert_eq!(document.header_count(), 0);
    }

    #[test]
    fn converts_points_to_millimetres() {
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-9);
    }
}
