//! genpdf backend for composed documents.
//!
//! [`render_document`] walks a [`ComposedDocument`] and pushes one genpdf element per
//! node: column sets become single-row [`TableLayout`]s weighted by column width, sections
//! and columns become vertical [`LinearLayout`]s.

pub mod elements;

use genpdf::elements::{LinearLayout, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::{Style, StyledString};
use genpdf::{Element, Margins};
use log::{debug, warn};

use crate::builder::{font_size_u8, DocumentBuilder};
use crate::error::ExportError;
use crate::fonts;
use crate::layout::{
    pt_to_mm, Block, Column, ColumnSet, ComposedDocument, HeaderNode, ImageBlock, ImageSource,
    LayoutNode, ListBlock, RichParagraph, SectionNode,
};

use self::elements::{
    alignment, color, mm_from_f64, Background, ListItem, Rule, Spacer, StyledSpan, UnderlinedText,
};

const RULE_OFFSET_PT: f64 = 2.0;
const LIST_INDENT_PT: f64 = 12.0;
const ROW_WEIGHTS: [usize; 2] = [7, 3];
const BACKGROUND_PADDING_PT: f64 = 6.0;

/// Renders a composed document into PDF bytes.
pub fn render_document(document: &ComposedDocument) -> Result<Vec<u8>, ExportError> {
    let family = fonts::font_family_for(&document.page.fonts).map_err(|source| {
        ExportError::FontLoad {
            family: document.page.fonts.regular.clone(),
            source,
        }
    })?;

    let mut pdf = DocumentBuilder::new(family)
        .with_page(&document.page)
        .with_title(document.info.title.clone())
        .build();

    let renderer = Renderer { document };
    for (index, node) in document.nodes.iter().enumerate() {
        if index > 0 {
            pdf.push(renderer.gap());
        }
        let mut layout = LinearLayout::vertical();
        renderer.push_node(&mut layout, node)?;
        pdf.push(layout);
    }

    let mut bytes = Vec::new();
    pdf.render(&mut bytes)?;
    debug!("Rendered {} bytes of PDF", bytes.len());
    Ok(bytes)
}

struct Renderer<'a> {
    document: &'a ComposedDocument,
}

impl Renderer<'_> {
    fn gap(&self) -> Spacer {
        Spacer::new(mm_from_f64(pt_to_mm(self.document.page.section_spacing)))
    }

    fn push_node(&self, layout: &mut LinearLayout, node: &LayoutNode) -> Result<(), Error> {
        match node {
            LayoutNode::Header(header) => self.push_header(layout, header),
            LayoutNode::Section(section) => {
                self.push_section(layout, section);
                Ok(())
            }
            LayoutNode::ColumnSet(set) => {
                layout.push(self.column_set(set)?);
                Ok(())
            }
        }
    }

    fn column_set(&self, set: &ColumnSet) -> Result<TableLayout, Error> {
        let weights = set
            .columns
            .iter()
            .map(|column| ((column.width_pct * 10.0).round() as usize).max(1))
            .collect::<Vec<_>>();
        let mut table = TableLayout::new(weights);
        let half_gap = mm_from_f64(pt_to_mm(set.gap / 2.0));
        let last = set.columns.len().saturating_sub(1);

        let mut row = table.row();
        for (index, column) in set.columns.iter().enumerate() {
            let left = if index == 0 { mm_from_f64(0.0) } else { half_gap };
            let right = if index == last { mm_from_f64(0.0) } else { half_gap };
            let padding = Margins::trbl(0, right, 0, left);
            let content = self.column(column)?;
            match &column.background {
                Some(background) => {
                    row = row.element(
                        Background::new(
                            content,
                            color(background),
                            mm_from_f64(pt_to_mm(BACKGROUND_PADDING_PT)),
                        )
                        .padded(padding),
                    );
                }
                None => row = row.element(content.padded(padding)),
            }
        }
        row.push()?;
        Ok(table)
    }

    fn column(&self, column: &Column) -> Result<LinearLayout, Error> {
        let mut layout = LinearLayout::vertical();
        for (index, child) in column.children.iter().enumerate() {
            if index > 0 {
                layout.push(self.gap());
            }
            self.push_node(&mut layout, child)?;
        }
        Ok(layout)
    }

    fn push_header(&self, layout: &mut LinearLayout, header: &HeaderNode) -> Result<(), Error> {
        if let Some(photo) = &header.photo {
            self.push_image(layout, photo);
        }
        for block in &header.blocks {
            self.push_block(layout, block);
        }
        Ok(())
    }

    fn push_section(&self, layout: &mut LinearLayout, section: &SectionNode) {
        if let Some(heading) = &section.heading {
            self.push_paragraph(layout, &heading.paragraph);
            if let Some(rule) = &heading.rule {
                layout.push(Rule::new(color(rule), mm_from_f64(pt_to_mm(RULE_OFFSET_PT))));
            }
        }
        for block in &section.blocks {
            self.push_block(layout, block);
        }
    }

    fn push_block(&self, layout: &mut LinearLayout, block: &Block) {
        match block {
            Block::Paragraph(paragraph) => self.push_paragraph(layout, paragraph),
            Block::Row { left, right } => {
                let mut table = TableLayout::new(ROW_WEIGHTS.to_vec());
                let mut left_cell = LinearLayout::vertical();
                self.push_paragraph(&mut left_cell, left);
                let mut right_cell = LinearLayout::vertical();
                self.push_paragraph(&mut right_cell, right);
                match table.row().element(left_cell).element(right_cell).push() {
                    Ok(()) => layout.push(table),
                    Err(err) => {
                        warn!("Unable to lay out row: {}", err);
                        self.push_paragraph(layout, left);
                        self.push_paragraph(layout, right);
                    }
                }
            }
            Block::List(list) => self.push_list(layout, list),
            Block::Spacer(height) => layout.push(Spacer::new(mm_from_f64(pt_to_mm(*height)))),
            Block::Entry { blocks, .. } => {
                let mut entry = LinearLayout::vertical();
                for block in blocks {
                    self.push_block(&mut entry, block);
                }
                layout.push(entry);
            }
            Block::Image(image) => self.push_image(layout, image),
        }
    }

    fn push_paragraph(&self, layout: &mut LinearLayout, paragraph: &RichParagraph) {
        let style = base_style(paragraph);
        let align = alignment(paragraph.alignment());
        if paragraph.has_underline() {
            let spans = paragraph.spans().iter().map(StyledSpan::from).collect();
            layout.push(UnderlinedText::new(spans).with_alignment(align).styled(style));
        } else {
            let mut element = Paragraph::default();
            for span in paragraph.spans() {
                element.push(StyledString::from(span));
            }
            layout.push(element.aligned(align).styled(style));
        }
    }

    fn push_list(&self, layout: &mut LinearLayout, list: &ListBlock) {
        let indent = if list.style.marker(0).is_some() {
            mm_from_f64(pt_to_mm(LIST_INDENT_PT))
        } else {
            mm_from_f64(0.0)
        };
        let marker_style = Style::new().with_color(color(&list.marker_color));
        for (index, item) in list.items.iter().enumerate() {
            let mut content = LinearLayout::vertical();
            self.push_paragraph(&mut content, item);
            let marker = list
                .style
                .marker(index)
                .map(|marker| StyledString::new(marker, marker_style));
            layout.push(
                ListItem::new(content, marker, indent).styled(Style::new().with_font_size(
                    font_size_u8(item.font_size()),
                )),
            );
        }
    }

    fn push_image(&self, layout: &mut LinearLayout, image: &ImageBlock) {
        let decoded = match &image.source {
            ImageSource::Bytes(bytes) => elements::decode_image_from_bytes(bytes),
            ImageSource::Path(path) => elements::decode_image_from_path(path),
        };
        let element = decoded.and_then(|decoded| {
            elements::scaled_image(decoded, pt_to_mm(image.width), alignment(image.alignment))
        });
        match element {
            Ok(element) => layout.push(element),
            Err(err) => warn!("Skipping image: {}", err),
        }
    }
}

fn base_style(paragraph: &RichParagraph) -> Style {
    Style::new()
        .with_font_size(font_size_u8(paragraph.font_size()))
        .with_color(color(paragraph.color()))
}
