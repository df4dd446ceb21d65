//! Custom `genpdf` elements and conversion helpers used by the renderer.
//!
//! genpdf has no underlines, horizontal rules, hanging list markers, exact vertical gaps
//! or cell backgrounds, so this module adds small elements for each.  Image decoding is
//! delegated to the [`image`] crate.

use std::ops::Range;
use std::path::Path;

use image::GenericImageView;

use genpdf::elements::Image;
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Scale, Size};
use log::warn;

use crate::color::{parse_hex, NEUTRAL_COLOR};
use crate::layout::HorizontalAlignment;
use crate::richtext::Span;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;
const FILL_STROKE_STEP_MM: f64 = 0.25;

/// Converts a millimetre value into the genpdf unit type.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Parses a hex color, falling back to the neutral color with a warning.
pub fn color(value: &str) -> Color {
    let rgb = parse_hex(value).unwrap_or_else(|| {
        warn!("Invalid color `{}`; using {}", value, NEUTRAL_COLOR);
        parse_hex(NEUTRAL_COLOR).unwrap_or(crate::color::Rgb(0x33, 0x33, 0x33))
    });
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Maps a model alignment onto genpdf's; justification is rendered left aligned.
pub fn alignment(alignment: HorizontalAlignment) -> Alignment {
    match alignment {
        HorizontalAlignment::Left | HorizontalAlignment::Justified => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

/// Builds the genpdf style of a span.
pub fn span_style(span: &Span) -> Style {
    let mut style = Style::new();
    if let Some(value) = span.color() {
        style.set_color(color(value));
    }
    if span.is_bold() {
        style.set_bold();
    }
    if span.is_italic() {
        style.set_italic();
    }
    style
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        StyledString::new(span.text().to_owned(), span_style(span))
    }
}

/// A styled string ready for genpdf together with the underline flag it cannot carry.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    pub string: StyledString,
    pub underline: bool,
}

impl From<&Span> for StyledSpan {
    fn from(span: &Span) -> Self {
        Self {
            string: span.into(),
            underline: span.is_underlined(),
        }
    }
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from in-memory bytes.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Loads an image from the given path.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Converts a decoded image into a genpdf image scaled to `width_mm`.
pub fn scaled_image(
    image: image::DynamicImage,
    width_mm: f64,
    align: Alignment,
) -> Result<Image, Error> {
    let natural = mm_to_f64(estimated_image_size(&image, DEFAULT_IMAGE_DPI).width);
    let mut element = Image::from_dynamic_image(image)?;
    if natural > f64::EPSILON && width_mm > 0.0 {
        let scale = width_mm / natural;
        element.set_scale(Scale::new(scale, scale));
    }
    element.set_alignment(align);
    Ok(element)
}

/// Splits text into words that keep their trailing whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_space = true;
        } else if in_space {
            words.push(&text[start..index]);
            start = index;
            in_space = false;
        }
    }
    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

/// Greedy line breaking over `(width, width without trailing space)` pairs.
///
/// A word wider than `available` gets a line of its own.
fn break_lines(widths: &[(f64, f64)], available: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (index, (full, trimmed)) in widths.iter().enumerate() {
        if index > start && used + trimmed > available {
            lines.push(start..index);
            start = index;
            used = 0.0;
        }
        used += full;
    }
    if start < widths.len() {
        lines.push(start..widths.len());
    }
    lines
}

struct Word {
    string: StyledString,
    underline: bool,
    width: Mm,
    trimmed_width: Mm,
    line_height: Mm,
    glyph_height: Mm,
}

/// Wrapped styled text that can underline individual spans.
///
/// genpdf paragraphs cannot draw underlines, so this element breaks its spans into words,
/// lays them out line by line and strokes a line under each underlined word.  Rendering
/// resumes at the first unprinted line when the text continues on the next page.
pub struct UnderlinedText {
    spans: Vec<StyledSpan>,
    alignment: Alignment,
    underline_offset: Mm,
    next_word: usize,
}

impl UnderlinedText {
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
            next_word: 0,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn words(&self, context: &genpdf::Context, style: Style) -> Vec<Word> {
        let fonts = &context.font_cache;
        let mut words = Vec::new();
        for span in &self.spans {
            let word_style = style.and(span.string.style);
            let glyph_height = word_style.font(fonts).glyph_height(word_style.font_size());
            for text in split_words(&span.string.s) {
                let string = StyledString::new(text.to_owned(), word_style);
                let trimmed = StyledString::new(text.trim_end().to_owned(), word_style);
                words.push(Word {
                    width: string.width(fonts),
                    trimmed_width: trimmed.width(fonts),
                    line_height: word_style.line_height(fonts),
                    glyph_height,
                    underline: span.underline,
                    string,
                });
            }
        }
        words
    }
}

impl Element for UnderlinedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let words = self.words(context, style);
        let remaining = words.get(self.next_word..).unwrap_or_default();
        let widths: Vec<(f64, f64)> = remaining
            .iter()
            .map(|word| (mm_to_f64(word.width), mm_to_f64(word.trimmed_width)))
            .collect();
        let available = area.size().width;
        let base_height = style.line_height(&context.font_cache);

        let mut result = RenderResult::default();
        let mut top = Mm::default();
        let mut printed = 0;
        for range in break_lines(&widths, mm_to_f64(available)) {
            let line = &remaining[range.clone()];
            let height = line
                .iter()
                .fold(base_height, |height, word| height.max(word.line_height));
            if top + height > area.size().height {
                result.has_more = true;
                break;
            }

            let width = line.iter().enumerate().fold(Mm::default(), |width, (index, word)| {
                if index + 1 == line.len() {
                    width + word.trimmed_width
                } else {
                    width + word.width
                }
            });
            let slack = if available > width {
                available - width
            } else {
                Mm::default()
            };
            let left = match self.alignment {
                Alignment::Left => Mm::default(),
                Alignment::Center => slack / 2.0,
                Alignment::Right => slack,
            };

            let Some(mut section) =
                area.text_section(&context.font_cache, Position::new(left, top), style)
            else {
                result.has_more = true;
                break;
            };
            for word in line {
                section.print_str(&word.string.s, word.string.style)?;
            }

            let glyph_height = line
                .iter()
                .fold(Mm::default(), |height, word| height.max(word.glyph_height));
            let baseline = top + glyph_height + self.underline_offset;
            let mut cursor = left;
            for (index, word) in line.iter().enumerate() {
                let stroke = if index + 1 == line.len() {
                    word.trimmed_width
                } else {
                    word.width
                };
                if word.underline {
                    let mut line_style = Style::new();
                    if let Some(color) = word.string.style.color().or(style.color()) {
                        line_style = line_style.with_color(color);
                    }
                    area.draw_line(
                        vec![
                            Position::new(cursor, baseline),
                            Position::new(cursor + stroke, baseline),
                        ],
                        line_style,
                    );
                }
                cursor += word.width;
            }

            result.size.width = result.size.width.max(width);
            top += height;
            printed = range.end;
        }

        self.next_word += printed;
        result.size.height = top;
        Ok(result)
    }
}

/// A horizontal rule spanning the available width.
pub struct Rule {
    color: Color,
    offset: Mm,
}

impl Rule {
    /// Creates a rule drawn `offset` below the top of its area.
    pub fn new(color: Color, offset: Mm) -> Self {
        Self { color, offset }
    }
}

impl Element for Rule {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let height = self.offset + self.offset;
        if height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }
        let width = area.size().width;
        area.draw_line(
            vec![Position::new(0, self.offset), Position::new(width, self.offset)],
            Style::new().with_color(self.color),
        );
        result.size = Size::new(width, height);
        Ok(result)
    }
}

/// An exact vertical gap.
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    pub fn new(height: Mm) -> Self {
        Self { height }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A list entry: a marker in the gutter and the item content indented next to it.
pub struct ListItem<E: Element> {
    marker: Option<StyledString>,
    indent: Mm,
    content: E,
    marker_drawn: bool,
}

impl<E: Element> ListItem<E> {
    /// Creates an item; without a marker the content is still indented.
    pub fn new(content: E, marker: Option<StyledString>, indent: Mm) -> Self {
        Self {
            marker,
            indent,
            content,
            marker_drawn: false,
        }
    }
}

impl<E: Element> Element for ListItem<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut content_area = area.clone();
        content_area.add_margins(Margins::trbl(0, 0, 0, self.indent));
        let mut result = self.content.render(context, content_area, style)?;

        if !self.marker_drawn {
            if let Some(marker) = &self.marker {
                let marker_style = style.and(marker.style);
                if let Some(mut section) =
                    area.text_section(&context.font_cache, Position::new(0, 0), marker_style)
                {
                    section.print_str(&marker.s, marker_style)?;
                }
            }
            self.marker_drawn = true;
        }

        result.size.width += self.indent;
        Ok(result)
    }
}

/// Paints a background behind its content down to the bottom of the available area.
pub struct Background<E: Element> {
    color: Color,
    padding: Mm,
    content: E,
}

impl<E: Element> Background<E> {
    pub fn new(content: E, color: Color, padding: Mm) -> Self {
        Self {
            color,
            padding,
            content,
        }
    }
}

impl<E: Element> Element for Background<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let size = area.size();
        let stroke = Style::new().with_color(self.color);
        let step = mm_from_f64(FILL_STROKE_STEP_MM);
        let mut y = Mm::default();
        while y < size.height {
            area.draw_line(
                vec![Position::new(0, y), Position::new(size.width, y)],
                stroke,
            );
            y += step;
        }

        let mut content_area = area.clone();
        content_area.add_margins(Margins::all(self.padding));
        let mut result = self.content.render(context, content_area, style)?;
        result.size = Size::new(size.width, result.size.height + self.padding + self.padding);
        Ok(result)
    }
}
