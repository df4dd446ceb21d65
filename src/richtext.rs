//! Inline markup parsing for free-text resume fields.
//!
//! Summaries, highlights and descriptions accept a deliberately small grammar:
//!
//! - `**bold**`, `*italic*` and `<u>underline</u>`
//! - `[label](url)` links
//! - a line starting with `- ` is a bullet
//! - a line wrapped in `<p align="center">…</p>`, `<div align="right">…</div>`,
//!   `<p style="text-align: justify">…</p>` or `<center>…</center>` carries an alignment
//! - a blank line is a paragraph spacer
//!
//! Inline markup is resolved by splitting in a fixed precedence (bold, italic, underline,
//! link, text).  Each layer hands the text between its markers to the next layer with one
//! more style flag active, so styles accumulate downwards and are never removed by a nested
//! run.  A marker without a partner is kept as literal text.
//!
//! The parsed [`StyledRun`] tree is flattened into [`Span`]s, the unit the layout tree and
//! the PDF backend work with.

use serde::Serialize;

use crate::layout::HorizontalAlignment;

/// Height of a blank-line spacer relative to the font size.
pub const SPACER_RATIO: f64 = 0.6;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    link: Option<String>,
    color: Option<String>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns whether the span is marked as underlined.
    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Returns whether the span is (part of) a hyperlink.
    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    /// Returns the link target, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Sets the bold flag and returns the updated span.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated span.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the underline flag and returns the updated span.
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Sets the link target and returns the updated span.
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    /// Sets the span color and returns the updated span.
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Convenience shorthand that marks the span as underlined.
    pub fn underline(self) -> Self {
        self.with_underline(true)
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(self, color: impl Into<String>) -> Self {
        self.with_color(Some(color.into()))
    }

    fn same_style(&self, other: &Span) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.link == other.link
            && self.color == other.color
    }
}

/// Style flags active on a composite run.
///
/// The flags are cumulative: a nested run carries every flag of its ancestors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub link: Option<String>,
}

impl RunStyle {
    fn with_layer(&self, layer: Layer) -> Self {
        let mut style = self.clone();
        match layer {
            Layer::Bold => style.bold = true,
            Layer::Italic => style.italic = true,
            Layer::Underline => style.underline = true,
            Layer::Link | Layer::Text => {}
        }
        style
    }

    fn span(&self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            link: self.link.clone(),
            color: None,
        }
    }
}

/// Node of the parsed inline markup tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StyledRun {
    /// Plain text that inherits the style of its parent.
    Text(String),
    /// A run with additional style flags applied to all children.
    Styled {
        style: RunStyle,
        children: Vec<StyledRun>,
    },
}

/// Controls how links are turned into text when flattening.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Print the URL instead of the label.
    pub show_full_url: bool,
    /// Prefix each link with [`LinkOptions::icon`].
    pub show_link_icon: bool,
    pub icon: String,
}

impl StyledRun {
    /// Returns the concatenated text of the run, link labels included.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            StyledRun::Text(text) => out.push_str(text),
            StyledRun::Styled { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Flattens the run into spans, applying the link presentation options.
    pub fn flatten(&self, links: &LinkOptions) -> Vec<Span> {
        let mut spans = Vec::new();
        self.flatten_into(&RunStyle::default(), links, &mut spans);
        spans
    }

    fn flatten_into(&self, inherited: &RunStyle, links: &LinkOptions, out: &mut Vec<Span>) {
        match self {
            StyledRun::Text(text) => push_span(out, inherited.span(text.as_str())),
            StyledRun::Styled { style, children } => {
                let opens_link = inherited.link.is_none();
                match &style.link {
                    Some(url) if opens_link => {
                        if links.show_link_icon && !links.icon.is_empty() {
                            push_span(out, style.span(format!("{} ", links.icon)));
                        }
                        if links.show_full_url {
                            push_span(out, style.span(url.as_str()));
                            return;
                        }
                    }
                    _ => {}
                }
                for child in children {
                    child.flatten_into(style, links, out);
                }
            }
        }
    }
}

/// Flattens a sequence of runs, merging neighbouring spans with identical styles.
pub fn flatten_runs(runs: &[StyledRun], links: &LinkOptions) -> Vec<Span> {
    let mut spans = Vec::new();
    for run in runs {
        for span in run.flatten(links) {
            push_span(&mut spans, span);
        }
    }
    spans
}

fn push_span(spans: &mut Vec<Span>, span: Span) {
    if span.text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.same_style(&span) => last.text.push_str(&span.text),
        _ => spans.push(span),
    }
}

/// One parsed input line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RichLine {
    /// Vertical gap produced by a blank line, in points.
    Spacer { height: f64 },
    /// A line of inline markup.
    Text {
        alignment: Option<HorizontalAlignment>,
        bullet: bool,
        runs: Vec<StyledRun>,
    },
}

/// Parsed multi-line rich text.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RichText {
    pub lines: Vec<RichLine>,
}

impl RichText {
    /// Returns the text of all lines joined with `\n`, spacers contributing empty lines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                RichLine::Spacer { .. } => String::new(),
                RichLine::Text { runs, .. } => runs.iter().map(StyledRun::plain_text).collect(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parses a possibly multi-line string.
///
/// `font_size` (points) scales the spacer emitted for blank lines.
pub fn parse_rich_text(input: &str, font_size: f64) -> RichText {
    let trimmed = input.trim_matches(|c| c == '\n' || c == '\r');
    let lines = trimmed
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                return RichLine::Spacer {
                    height: font_size * SPACER_RATIO,
                };
            }
            let (alignment, content) = strip_alignment(line.trim());
            let (bullet, content) = match content.trim_start().strip_prefix("- ") {
                Some(rest) => (true, rest),
                None => (false, content),
            };
            RichLine::Text {
                alignment,
                bullet,
                runs: parse_inline(content),
            }
        })
        .collect();
    RichText { lines }
}

/// Parses one line of inline markup into a run tree.
pub fn parse_inline(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    split_layer(text, Layer::Bold, &RunStyle::default(), &mut runs);
    runs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Bold,
    Italic,
    Underline,
    Link,
    Text,
}

impl Layer {
    fn next(self) -> Layer {
        match self {
            Layer::Bold => Layer::Italic,
            Layer::Italic => Layer::Underline,
            Layer::Underline => Layer::Link,
            Layer::Link | Layer::Text => Layer::Text,
        }
    }

    fn delimiters(self) -> Option<(&'static str, &'static str)> {
        match self {
            Layer::Bold => Some(("**", "**")),
            Layer::Italic => Some(("*", "*")),
            Layer::Underline => Some(("<u>", "</u>")),
            Layer::Link | Layer::Text => None,
        }
    }
}

fn split_layer(text: &str, layer: Layer, style: &RunStyle, out: &mut Vec<StyledRun>) {
    if text.is_empty() {
        return;
    }
    match layer {
        Layer::Text => out.push(StyledRun::Text(text.to_owned())),
        Layer::Link => split_links(text, style, out),
        _ => {
            if let Some((open, close)) = layer.delimiters() {
                split_delimited(text, layer, open, close, style, out);
            }
        }
    }
}

fn split_delimited(
    text: &str,
    layer: Layer,
    open: &str,
    close: &str,
    style: &RunStyle,
    out: &mut Vec<StyledRun>,
) {
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        split_layer(&rest[..start], layer.next(), style, out);
        let after_open = &rest[start + open.len()..];

        match after_open.find(close) {
            Some(end) if is_valid_inner(&after_open[..end], layer) => {
                let nested_style = style.with_layer(layer);
                let mut children = Vec::new();
                split_layer(&after_open[..end], layer.next(), &nested_style, &mut children);
                out.push(StyledRun::Styled {
                    style: nested_style,
                    children,
                });
                rest = &after_open[end + close.len()..];
            }
            _ => {
                out.push(StyledRun::Text(open.to_owned()));
                rest = after_open;
            }
        }
    }
    split_layer(rest, layer.next(), style, out);
}

fn is_valid_inner(inner: &str, layer: Layer) -> bool {
    if inner.is_empty() {
        return false;
    }
    match layer {
        Layer::Bold | Layer::Italic => {
            !inner.starts_with(char::is_whitespace) && !inner.ends_with(char::is_whitespace)
        }
        _ => !inner.trim().is_empty(),
    }
}

fn split_links(text: &str, style: &RunStyle, out: &mut Vec<StyledRun>) {
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        split_layer(&rest[..start], Layer::Text, style, out);
        let after_open = &rest[start + 1..];

        match parse_link_tail(after_open) {
            Some((label, url, consumed)) => {
                let nested_style = RunStyle {
                    link: Some(url.to_owned()),
                    ..style.clone()
                };
                out.push(StyledRun::Styled {
                    style: nested_style,
                    children: vec![StyledRun::Text(label.to_owned())],
                });
                rest = &after_open[consumed..];
            }
            None => {
                out.push(StyledRun::Text("[".to_owned()));
                rest = after_open;
            }
        }
    }
    split_layer(rest, Layer::Text, style, out);
}

/// Parses `label](url)` and returns the label, the url and the consumed byte count.
fn parse_link_tail(input: &str) -> Option<(&str, &str, usize)> {
    let label_end = input.find(']')?;
    let label = &input[..label_end];
    if label.trim().is_empty() || label.contains('[') {
        return None;
    }

    let after_label = input[label_end + 1..].strip_prefix('(')?;
    let url_end = after_label.find(')')?;
    let url = after_label[..url_end].trim();
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }

    Some((label, url, label_end + 2 + url_end + 1))
}

fn strip_alignment(line: &str) -> (Option<HorizontalAlignment>, &str) {
    if let Some(inner) = line
        .strip_prefix("<center>")
        .and_then(|rest| rest.strip_suffix("</center>"))
    {
        return (Some(HorizontalAlignment::Center), inner.trim());
    }

    for tag in ["p", "div"] {
        let Some(after_name) = line.strip_prefix('<').and_then(|rest| rest.strip_prefix(tag))
        else {
            continue;
        };
        if !after_name.starts_with(|c: char| c == '>' || c.is_whitespace()) {
            continue;
        }
        let Some(tag_end) = after_name.find('>') else {
            continue;
        };
        let closing = format!("</{}>", tag);
        let Some(inner) = after_name[tag_end + 1..].strip_suffix(closing.as_str()) else {
            continue;
        };
        let alignment = alignment_from_attributes(&after_name[..tag_end]);
        return (alignment, inner.trim());
    }

    (None, line)
}

fn alignment_from_attributes(attributes: &str) -> Option<HorizontalAlignment> {
    let lowered = attributes.to_ascii_lowercase();
    let value = if let Some(index) = lowered.find("text-align") {
        let rest = lowered[index + "text-align".len()..].trim_start();
        rest.strip_prefix(':')?.trim_start()
    } else if let Some(index) = lowered.find("align=") {
        lowered[index + "align=".len()..].trim_start_matches(['"', '\''])
    } else {
        return None;
    };

    let word: String = value
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    match word.as_str() {
        "left" => Some(HorizontalAlignment::Left),
        "center" => Some(HorizontalAlignment::Center),
        "right" => Some(HorizontalAlignment::Right),
        "justify" => Some(HorizontalAlignment::Justified),
        _ => None,
    }
}
