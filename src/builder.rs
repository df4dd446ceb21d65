//! Page setup for rendered resumes.

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, Position, Size};

use crate::layout::{pt_to_mm, PageSpec};
use crate::render::elements::mm_from_f64;

const PAGE_NUMBER_FONT_SIZE: u8 = 8;
const PAGE_NUMBER_FOOTER_MM: f64 = 8.0;

/// Builder for `genpdf::Document` instances configured from a [`PageSpec`].
pub struct DocumentBuilder {
    font_family: FontFamily<FontData>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
    title: Option<String>,
    font_size: Option<u8>,
    line_spacing: Option<f64>,
}

type ElementFactory = dyn Fn(usize) -> Box<dyn Element>;

impl DocumentBuilder {
    /// Creates a builder that renders with the given font family.
    pub fn new(font_family: FontFamily<FontData>) -> Self {
        Self {
            font_family,
            paper_size: None,
            margins: None,
            footer: None,
            title: None,
            font_size: None,
            line_spacing: None,
        }
    }

    /// Applies paper size, margins, text defaults and page numbers from `page`.
    pub fn with_page(mut self, page: &PageSpec) -> Self {
        let (width, height) = page.paper_size.dimensions_pt();
        self = self
            .with_paper_size(Size::new(
                mm_from_f64(pt_to_mm(width)),
                mm_from_f64(pt_to_mm(height)),
            ))
            .with_margins(Margins::vh(
                mm_from_f64(pt_to_mm(page.margin_vertical)),
                mm_from_f64(pt_to_mm(page.margin_horizontal)),
            ));
        self.font_size = Some(font_size_u8(page.font_size));
        self.line_spacing = Some(page.line_spacing.max(0.5));
        if page.show_page_numbers {
            self = self.with_footer(mm_from_f64(PAGE_NUMBER_FOOTER_MM), |page| {
                Paragraph::new(page.to_string())
                    .aligned(Alignment::Center)
                    .styled(style::Style::new().with_font_size(PAGE_NUMBER_FONT_SIZE))
            });
        }
        self
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the document title written by the backend.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> genpdf::Document {
        let mut document = genpdf::Document::new(self.font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(line_spacing) = self.line_spacing {
            document.set_line_spacing(line_spacing);
        }

        document.set_page_decorator(ConfiguredPageDecorator::new(self.margins, self.footer));
        document
    }
}

/// Converts a point size to the integer size genpdf styles take.
pub fn font_size_u8(size: f64) -> u8 {
    if size.is_finite() {
        size.round().clamp(1.0, 255.0) as u8
    } else {
        10
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<ElementFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    page: usize,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
}

impl ConfiguredPageDecorator {
    fn new(margins: Option<Margins>, footer: Option<FooterSpec>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(self.page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::font_size_u8;

    #[test]
    fn font_sizes_are_rounded_and_clamped() {
        assert_eq!(font_size_u8(10.5), 11);
        assert_eq!(font_size_u8(0.2), 1);
        assert_eq!(font_size_u8(900.0), 255);
        assert_eq!(font_size_u8(f64::NAN), 10);
    }
}
