//! Document factory: wires a template, a resume and user overrides together.

use serde_json::Value;

use crate::color::ColorResolver;
use crate::composer;
use crate::error::ExportError;
use crate::layout::ComposedDocument;
use crate::render;
use crate::resume::ResumeRecord;
use crate::settings::{merge, EffectiveSettings, LayoutSettings};
use crate::template::{self, TemplateConfig};

/// Rendered PDF bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedPdf {
    pub bytes: Vec<u8>,
}

/// A resume bound to a template, ready to compose or export.
///
/// Settings and colors are resolved when the document is built and whenever overrides
/// change; composing never mutates them.
#[derive(Clone, Debug)]
pub struct ResumeDocument {
    template: TemplateConfig,
    resume: ResumeRecord,
    overrides: Option<Value>,
    settings: EffectiveSettings,
    colors: ColorResolver,
}

impl ResumeDocument {
    /// Binds `resume` to `template` with no per-document overrides.
    pub fn new(template: TemplateConfig, resume: ResumeRecord) -> Self {
        let mut document = Self {
            template,
            resume,
            overrides: None,
            settings: EffectiveSettings::default(),
            colors: ColorResolver::default(),
        };
        document.resolve();
        document
    }

    /// Uses a preset from the built-in catalog; unknown ids fall back to the default preset.
    pub fn from_template_id(id: &str, resume: ResumeRecord) -> Self {
        Self::new(template::get_or_default(id).clone(), resume)
    }

    /// Layers per-document settings over the template theme.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.overrides = Some(overrides);
        self.resolve();
        self
    }

    fn resolve(&mut self) {
        let mut layers: Vec<&Value> = Vec::with_capacity(2);
        layers.extend(self.template.theme.as_ref());
        layers.extend(self.overrides.as_ref());
        self.settings = merge::resolve(&LayoutSettings::default(), &layers);

        let accent = self
            .settings
            .accent_color
            .clone()
            .unwrap_or_else(|| self.template.accent_color.clone());
        let targets = self
            .settings
            .color_targets
            .clone()
            .unwrap_or_else(|| self.template.color_targets.clone());
        self.colors = ColorResolver::new(accent, targets);
    }

    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }

    pub fn resume(&self) -> &ResumeRecord {
        &self.resume
    }

    /// The merged settings used for rendering.
    pub fn settings(&self) -> &EffectiveSettings {
        &self.settings
    }

    /// The accent color strategy used for rendering.
    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    /// Builds the page tree without invoking the PDF backend.
    pub fn compose(&self) -> ComposedDocument {
        composer::compose(&self.template, &self.resume, &self.settings, &self.colors)
    }

    /// Composes and renders the document to PDF bytes.
    pub fn export(&self) -> Result<ExportedPdf, ExportError> {
        let composed = self.compose();
        let bytes = render::render_document(&composed)?;

        #[cfg(feature = "metadata")]
        let bytes = crate::metadata::apply_document_info(&bytes, &composed.info)?;

        Ok(ExportedPdf { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorTarget;
    use crate::template::LayoutType;
    use serde_json::json;

    #[test]
    fn template_theme_then_document_overrides() {
        let mut template = TemplateConfig::new("t", "T", LayoutType::SingleColumn);
        template.theme = Some(json!({"columnGap": 20, "headingRule": false}));

        let document = ResumeDocument::new(template.clone(), ResumeRecord::default());
        assert_eq!(document.settings().column_gap, 20.0);
        assert!(!document.settings().heading_rule);

        let document = document.with_overrides(json!({"columnGap": 8}));
        assert_eq!(document.settings().column_gap, 8.0);
        assert!(!document.settings().heading_rule);
    }

    #[test]
    fn user_accent_and_targets_replace_template_defaults() {
        let document = ResumeDocument::from_template_id("modern", ResumeRecord::default());
        assert_eq!(document.colors().accent(), "#2563eb");
        assert!(document.colors().applies_to(ColorTarget::Links));

        let document = document.with_overrides(json!({
            "accentColor": "#ff00ff",
            "colorTargets": ["name"]
        }));
        assert_eq!(document.colors().accent(), "#ff00ff");
        assert!(document.colors().applies_to(ColorTarget::Name));
        assert!(!document.colors().applies_to(ColorTarget::Links));
    }

    #[test]
    fn unknown_template_uses_default() {
        let document = ResumeDocument::from_template_id("does-not-exist", ResumeRecord::default());
        assert_eq!(document.template().id, template::DEFAULT_TEMPLATE_ID);
    }
}
