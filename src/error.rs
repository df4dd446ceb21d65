//! Errors of the export path.
//!
//! Composition itself never fails; only turning a composed tree into PDF bytes can.

use thiserror::Error;

/// Failure while producing PDF bytes.
#[derive(Debug, Error)]
pub enum ExportError {
    /// None of the configured font families could be loaded.
    #[error("failed to load font family `{family}`: {source}")]
    FontLoad {
        family: String,
        #[source]
        source: genpdf::error::Error,
    },

    /// The rendering backend rejected the document.
    #[error("failed to render PDF: {0}")]
    Render(#[from] genpdf::error::Error),

    /// The rendered bytes could not be post-processed.
    #[cfg(feature = "metadata")]
    #[error("failed to write document metadata: {0}")]
    Metadata(#[from] crate::metadata::MetadataError),
}
