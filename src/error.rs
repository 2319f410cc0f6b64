//! Error types for the headless viewer

use thiserror::Error;

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the headless viewer
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the viewer or a PDF backend
    #[error("Viewer initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load the hosting page
    #[error("Failed to load page: {0}")]
    LoadError(String),

    /// The hosting page has no element with the `pdf-link` marker class
    #[error("No PDF link element found in page")]
    MissingPdfLink,

    /// A `pdf-link` element was found but its URL is unusable
    #[error("PDF link is not usable: {0}")]
    InvalidPdfLink(String),

    /// The hosting page has no element with the `pdf-canvas` marker class
    #[error("No PDF canvas element found in page")]
    MissingPdfCanvas,

    /// Failed to fetch or parse the PDF document
    #[error("Failed to load PDF document: {0}")]
    DocumentError(String),

    /// The requested page does not exist in the document
    #[error("Failed to get page: {0}")]
    PageError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
