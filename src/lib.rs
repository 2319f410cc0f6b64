//! pdfcanvas
//!
//! A headless first-page PDF viewer for Rust. Given a web page that marks
//! one element as the PDF link (class `pdf-link`, URL in its `href`) and one
//! as the render target (class `pdf-canvas`), the viewer asks its PDF
//! library to open the linked document, fetches page 1, sizes the canvas to
//! the page's native viewport, and rasterizes the page into the canvas's 2D
//! drawing context.
//!
//! # Features
//!
//! - **pdfium backend** (default): rasterization via the pdfium library
//! - **Validated lookups**: absent page markers fail with named errors
//!   before any document fetch
//! - **Async facade**: a worker-backed [`AsyncViewer`] for tokio callers
//!
//! # Example
//!
//! ```no_run
//! use pdfcanvas::ViewerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ViewerConfig {
//!     timeout_ms: 30000,
//!     ..Default::default()
//! };
//!
//! let mut viewer = pdfcanvas::new_viewer(config)?;
//! viewer.load_url("https://example.com/letters/42/")?;
//! viewer.display_document()?;
//!
//! let canvas = viewer.canvas().expect("document displayed");
//! println!("canvas: {}x{}", canvas.width(), canvas.height());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod canvas;
pub use canvas::{Canvas, Context2d};

pub mod dom;

// The PDF rendering library seam (pdfium backend behind the `pdfium` feature)
pub mod pdf;

pub mod viewer;
pub use viewer::PageViewer;

// Async-friendly viewer API (simple worker-backed abstraction)
pub mod async_api;

// Re-export the async facade at the crate root for ergonomic examples
pub use async_api::AsyncViewer;

/// Configuration for the headless viewer
///
/// The defaults are chosen to be conservative: a browser-compatible user
/// agent carrying the viewer's marker, a 30 second page timeout, and pdfium
/// resolved from the process directory or the system library.
///
/// # Examples
///
/// ```
/// let cfg = pdfcanvas::ViewerConfig::default();
/// assert!(cfg.user_agent.contains("PDFCanvas"));
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout for page and document loads in milliseconds
    pub timeout_ms: u64,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
    /// Explicit path to the pdfium library; `None` searches the process
    /// directory and then the system library
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            user_agent:
                "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0 PDFCanvas/0.1"
                    .to_string(),
            timeout_ms: 30000,
            headers: HashMap::new(),
            pdfium_library_path: None,
        }
    }
}

/// A page's rendering geometry at a given scale factor, as computed by the
/// PDF library. At scale 1 this is the page's native pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A record of the last completed display, suitable for serialization.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DisplaySnapshot {
    /// URL of the hosting page
    pub page_url: String,
    /// URL the PDF document was loaded from
    pub document_url: String,
    /// Canvas width after display (the page's native width)
    pub width: u32,
    /// Canvas height after display (the page's native height)
    pub height: u32,
}

/// Create a new viewer with the default PDF backend for this build.
pub fn new_viewer(config: ViewerConfig) -> Result<PageViewer> {
    PageViewer::new(config)
}
