//! The PDF rendering library seam.
//!
//! The viewer depends on exactly four capabilities from its PDF library:
//! open a document, fetch a numbered page, compute a page viewport at a
//! scale factor, and render a page into a drawing context. [`PdfBackend`]
//! captures those capabilities as an object-safe trait; the default
//! implementation delegates to pdfium (see [`pdfium`]). [`PdfLibrary`] wraps
//! a backend together with the HTTP fetch of the document bytes, so the
//! network interaction stays internal to the library seam, the way a browser
//! PDF library fetches the URL it is given.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as Base64Engine;
use reqwest::blocking::Client;

use crate::canvas::Context2d;
use crate::error::{Error, Result};
use crate::{ViewerConfig, Viewport};

#[cfg(feature = "pdfium")]
pub mod pdfium;

/// Number of the first page of a document. Pages are numbered from 1, the
/// way they are on screen.
pub const FIRST_PAGE: u16 = 1;

/// An opaque handle to a parsed document.
///
/// The handle keeps the raw bytes so backends can revisit the document for
/// per-page operations; callers only see the page count.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    bytes: Vec<u8>,
    pages: u16,
}

impl DocumentHandle {
    pub fn new(bytes: Vec<u8>, pages: u16) -> Self {
        Self { bytes, pages }
    }

    pub fn page_count(&self) -> u16 {
        self.pages
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// The capabilities the viewer requires of a PDF rendering backend.
pub trait PdfBackend: Send + Sync {
    /// Parse a document from raw bytes, returning an opaque handle.
    fn open_document(&self, bytes: Vec<u8>) -> Result<DocumentHandle>;

    /// Compute the viewport of a page at the given scale factor. Scale 1 is
    /// the page's native size.
    fn page_viewport(
        &self,
        document: &DocumentHandle,
        page_number: u16,
        scale: f32,
    ) -> Result<Viewport>;

    /// Rasterize a page at the viewport's geometry and paint it into the
    /// drawing context at the origin.
    fn render_page(
        &self,
        document: &DocumentHandle,
        page_number: u16,
        ctx: &mut Context2d,
        viewport: &Viewport,
    ) -> Result<()>;
}

/// A backend used when the crate is built without a PDF engine. Every
/// operation fails with a descriptive error.
pub struct NoopBackend;

impl NoopBackend {
    pub fn new() -> Self {
        NoopBackend
    }
}

impl Default for NoopBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for NoopBackend {
    fn open_document(&self, _bytes: Vec<u8>) -> Result<DocumentHandle> {
        Err(Error::DocumentError(
            "No PDF backend is enabled; rebuild with the `pdfium` feature".into(),
        ))
    }

    fn page_viewport(
        &self,
        _document: &DocumentHandle,
        _page_number: u16,
        _scale: f32,
    ) -> Result<Viewport> {
        Err(Error::PageError("No PDF backend is enabled".into()))
    }

    fn render_page(
        &self,
        _document: &DocumentHandle,
        _page_number: u16,
        _ctx: &mut Context2d,
        _viewport: &Viewport,
    ) -> Result<()> {
        Err(Error::RenderError("No PDF backend is enabled".into()))
    }
}

/// The PDF rendering library as the viewer sees it: a backend plus the
/// document fetch.
pub struct PdfLibrary {
    backend: Arc<dyn PdfBackend>,
    client: Client,
    user_agent: String,
    headers: HashMap<String, String>,
}

impl PdfLibrary {
    /// Create the library with the default backend for this build: pdfium
    /// when the `pdfium` feature is enabled, a no-op backend otherwise.
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        #[cfg(feature = "pdfium")]
        let backend: Arc<dyn PdfBackend> = Arc::new(pdfium::PdfiumBackend::new(
            config.pdfium_library_path.as_deref(),
        )?);

        #[cfg(not(feature = "pdfium"))]
        let backend: Arc<dyn PdfBackend> = Arc::new(NoopBackend::new());

        Self::with_backend(backend, config)
    }

    /// Create the library around an explicit backend. Used by tests to
    /// substitute recording or stub backends.
    pub fn with_backend(backend: Arc<dyn PdfBackend>, config: &ViewerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            backend,
            client,
            user_agent: config.user_agent.clone(),
            headers: config.headers.clone(),
        })
    }

    /// Begin loading the document at `url` and parse it into a document
    /// handle. The fetch is internal: `http(s)` URLs are requested with the
    /// library's own client, `data:` URLs are decoded in place.
    pub fn get_document(&self, url: &str) -> Result<PdfDocument> {
        let bytes = self.fetch_document_bytes(url)?;
        log::debug!("fetched PDF document: {} ({} bytes)", url, bytes.len());

        let handle = self.backend.open_document(bytes)?;
        Ok(PdfDocument {
            backend: self.backend.clone(),
            handle,
            url: url.to_string(),
        })
    }

    fn fetch_document_bytes(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(rest) = url.strip_prefix("data:") {
            return decode_data_url(rest);
        }

        let mut req = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.clone());
        for (name, value) in &self.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .map_err(|e| Error::DocumentError(format!("Failed to fetch {}: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(Error::DocumentError(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| Error::DocumentError(format!("Failed to read response body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

/// Decode the payload of a `data:` URL (the part after `data:`).
fn decode_data_url(rest: &str) -> Result<Vec<u8>> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::DocumentError("Malformed data URL: no comma".into()))?;

    if header.ends_with(";base64") {
        Base64Engine::decode(&base64::engine::general_purpose::STANDARD, payload)
            .map_err(|e| Error::DocumentError(format!("Invalid base64 in data URL: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// A parsed document, as returned by [`PdfLibrary::get_document`].
pub struct PdfDocument {
    backend: Arc<dyn PdfBackend>,
    handle: DocumentHandle,
    url: String,
}

impl PdfDocument {
    pub fn page_count(&self) -> u16 {
        self.handle.page_count()
    }

    /// The URL the document was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch a page by its 1-based number.
    pub fn page(&self, number: u16) -> Result<PdfPage<'_>> {
        if number < FIRST_PAGE {
            return Err(Error::PageError(
                "page 0 is out of range (pages are numbered from 1)".into(),
            ));
        }
        if number > self.handle.page_count() {
            return Err(Error::PageError(format!(
                "page {} is out of range ({} pages in document)",
                number,
                self.handle.page_count()
            )));
        }
        Ok(PdfPage { doc: self, number })
    }
}

/// A page handle obtained from a document.
pub struct PdfPage<'a> {
    doc: &'a PdfDocument,
    number: u16,
}

impl PdfPage<'_> {
    pub fn number(&self) -> u16 {
        self.number
    }

    /// The page's rendering geometry at the given scale factor.
    pub fn viewport(&self, scale: f32) -> Result<Viewport> {
        self.doc
            .backend
            .page_viewport(&self.doc.handle, self.number, scale)
    }

    /// Rasterize this page into the drawing context at the viewport's size.
    pub fn render(&self, ctx: &mut Context2d, viewport: &Viewport) -> Result<()> {
        self.doc
            .backend
            .render_page(&self.doc.handle, self.number, ctx, viewport)
    }
}
