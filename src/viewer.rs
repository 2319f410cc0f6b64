//! The page viewer: drives the one-shot load-and-render chain.
//!
//! `load_url` fetches the hosting page; `display_document` then reads the
//! PDF URL from the page's `pdf-link` element, locates the `pdf-canvas`
//! render target, opens the document through the PDF library, fetches page
//! 1, sizes the canvas to the page's viewport at native scale, and renders
//! the page into the canvas's 2D context. Document load strictly precedes
//! page retrieval, which strictly precedes render.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::canvas::Canvas;
use crate::dom;
use crate::error::{Error, Result};
use crate::pdf::{PdfBackend, PdfLibrary, FIRST_PAGE};
use crate::{DisplaySnapshot, ViewerConfig, Viewport};

/// Pages are displayed at their native size.
const DISPLAY_SCALE: f32 = 1.0;

type OnDisplayHandler = Arc<dyn Fn(&Viewport) + Send + Sync>;

/// A synchronous headless viewer holding one loaded page at a time.
pub struct PageViewer {
    client: Client,
    config: ViewerConfig,
    pdf: PdfLibrary,
    last_html: Option<String>,
    last_url: Option<String>,
    canvas: Option<Canvas>,
    document_url: Option<String>,
    on_display: Option<OnDisplayHandler>,
}

impl PageViewer {
    /// Create a viewer with the default PDF backend for this build.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let pdf = PdfLibrary::new(&config)?;
        Self::with_library(config, pdf)
    }

    /// Create a viewer around an explicit PDF backend. This is the seam
    /// tests use to substitute recording or no-op backends.
    pub fn with_backend(config: ViewerConfig, backend: Arc<dyn PdfBackend>) -> Result<Self> {
        let pdf = PdfLibrary::with_backend(backend, &config)?;
        Self::with_library(config, pdf)
    }

    fn with_library(config: ViewerConfig, pdf: PdfLibrary) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            pdf,
            last_html: None,
            last_url: None,
            canvas: None,
            document_url: None,
            on_display: None,
        })
    }

    /// Load the hosting page at `url`.
    pub fn load_url(&mut self, url: &str) -> Result<()> {
        let mut req = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.clone());
        for (name, value) in &self.config.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .send()
            .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;

        let body = resp
            .text()
            .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;

        log::debug!("loaded page {} ({} bytes)", url, body.len());

        self.last_html = Some(body);
        self.last_url = Some(url.to_string());

        // Results of a previous display are stale after navigation
        self.canvas = None;
        self.document_url = None;

        Ok(())
    }

    /// Run the display chain for the loaded page.
    ///
    /// The page markers are validated before the document is fetched: a page
    /// without a `pdf-link` or `pdf-canvas` element fails here with a named
    /// error and no network request is made for the document.
    pub fn display_document(&mut self) -> Result<()> {
        let html = self
            .last_html
            .as_ref()
            .ok_or_else(|| Error::LoadError("No page loaded".into()))?;
        let base_url = self.last_url.as_deref().unwrap_or_default();

        let pdf_url = dom::find_pdf_link(html, base_url)?;
        let mut canvas = dom::find_pdf_canvas(html)?;
        log::debug!("located PDF link: {}", pdf_url);

        let document = self.pdf.get_document(&pdf_url)?;
        let page = document.page(FIRST_PAGE)?;
        let viewport = page.viewport(DISPLAY_SCALE)?;

        canvas.set_height(viewport.height);
        canvas.set_width(viewport.width);

        let ctx = canvas.context_2d();
        page.render(ctx, &viewport)?;
        log::debug!(
            "rendered page {} at {}x{}",
            FIRST_PAGE,
            viewport.width,
            viewport.height
        );

        self.canvas = Some(canvas);
        self.document_url = Some(pdf_url);

        if let Some(cb) = &self.on_display {
            cb(&viewport);
        }

        Ok(())
    }

    /// The canvas produced by the last display, if any.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Encode the displayed canvas as PNG.
    pub fn render_png(&self) -> Result<Vec<u8>> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| Error::RenderError("No document displayed".into()))?;
        canvas.to_png()
    }

    /// A serializable record of the last display.
    pub fn snapshot(&self) -> Result<DisplaySnapshot> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| Error::RenderError("No document displayed".into()))?;
        Ok(DisplaySnapshot {
            page_url: self.last_url.clone().unwrap_or_default(),
            document_url: self.document_url.clone().unwrap_or_default(),
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    /// Register a callback invoked with the viewport after each successful
    /// display.
    pub fn on_display<F>(&mut self, cb: F)
    where
        F: Fn(&Viewport) + Send + Sync + 'static,
    {
        self.on_display = Some(Arc::new(cb));
    }

    /// Remove a previously registered on_display callback if any
    pub fn clear_on_display(&mut self) {
        self.on_display = None;
    }

    /// Close the viewer and release its resources.
    pub fn close(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::DocumentHandle;
    use base64::Engine as Base64Engine;
    use std::sync::Mutex;

    /// Records every backend call so tests can assert on the glue contract.
    struct RecordingBackend {
        pages: u16,
        size: (u32, u32),
        opened: Mutex<Vec<Vec<u8>>>,
        viewports: Mutex<Vec<(u16, f32)>>,
        rendered: Mutex<Vec<u16>>,
    }

    impl RecordingBackend {
        fn with_pages(pages: u16) -> Self {
            Self {
                pages,
                size: (640, 480),
                opened: Mutex::new(Vec::new()),
                viewports: Mutex::new(Vec::new()),
                rendered: Mutex::new(Vec::new()),
            }
        }
    }

    impl PdfBackend for RecordingBackend {
        fn open_document(&self, bytes: Vec<u8>) -> Result<DocumentHandle> {
            self.opened.lock().unwrap().push(bytes.clone());
            Ok(DocumentHandle::new(bytes, self.pages))
        }

        fn page_viewport(
            &self,
            _document: &DocumentHandle,
            page_number: u16,
            scale: f32,
        ) -> Result<Viewport> {
            self.viewports.lock().unwrap().push((page_number, scale));
            Ok(Viewport {
                width: (self.size.0 as f32 * scale).round() as u32,
                height: (self.size.1 as f32 * scale).round() as u32,
            })
        }

        fn render_page(
            &self,
            _document: &DocumentHandle,
            page_number: u16,
            ctx: &mut crate::canvas::Context2d,
            viewport: &Viewport,
        ) -> Result<()> {
            self.rendered.lock().unwrap().push(page_number);
            let img = image::RgbaImage::from_pixel(
                viewport.width,
                viewport.height,
                image::Rgba([0, 0, 0, 255]),
            );
            ctx.draw_image(&img, 0, 0);
            Ok(())
        }
    }

    fn serve_once(html: &'static str) -> String {
        let server = tiny_http::Server::http("0.0.0.0:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let _ = request.respond(tiny_http::Response::from_string(html));
            }
        });
        format!("http://{}", addr)
    }

    fn letter_page_with_data_url() -> &'static str {
        // The href carries the document inline so the library fetch needs no
        // second server round-trip.
        r#"<html><head><title>Letter</title></head><body>
            <a class="pdf-link" href="data:application/pdf;base64,JVBERi0xLjQ=">Letter</a>
            <canvas class="pdf-canvas"></canvas>
        </body></html>"#
    }

    #[test]
    fn test_display_chain_with_stub_backend() {
        let url = serve_once(letter_page_with_data_url());

        let backend = Arc::new(RecordingBackend::with_pages(5));
        let mut viewer =
            PageViewer::with_backend(ViewerConfig::default(), backend.clone()).expect("viewer");

        viewer.load_url(&url).expect("load page");
        viewer.display_document().expect("display");

        // Canvas was sized to the viewport and painted
        let canvas = viewer.canvas().expect("canvas present");
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
        assert!(!canvas.context().is_blank());

        // The document bytes are exactly the href payload
        let opened = backend.opened.lock().unwrap();
        let expected =
            Base64Engine::decode(&base64::engine::general_purpose::STANDARD, "JVBERi0xLjQ=")
                .unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0], expected);

        // Page 1 at scale 1, no matter how many pages the document has
        assert_eq!(*backend.viewports.lock().unwrap(), vec![(1u16, 1.0f32)]);
        assert_eq!(*backend.rendered.lock().unwrap(), vec![1u16]);
    }

    #[test]
    fn test_display_invokes_on_display_with_viewport() {
        let url = serve_once(letter_page_with_data_url());

        let backend = Arc::new(RecordingBackend::with_pages(1));
        let mut viewer =
            PageViewer::with_backend(ViewerConfig::default(), backend).expect("viewer");

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        viewer.on_display(move |viewport| {
            *seen_clone.lock().unwrap() = Some(*viewport);
        });

        viewer.load_url(&url).expect("load page");
        viewer.display_document().expect("display");

        assert_eq!(
            *seen.lock().unwrap(),
            Some(Viewport {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn test_display_requires_a_loaded_page() {
        let backend = Arc::new(RecordingBackend::with_pages(1));
        let mut viewer =
            PageViewer::with_backend(ViewerConfig::default(), backend).expect("viewer");
        assert!(matches!(
            viewer.display_document(),
            Err(Error::LoadError(_))
        ));
    }

    #[test]
    fn test_missing_link_fails_before_backend_is_touched() {
        let url = serve_once(
            r#"<html><body><canvas class="pdf-canvas"></canvas></body></html>"#,
        );

        let backend = Arc::new(RecordingBackend::with_pages(1));
        let mut viewer =
            PageViewer::with_backend(ViewerConfig::default(), backend.clone()).expect("viewer");

        viewer.load_url(&url).expect("load page");
        match viewer.display_document() {
            Err(Error::MissingPdfLink) => {}
            other => panic!("expected MissingPdfLink, got {:?}", other),
        }

        assert!(backend.opened.lock().unwrap().is_empty());
        assert!(viewer.canvas().is_none());
    }

    #[test]
    fn test_snapshot_after_display() {
        let url = serve_once(letter_page_with_data_url());

        let backend = Arc::new(RecordingBackend::with_pages(1));
        let mut viewer =
            PageViewer::with_backend(ViewerConfig::default(), backend).expect("viewer");

        assert!(viewer.snapshot().is_err());

        viewer.load_url(&url).expect("load page");
        viewer.display_document().expect("display");

        let snapshot = viewer.snapshot().expect("snapshot");
        assert_eq!(snapshot.page_url, url);
        assert!(snapshot.document_url.starts_with("data:application/pdf"));
        assert_eq!((snapshot.width, snapshot.height), (640, 480));
    }
}
