//! PDF backend built on pdfium.
//!
//! PDFium itself is not thread-safe and its handles cannot be shared across
//! threads, so the backend stores only the resolved library location and
//! binds the library inside each operation. Construction performs a probe
//! bind so a missing pdfium library fails fast, at viewer creation.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;

use crate::canvas::Context2d;
use crate::error::{Error, Result};
use crate::pdf::{DocumentHandle, PdfBackend};
use crate::Viewport;

pub struct PdfiumBackend {
    library_path: Option<PathBuf>,
}

impl PdfiumBackend {
    /// Bind to the pdfium library at `library_path`, or search the process
    /// directory and the system library when none is given.
    pub fn new(library_path: Option<&Path>) -> Result<Self> {
        let backend = Self {
            library_path: library_path.map(|p| p.to_path_buf()),
        };
        // Probe bind: surface a missing library here instead of mid-display.
        backend.bind()?;
        Ok(backend)
    }

    fn bind(&self) -> Result<Pdfium> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(path).map_err(|e| {
                Error::InitializationError(format!(
                    "Failed to load pdfium from {}: {:?}",
                    path.display(),
                    e
                ))
            })?,
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| {
                    Error::InitializationError(format!("Failed to load pdfium: {:?}", e))
                })?,
        };
        Ok(Pdfium::new(bindings))
    }
}

/// Translate a 1-based page number to pdfium's 0-based index.
fn page_index(page_number: u16) -> Result<u16> {
    page_number.checked_sub(1).ok_or_else(|| {
        Error::PageError("page 0 is out of range (pages are numbered from 1)".into())
    })
}

impl PdfBackend for PdfiumBackend {
    fn open_document(&self, bytes: Vec<u8>) -> Result<DocumentHandle> {
        let pdfium = self.bind()?;
        let pages = {
            let document = pdfium
                .load_pdf_from_byte_slice(&bytes, None)
                .map_err(|e| Error::DocumentError(format!("Failed to parse PDF: {:?}", e)))?;
            document.pages().len()
        };
        Ok(DocumentHandle::new(bytes, pages))
    }

    fn page_viewport(
        &self,
        document: &DocumentHandle,
        page_number: u16,
        scale: f32,
    ) -> Result<Viewport> {
        let index = page_index(page_number)?;
        let pdfium = self.bind()?;
        let doc = pdfium
            .load_pdf_from_byte_slice(document.bytes(), None)
            .map_err(|e| Error::DocumentError(format!("Failed to parse PDF: {:?}", e)))?;
        let page = doc
            .pages()
            .get(index)
            .map_err(|e| Error::PageError(format!("page {}: {:?}", page_number, e)))?;

        // Page dimensions are PDF points; at scale 1 one point maps to one
        // canvas pixel.
        Ok(Viewport {
            width: (page.width().value * scale).round() as u32,
            height: (page.height().value * scale).round() as u32,
        })
    }

    fn render_page(
        &self,
        document: &DocumentHandle,
        page_number: u16,
        ctx: &mut Context2d,
        viewport: &Viewport,
    ) -> Result<()> {
        let index = page_index(page_number)?;
        let pdfium = self.bind()?;
        let doc = pdfium
            .load_pdf_from_byte_slice(document.bytes(), None)
            .map_err(|e| Error::DocumentError(format!("Failed to parse PDF: {:?}", e)))?;
        let page = doc
            .pages()
            .get(index)
            .map_err(|e| Error::PageError(format!("page {}: {:?}", page_number, e)))?;

        let render_config = PdfRenderConfig::new().set_target_width(viewport.width as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| Error::RenderError(format!("pdfium render failed: {:?}", e)))?;

        // Rebuild the bitmap through raw RGBA bytes so the blit is not tied
        // to the image types re-exported by the pdfium bindings.
        let rendered = bitmap.as_image().to_rgba8();
        let (width, height) = (rendered.width(), rendered.height());
        let img = image::RgbaImage::from_raw(width, height, rendered.into_raw())
            .ok_or_else(|| Error::RenderError("pdfium bitmap has unexpected size".into()))?;

        ctx.draw_image(&img, 0, 0);
        Ok(())
    }
}
