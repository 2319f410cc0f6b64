//! Hosting-page lookups for the viewer's DOM contract.
//!
//! The page must carry two marker classes: `pdf-link` on the element whose
//! `href` names the document, and `pdf-canvas` on the render target. When a
//! marker matches more than one element the first in document order wins,
//! the same element `querySelector` would return.

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use scraper::{Html, Selector};

/// Marker class selecting the element that links to the PDF document.
pub const PDF_LINK_SELECTOR: &str = ".pdf-link";

/// Marker class selecting the canvas element the page is rendered into.
pub const PDF_CANVAS_SELECTOR: &str = ".pdf-canvas";

/// Read the document URL from the page's `pdf-link` element.
///
/// The `href` is resolved against `base_url`, which matches reading the
/// element's `href` property in a browser: relative hrefs become absolute,
/// absolute hrefs pass through unchanged.
pub fn find_pdf_link(html: &str, base_url: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse(PDF_LINK_SELECTOR).unwrap();

    let link = document
        .select(&link_sel)
        .next()
        .ok_or(Error::MissingPdfLink)?;

    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| Error::InvalidPdfLink("element has no href attribute".into()))?;

    if href.trim().is_empty() {
        return Err(Error::InvalidPdfLink("href attribute is empty".into()));
    }

    // Resolve relative to base_url when possible
    let resolved = if let Ok(base) = url::Url::parse(base_url) {
        base.join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string())
    } else {
        href.to_string()
    };

    Ok(resolved)
}

/// Locate the page's `pdf-canvas` element and build the render target from
/// its size attributes.
pub fn find_pdf_canvas(html: &str) -> Result<Canvas> {
    let document = Html::parse_document(html);
    let canvas_sel = Selector::parse(PDF_CANVAS_SELECTOR).unwrap();

    let node = document
        .select(&canvas_sel)
        .next()
        .ok_or(Error::MissingPdfCanvas)?;

    Ok(Canvas::from_attributes(
        node.value().attr("width"),
        node.value().attr("height"),
    ))
}
