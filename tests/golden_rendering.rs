#![cfg(feature = "pdfium")]

//! Golden test for the rendered canvas surface.
//!
//! The golden stores a hex-encoded SHA-256 digest of the canvas pixels.
//! Run with `UPDATE_GOLDENS=1` to (re)create it; the test skips itself when
//! no golden is present or no pdfium library can be bound, since pixel
//! output depends on the pdfium build.

use std::fs;
use std::path::PathBuf;

use pdfcanvas::{PageViewer, ViewerConfig};
use sha2::{Digest, Sha256};

fn golden_path() -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push("letter_canvas.sha256");
    p
}

/// One-page PDF with a filled black rectangle; offsets computed on the fly.
fn minimal_pdf(width: u32, height: u32) -> Vec<u8> {
    let content = "0 0 0 rg\n10 10 120 60 re\nf\n";
    let objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents 4 0 R >>",
            width, height
        ),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
    ];

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_pos = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for off in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_pos
        )
        .as_bytes(),
    );
    out
}

#[test]
fn golden_canvas_digest_matches_fixture() {
    let mut viewer = match PageViewer::new(ViewerConfig::default()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("pdfium unavailable, skipping golden test: {}", e);
            return;
        }
    };

    // Serve the hosting page and the fixture document locally
    let server = tiny_http::Server::http("0.0.0.0:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        let pdf = minimal_pdf(200, 100);
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/" => tiny_http::Response::from_string(
                    r#"<html><body>
                        <a class="pdf-link" href="/letter.pdf">Letter</a>
                        <canvas class="pdf-canvas"></canvas>
                    </body></html>"#,
                ),
                "/letter.pdf" => tiny_http::Response::from_data(pdf.clone()),
                _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    let url = format!("http://{}", addr);
    viewer.load_url(&url).expect("Failed to load page");
    viewer.display_document().expect("Failed to display");

    let canvas = viewer.canvas().expect("canvas after display");
    let digest = hex::encode(Sha256::digest(canvas.context().pixels()));

    let gpath = golden_path();
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all(gpath.parent().unwrap()).ok();
        fs::write(&gpath, &digest).expect("write golden");
        println!("Updated golden: {:?}", gpath);
        return;
    }

    if !gpath.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            gpath
        );
        return;
    }

    let expected = fs::read_to_string(&gpath).expect("unable to read golden");
    assert_eq!(digest, expected.trim(), "canvas digest does not match golden");
}
