//! Serve a local PDF behind a letter-style page and display its first page.
//!
//! Usage: cargo run --example view_letter -- <letter.pdf> [out.png]

use std::fs;

use pdfcanvas::ViewerConfig;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Letter</title></head>
<body>
<a class="pdf-link" href="/letter.pdf">Download letter</a>
<canvas class="pdf-canvas"></canvas>
</body>
</html>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let pdf_path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("usage: cargo run --example view_letter -- <letter.pdf> [out.png]");
            std::process::exit(2);
        }
    };
    let out_path = args.next().unwrap_or_else(|| "letter.png".to_string());

    let pdf_bytes = fs::read(&pdf_path)?;

    // Serve the hosting page and the document on a loopback port
    let server = tiny_http::Server::http("0.0.0.0:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/" => tiny_http::Response::from_string(PAGE_HTML).with_header(
                    "Content-Type: text/html; charset=utf-8"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                "/letter.pdf" => tiny_http::Response::from_data(pdf_bytes.clone()).with_header(
                    "Content-Type: application/pdf"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    let mut viewer = pdfcanvas::new_viewer(ViewerConfig::default())?;
    viewer.load_url(&format!("http://{}", addr))?;
    viewer.display_document()?;

    let canvas = viewer.canvas().expect("document displayed");
    println!(
        "first page of {} rendered at {}x{}",
        pdf_path,
        canvas.width(),
        canvas.height()
    );

    fs::write(&out_path, viewer.render_png()?)?;
    println!("canvas written to {}", out_path);

    viewer.close()?;
    Ok(())
}
