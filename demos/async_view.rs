//! Async facade example: display a linked PDF from a tokio context.
//!
//! Usage: cargo run --example async_view -- <letter.pdf>

use pdfcanvas::AsyncViewer;

const PAGE_HTML: &str = r#"<html><body>
<a class="pdf-link" href="/letter.pdf">Letter</a>
<canvas class="pdf-canvas"></canvas>
</body></html>"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pdf_path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: cargo run --example async_view -- <letter.pdf>");
            std::process::exit(2);
        }
    };
    let pdf_bytes = std::fs::read(&pdf_path)?;

    let server = tiny_http::Server::http("0.0.0.0:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match request.url() {
                "/" => tiny_http::Response::from_string(PAGE_HTML),
                "/letter.pdf" => tiny_http::Response::from_data(pdf_bytes.clone()),
                _ => tiny_http::Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    let viewer = AsyncViewer::new(None).await?;
    viewer.goto(&format!("http://{}", addr)).await?;
    viewer.display().await?;

    let snapshot = viewer.snapshot().await?;
    println!(
        "displayed {} at {}x{}",
        snapshot.document_url, snapshot.width, snapshot.height
    );

    viewer.screenshot(Some("letter.png")).await?;
    println!("canvas written to letter.png");

    viewer.close().await?;
    Ok(())
}
