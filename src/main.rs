use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use pdfcanvas::ViewerConfig;

/// Render the first page of the PDF linked from a web page.
///
/// The page must mark the link with the `pdf-link` class and the render
/// target with the `pdf-canvas` class.
#[derive(Parser, Debug)]
#[command(name = "pdfcanvas", version, about)]
struct Args {
    /// URL of the hosting page carrying the pdf-link and pdf-canvas markers
    page_url: String,

    /// Write the rendered canvas to this PNG file
    #[arg(short, long, default_value = "canvas.png")]
    output: PathBuf,

    /// Print a JSON snapshot of the display to stdout
    #[arg(long)]
    json: bool,

    /// Explicit path to the pdfium library
    #[arg(long)]
    pdfium: Option<PathBuf>,

    /// Timeout for page and document loads, in milliseconds
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ViewerConfig {
        timeout_ms: args.timeout_ms,
        pdfium_library_path: args.pdfium,
        ..Default::default()
    };

    let mut viewer = pdfcanvas::new_viewer(config)?;
    viewer
        .load_url(&args.page_url)
        .with_context(|| format!("loading {}", args.page_url))?;
    viewer.display_document().context("displaying document")?;

    if args.json {
        let snapshot = viewer.snapshot()?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    let png = viewer.render_png()?;
    std::fs::write(&args.output, &png)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!("Rendered first page to {}", args.output.display());

    Ok(())
}
