use criterion::{criterion_group, criterion_main, Criterion};

// Benchmarks exercise the non-network viewer paths: hosting-page lookups
// and canvas blits.

fn bench_find_pdf_link(c: &mut Criterion) {
    // A page with some filler around the markers so selector matching does
    // real work
    let mut html = String::from("<html><head><title>Letter</title></head><body>");
    for i in 0..200 {
        html.push_str(&format!("<p class=\"para\">paragraph {}</p>", i));
    }
    html.push_str(r#"<a class="pdf-link" href="/media/letter.pdf">Letter</a>"#);
    html.push_str(r#"<canvas class="pdf-canvas" width="612" height="792"></canvas>"#);
    html.push_str("</body></html>");

    c.bench_function("find_pdf_link", |b| {
        b.iter(|| {
            pdfcanvas::dom::find_pdf_link(&html, "http://letters.example/letter/1/").unwrap();
        })
    });

    c.bench_function("find_pdf_canvas", |b| {
        b.iter(|| {
            pdfcanvas::dom::find_pdf_canvas(&html).unwrap();
        })
    });
}

fn bench_canvas_blit(c: &mut Criterion) {
    let img = image::RgbaImage::from_pixel(612, 792, image::Rgba([0, 0, 0, 255]));

    c.bench_function("canvas_resize_and_blit", |b| {
        b.iter(|| {
            let mut canvas = pdfcanvas::Canvas::new(300, 150);
            canvas.set_height(792);
            canvas.set_width(612);
            canvas.context_2d().draw_image(&img, 0, 0);
            canvas
        })
    });
}

criterion_group!(benches, bench_find_pdf_link, bench_canvas_blit);
criterion_main!(benches);
