use tiny_img::{apply_filter, ChannelCompressor, QualityReport, RgbaView};

fn main() {
    // Demo stub: filters and compresses a synthetic gradient
    let w = 160usize;
    let h = 120usize;
    let mut pixels = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        for x in 0..w {
            pixels.extend_from_slice(&[
                (x * 255 / (w - 1)) as u8,
                (y * 255 / (h - 1)) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
        }
    }

    for name in ["blur", "sharpen", "edge", "emboss"] {
        match apply_filter(&pixels, w, h, name) {
            Ok(out) => {
                let q = QualityReport::compare(&pixels, &out).unwrap_or_default();
                println!("filter={name} mean_abs_diff={:.3}", q.mean_abs_diff);
            }
            Err(err) => eprintln!("filter={name} failed: {err}"),
        }
    }

    let view = match RgbaView::new(&pixels, w, h) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("invalid demo image: {err}");
            return;
        }
    };
    for rank in [1, 4, 16] {
        match ChannelCompressor::default().compress(view, rank) {
            Ok(report) => {
                let q = QualityReport::compare(&pixels, &report.image.data).unwrap_or_default();
                println!(
                    "rank={rank} psnr_db={:?} latency_ms={:.3}",
                    q.psnr_db, report.timing.total_ms
                );
            }
            Err(err) => eprintln!("rank={rank} failed: {err}"),
        }
    }
}
