mod common;

use common::synthetic_image::{checkerboard_rgba, uniform_rgba};
use tiny_img::filters::{apply_filter, apply_filter_kind, FilterKind, FilterOptions};
use tiny_img::image::RgbaView;
use tiny_img::ImageError;

const FILTERS: [&str; 4] = ["blur", "sharpen", "edge", "emboss"];

#[test]
fn output_length_matches_input_for_every_filter() {
    let _ = env_logger::builder().is_test(true).try_init();
    for (w, h) in [(1usize, 1usize), (3, 3), (7, 5), (1, 9), (64, 3)] {
        let pixels = checkerboard_rgba(w, h, 2);
        for name in FILTERS {
            let out = apply_filter(&pixels, w, h, name).unwrap();
            assert_eq!(out.len(), w * h * 4, "{name} on {w}x{h}");
        }
    }
}

#[test]
fn unknown_filter_returns_identical_bytes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let pixels = checkerboard_rgba(9, 6, 3);
    for name in ["unknown", "", "BLUR", "gaussian"] {
        let out = apply_filter(&pixels, 9, 6, name).unwrap();
        assert_eq!(out, pixels, "filter name {name:?}");
    }
}

#[test]
fn alpha_channel_is_never_modified() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (11usize, 8usize);
    let pixels = checkerboard_rgba(w, h, 3);
    for name in FILTERS {
        let out = apply_filter(&pixels, w, h, name).unwrap();
        let alpha_in = pixels.iter().skip(3).step_by(4);
        let alpha_out = out.iter().skip(3).step_by(4);
        assert!(alpha_in.eq(alpha_out), "{name} changed alpha");
    }
}

#[test]
fn uniform_gray_survives_blur_and_sharpen() {
    let _ = env_logger::builder().is_test(true).try_init();
    let pixels = uniform_rgba(4, 4, [128, 128, 128, 255]);
    assert_eq!(apply_filter(&pixels, 4, 4, "blur").unwrap(), pixels);
    assert_eq!(apply_filter(&pixels, 4, 4, "sharpen").unwrap(), pixels);

    let edges = apply_filter(&pixels, 4, 4, "edge").unwrap();
    assert_eq!(edges, uniform_rgba(4, 4, [0, 0, 0, 255]));
}

#[test]
fn single_pixel_clamps_every_neighbour_to_itself() {
    let _ = env_logger::builder().is_test(true).try_init();
    let px = [90u8, 45, 200, 17];
    assert_eq!(apply_filter(&px, 1, 1, "blur").unwrap(), px);
    assert_eq!(apply_filter(&px, 1, 1, "sharpen").unwrap(), px);
    // Emboss weights sum to one as well.
    assert_eq!(apply_filter(&px, 1, 1, "emboss").unwrap(), px);
}

#[test]
fn blur_on_3x3_uses_replicated_border() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Only the top-left pixel is bright. Corner (0,0) sees it four times
    // through clamping: 4 * 90 / 9 = 40. Centre sees it once: 10.
    let mut pixels = uniform_rgba(3, 3, [0, 0, 0, 255]);
    pixels[0] = 90;
    let out = apply_filter(&pixels, 3, 3, "blur").unwrap();
    assert_eq!(out[0], 40);
    assert_eq!(out[4 * 4], 10);
    // (2,2) is out of reach of (0,0).
    assert_eq!(out[8 * 4], 0);
}

#[test]
fn chunk_height_does_not_change_output() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (23usize, 130usize);
    let pixels = checkerboard_rgba(w, h, 5);
    let view = RgbaView::new(&pixels, w, h).unwrap();
    for kind in [FilterKind::Blur, FilterKind::Sharpen, FilterKind::Edge, FilterKind::Emboss] {
        let reference = apply_filter_kind(view, kind, &FilterOptions::default()).unwrap();
        for chunk_rows in [1, 3, 64, 129, 130, 1000] {
            let opts = FilterOptions::default().with_chunk_rows(chunk_rows);
            let out = apply_filter_kind(view, kind, &opts).unwrap();
            assert_eq!(out, reference, "{kind:?} with chunk_rows={chunk_rows}");
        }
    }
}

#[test]
fn wrong_buffer_length_is_rejected() {
    let _ = env_logger::builder().is_test(true).try_init();
    let pixels = vec![0u8; 4 * 4 * 4 - 1];
    let err = apply_filter(&pixels, 4, 4, "blur").unwrap_err();
    assert_eq!(
        err,
        ImageError::ShapeMismatch {
            width: 4,
            height: 4,
            expected: 64,
            actual: 63
        }
    );
}
