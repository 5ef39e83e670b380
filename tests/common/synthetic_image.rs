use std::f64::consts::PI;

/// Generates a high-contrast RGBA checkerboard with a varying alpha ramp.
pub fn checkerboard_rgba(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let on = ((x / cell) + (y / cell)) & 1 == 0;
            let val = if on { 32u8 } else { 220u8 };
            let alpha = (100 + (x * 7 + y * 13) % 156) as u8;
            img.extend_from_slice(&[val, 255 - val, val / 2, alpha]);
        }
    }
    img
}

/// Every pixel set to `px`.
pub fn uniform_rgba(width: usize, height: usize, px: [u8; 4]) -> Vec<u8> {
    px.iter()
        .copied()
        .cycle()
        .take(width * height * 4)
        .collect()
}

/// RGBA image whose colour channels have rank at most two and whose alpha
/// channel is constant. All samples are integers well inside `0..=255`.
pub fn rank_two_rgba(width: usize, height: usize) -> Vec<u8> {
    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let f = 1 + y % 5;
            let g = 10 + x % 7;
            let p = y % 3;
            let q = 3 * (x % 4);
            let red = f * g + p * q;
            let green = (2 + y % 4) * (5 + x % 6);
            let blue = (1 + x % 3) * (20 + y % 9) + (y % 2) * (x % 5);
            img.extend_from_slice(&[red as u8, green as u8, blue as u8, 255]);
        }
    }
    img
}

/// Sum of separable cosine modes with amplitudes 60, 25, 10 and 4 on top of
/// a constant 128 background. The modes are orthogonal on the sample grid,
/// so the colour channels have a well separated singular spectrum.
pub fn cosine_modes_rgba(width: usize, height: usize) -> Vec<u8> {
    const AMPLITUDES: [f64; 4] = [60.0, 25.0, 10.0, 4.0];
    let basis = |k: usize, i: usize, n: usize| (PI * k as f64 * (i as f64 + 0.5) / n as f64).cos();

    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = AMPLITUDES
                .iter()
                .enumerate()
                .fold(128.0, |acc, (i, a)| {
                    acc + a * basis(i + 1, y, height) * basis(i + 1, x, width)
                });
            let v = (value + 0.5) as u8;
            img.extend_from_slice(&[v, v, v, 255]);
        }
    }
    img
}
