use sobel_mapreduce::image::ImageI32;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageI32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = ImageI32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            let val = if sum & 1 == 0 { 32 } else { 220 };
            img.set(x, y, val);
        }
    }
    img
}

/// All zeros except one pixel.
pub fn spike(width: usize, height: usize, x: usize, y: usize, value: i32) -> ImageI32 {
    let mut img = ImageI32::new(width, height);
    img.set(x, y, value);
    img
}

/// Every pixel set to `value`.
pub fn uniform(width: usize, height: usize, value: i32) -> ImageI32 {
    ImageI32::from_vec(width, height, vec![value; width * height]).expect("sized buffer")
}

/// Deterministic pseudo-random texture in [0, 255].
pub fn noise(width: usize, height: usize, seed: u64) -> ImageI32 {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let data = (0..width * height)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % 256) as i32
        })
        .collect();
    ImageI32::from_vec(width, height, data).expect("sized buffer")
}
