// Small numeric and layout helpers.

/// Round to one decimal place, so repeated wheel steps land on exact tenths.
pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Size an image of `natural` dimensions takes when drawn with
/// `object-fit: contain` inside a `bounds` box.
pub fn contained_size(natural: (f64, f64), bounds: (f64, f64)) -> (f64, f64) {
    let (nw, nh) = natural;
    let (bw, bh) = bounds;
    if nw <= 0.0 || nh <= 0.0 {
        return (0.0, 0.0);
    }
    let ratio = nw / nh;
    let mut width = bh * ratio;
    let mut height = bh;
    if width > bw {
        width = bw;
        height = bw / ratio;
    }
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_wheel_steps() {
        assert_eq!(round_tenth(1.0 + 0.4 + 0.4 + 0.4), 2.2);
        assert_eq!(round_tenth(9.8 + 0.4), 10.2);
        assert_eq!(round_tenth(1.4 - 0.4), 1.0);
    }

    #[test]
    fn contain_letterboxes_wide_and_tall_images() {
        assert_eq!(contained_size((1600.0, 800.0), (400.0, 400.0)), (400.0, 200.0));
        assert_eq!(contained_size((600.0, 1200.0), (400.0, 400.0)), (200.0, 400.0));
        assert_eq!(contained_size((0.0, 10.0), (400.0, 400.0)), (0.0, 0.0));
    }
}
