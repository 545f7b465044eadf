mod common;

use assert_approx_eq::assert_approx_eq;
use common::synthetic_image::{
    checkerboard, flat, four_color_quadrants, gradient, rectangle, vertical_split,
};

use chromalens_lib::color_space::{hsl_f64_to_rgb, luma, rgb_to_hsl_f64};
use chromalens_lib::{
    analyze_harmony, compare_images, dominant_colors, edge_coherence, entropy_grid, grayscale,
    sobel, threshold, Color, HarmonyTier,
};

#[test]
fn grayscale_is_neutral_and_matches_luma() {
    let source = gradient(97, 61);
    let gray = grayscale(&source);

    for (src, out) in source.pixels().chunks(4).zip(gray.pixels().chunks(4)) {
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
        assert_eq!(out[3], src[3]);
        let expected = luma(src[0], src[1], src[2]);
        assert!((out[0] as f64 - expected).abs() <= 1.0, "{} vs {}", out[0], expected);
    }
}

#[test]
fn threshold_output_is_strictly_binary() {
    let gray = grayscale(&gradient(80, 50));
    for t in [0u8, 1, 64, 128, 200, 255] {
        let binary = threshold(&gray, t);
        for px in binary.pixels().chunks(4) {
            for &channel in &px[..3] {
                assert!(channel == 0 || channel == 255);
            }
        }
    }
}

#[test]
fn sobel_of_uniform_color_is_zero_inside() {
    let edges = sobel(&grayscale(&flat(40, 30, [120, 60, 200])));
    for y in 1..29 {
        for x in 1..39 {
            assert_eq!(edges.luma_at(x, y), 0);
        }
    }
}

#[test]
fn dominant_colors_are_bounded_sorted_and_deterministic() {
    let image = gradient(320, 240);
    for n in [1usize, 3, 7, 20] {
        let first = dominant_colors(&image, n);
        let second = dominant_colors(&image, n);

        assert!(first.len() <= n);
        assert!(first.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert_eq!(first, second);
    }
}

#[test]
fn hsl_round_trip_stays_within_one_step() {
    // Strided sweep over the RGB cube, including both ends of every channel
    let steps: Vec<u8> = (0..=255u16).step_by(5).map(|v| v as u8).chain([255]).collect();
    for &r in &steps {
        for &g in &steps {
            for &b in &steps {
                let (h, s, l) = rgb_to_hsl_f64(r, g, b);
                let back = hsl_f64_to_rgb(h, s, l);
                assert!((back.r as i16 - r as i16).abs() <= 1, "{:?}", (r, g, b));
                assert!((back.g as i16 - g as i16).abs() <= 1, "{:?}", (r, g, b));
                assert!((back.b as i16 - b as i16).abs() <= 1, "{:?}", (r, g, b));
            }
        }
    }
}

#[test]
fn harmony_scores_stay_in_range() {
    let palettes: Vec<Vec<Color>> = vec![
        vec![],
        vec![Color::new(128, 128, 128)],
        vec![Color::new(255, 0, 0), Color::new(0, 255, 255)],
        vec![Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)],
        common::synthetic_image::FOUR_COLORS
            .iter()
            .map(|&[r, g, b]| Color::new(r, g, b))
            .collect(),
    ];

    for palette in palettes {
        let result = analyze_harmony(&palette);
        assert!(result.score <= 100);
    }
}

#[test]
fn single_gray_palette_has_no_saturation_spread() {
    let result = analyze_harmony(&[Color::new(128, 128, 128)]);
    assert_eq!(result.saturation_variance, 0);
    assert_eq!(result.hue_spread, 0);
    // narrow spread 20 + uniform saturation 30 + no complementary pairs 0.
    // A lone gray is often described as weak harmony, but the tier cutoffs put
    // 50 in the moderate band; this asserts the scoring rules, not a bug.
    assert_eq!(result.score, 50);
    assert_eq!(result.tier, HarmonyTier::Moderate);
}

#[test]
fn coherence_of_an_image_with_itself_is_perfect() {
    let image = rectangle(400, 300, 60);
    let result = edge_coherence(&image, &image, &[0.5, 0.3, 0.15]).unwrap();

    assert_eq!(result.per_scale.len(), 3);
    assert!(result.per_scale.iter().all(|s| s.score == 100));
    assert_eq!(result.average, 100);
}

#[test]
fn coherence_without_edges_is_perfect_by_convention() {
    let a = flat(200, 100, [10, 10, 10]);
    let b = flat(150, 150, [240, 240, 240]);
    let result = edge_coherence(&a, &b, &[0.5]).unwrap();
    assert_eq!(result.average, 100);
}

#[test]
fn entropy_of_uniform_image_is_zero() {
    let grid = entropy_grid(&grayscale(&flat(64, 64, [90, 140, 30])), 8).unwrap();
    assert!(grid.cells.iter().flatten().all(|&v| v == 0.0));
    assert_eq!(grid.average, 0.0);
}

#[test]
fn flat_mid_gray_thresholds_at_the_boundary() {
    let gray = grayscale(&flat(100, 100, [128, 128, 128]));

    let white = threshold(&gray, 128);
    assert!(white.pixels().chunks(4).all(|px| px[..3] == [255, 255, 255]));

    let black = threshold(&gray, 129);
    assert!(black.pixels().chunks(4).all(|px| px[..3] == [0, 0, 0]));
}

#[test]
fn black_white_split_survives_notan() {
    let split = vertical_split(100, 40);
    let notan = threshold(&grayscale(&split), 128);
    assert_eq!(notan, split);
}

#[test]
fn identical_four_color_images_have_no_mismatches() {
    let a = four_color_quadrants(240, 160);
    let b = four_color_quadrants(240, 160);
    let map = compare_images(&a, &b, 30).unwrap();

    assert_eq!(map.mismatch_count(), 0);
    assert!(map.cells.iter().all(|c| !c.mismatch));
}

#[test]
fn checkerboard_is_maximally_complex_and_flat_is_not() {
    let board = grayscale(&checkerboard(64, 64, 1));
    let grid = entropy_grid(&board, 8).unwrap();
    assert_eq!((grid.rows, grid.cols), (8, 8));
    for &v in grid.cells.iter().flatten() {
        assert_approx_eq!(v, 127.5 / 128.0, 1e-9);
    }

    let plain = entropy_grid(&grayscale(&flat(64, 64, [255, 255, 255])), 8).unwrap();
    assert!(plain.cells.iter().flatten().all(|&v| v == 0.0));
}
