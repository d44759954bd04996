use super::*;

fn level(rows: usize, cols: usize) -> PyramidLevel {
    PyramidLevel::new(rows, cols).unwrap()
}

#[test]
fn full_map_roi_splits_evenly() {
    let roi = Roi::new(0, 0.0, 0.0, 4.0, 4.0);
    let grid = level(2, 2);

    assert_eq!(resolve(&roi, grid, 0, 0, 4, 4), rect(0..2, 0..2));
    assert_eq!(resolve(&roi, grid, 0, 1, 4, 4), rect(0..2, 2..4));
    assert_eq!(resolve(&roi, grid, 1, 0, 4, 4), rect(2..4, 0..2));
    assert_eq!(resolve(&roi, grid, 1, 1, 4, 4), rect(2..4, 2..4));
}

#[test]
fn uneven_extent_rounds_start_down_and_end_up() {
    // extent 3 over 2 bins: [0, 1.5) and [1.5, 3) widen to [0, 2) and [1, 3)
    let roi = Roi::new(0, 0.0, 0.0, 3.0, 3.0);
    let grid = level(2, 2);

    let first = resolve(&roi, grid, 0, 0, 8, 8);
    let second = resolve(&roi, grid, 1, 1, 8, 8);
    assert_eq!(first, rect(0..2, 0..2));
    assert_eq!(second, rect(1..3, 1..3));
}

#[test]
fn rows_follow_y_and_cols_follow_x() {
    // wide ROI: 4 columns, 2 rows, offset by one row
    let roi = Roi::new(0, 0.0, 1.0, 4.0, 3.0);
    let bin = resolve(&roi, level(1, 1), 0, 0, 4, 4);
    assert_eq!(bin, rect(1..3, 0..4));
    assert_eq!(bin.area(), 8);
}

#[test]
fn roi_partly_outside_is_clipped() {
    let roi = Roi::new(0, -2.0, -2.0, 6.0, 6.0);

    assert_eq!(resolve(&roi, level(1, 1), 0, 0, 4, 4), rect(0..4, 0..4));
    assert_eq!(resolve(&roi, level(2, 2), 0, 0, 4, 4), rect(0..2, 0..2));
    assert_eq!(resolve(&roi, level(2, 2), 1, 1, 4, 4), rect(2..4, 2..4));
}

#[test]
fn roi_outside_map_gives_empty_bins() {
    let roi = Roi::new(0, 10.0, 10.0, 12.0, 12.0);
    let bin = resolve(&roi, level(2, 2), 0, 0, 4, 4);
    assert!(bin.is_empty());
    assert_eq!(bin.area(), 0);
    assert_eq!(bin.pixels().count(), 0);
}

#[test]
fn degenerate_roi_gives_empty_bins() {
    let flat = Roi::new(0, 1.0, 1.0, 1.0, 3.0);
    let inverted = Roi::new(0, 3.0, 3.0, 1.0, 1.0);

    for roi in [flat, inverted] {
        assert!(roi.is_degenerate());
        for bin_row in 0..2 {
            for bin_col in 0..2 {
                let bin = resolve(&roi, level(2, 2), bin_row, bin_col, 4, 4);
                assert_eq!(bin, BinRectangle::EMPTY);
            }
        }
    }
}

#[test]
fn sub_pixel_roi_is_widened_to_one_pixel() {
    let roi = Roi::new(0, 1.2, 2.1, 1.5, 2.4);
    let bin = resolve(&roi, level(1, 1), 0, 0, 4, 4);
    assert_eq!(bin, rect(2..3, 1..2));
    assert_eq!(bin.area(), 1);
}

#[test]
fn fractional_origin_is_snapped_down() {
    let roi = Roi::new(0, 0.5, 0.5, 4.5, 4.5);
    assert_eq!(resolve(&roi, level(2, 2), 0, 0, 4, 4), rect(0..2, 0..2));
    assert_eq!(resolve(&roi, level(2, 2), 1, 1, 4, 4), rect(2..4, 2..4));
}

#[test]
fn more_bins_than_pixels_still_cover_a_pixel_each() {
    // 2 pixels split into 4 bins: every bin still touches one pixel
    let roi = Roi::new(0, 0.0, 0.0, 2.0, 2.0);
    for bin_col in 0..4 {
        let bin = resolve(&roi, level(1, 4), 0, bin_col, 2, 2);
        assert!(!bin.is_empty());
        assert_eq!(bin.cols().len(), 1);
    }
}

#[test]
fn resolve_is_repeatable() {
    let roi = Roi::new(0, 0.3, 1.7, 3.9, 3.2);
    let first = resolve(&roi, level(3, 2), 2, 1, 4, 4);
    let second = resolve(&roi, level(3, 2), 2, 1, 4, 4);
    assert_eq!(first, second);
}

#[test]
fn pixels_scan_row_major() {
    let pixels: Vec<_> = rect(0..2, 1..3).pixels().collect();
    assert_eq!(pixels, vec![(0, 1), (0, 2), (1, 1), (1, 2)]);
}

#[test]
fn resolve_all_follows_output_bin_order() {
    let levels = PyramidLevels::from_square_sizes(&[1, 2]).unwrap();
    let rois = vec![
        Roi::new(0, 0.0, 0.0, 4.0, 4.0),
        Roi::new(0, 2.0, 2.0, 2.0, 2.0),
    ];

    let bins = resolve_all(&rois, &levels, 4, 4);
    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].len(), 5);
    assert_eq!(bins[0][0], rect(0..4, 0..4));
    assert_eq!(bins[0][2], rect(0..2, 2..4));
    assert_eq!(bins[0][3], rect(2..4, 0..2));
    assert!(bins[1].iter().all(BinRectangle::is_empty));
}

#[test]
fn fractional_right_edge_is_measured_from_snapped_origin() {
    // [0.5, 2.5) snaps to origin 0 with extent 2, so column 2 stays outside
    let roi = Roi::new(0, 0.5, 0.0, 2.5, 1.0);
    let bin = resolve(&roi, level(1, 1), 0, 0, 1, 4);
    assert_eq!(bin, rect(0..1, 0..2));

    let plane = array![[1.0f32, 2.0, 9.0, 0.0]];
    assert_eq!(max_pooling::forward_bin(plane.view(), &bin), 2.0);
}
