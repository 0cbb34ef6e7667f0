#![allow(clippy::float_cmp)]

use super::*;
use crate::color::Rgba;

fn segment(from: (f64, f64), to: (f64, f64), color: &str, width: f64) -> Segment {
    Segment {
        from: Point::new(from.0, from.1),
        to: Point::new(to.0, to.1),
        color: color.to_owned(),
        width,
    }
}

#[test]
fn segment_converts_to_and_from_draw_payload() {
    let draw = DrawPayload { last_x: 0.0, last_y: 1.0, x: 100.0, y: 50.0, color: "#000".to_owned(), size: 3.0 };
    let seg = Segment::from_draw(&draw);
    assert_eq!(seg.from, Point::new(0.0, 1.0));
    assert_eq!(seg.to, Point::new(100.0, 50.0));
    assert_eq!(seg.width, 3.0);
    assert_eq!(seg.to_draw(), draw);
}

#[test]
fn apply_segment_paints_in_segment_color() {
    let mut surface = DrawingSurface::new(64, 64);
    surface.apply_segment(&segment((5.0, 5.0), (50.0, 5.0), "#f00", 4.0));
    assert_eq!(surface.raster().pixel(20, 5), Some(Rgba::rgb(255, 0, 0)));
    assert!(!surface.is_blank());
}

#[test]
fn apply_segment_with_bad_color_paints_black() {
    let mut surface = DrawingSurface::new(64, 64);
    surface.apply_segment(&segment((5.0, 5.0), (50.0, 5.0), "not-a-color", 4.0));
    assert_eq!(surface.raster().pixel(20, 5), Some(Rgba::BLACK));
}

#[test]
fn clear_returns_surface_to_blank() {
    let mut surface = DrawingSurface::new(64, 64);
    surface.apply_segment(&segment((0.0, 0.0), (100.0, 50.0), "#000", 3.0));
    surface.clear();
    assert!(surface.is_blank());
    assert_eq!(surface, DrawingSurface::new(64, 64));
}

#[test]
fn closely_sampled_segments_join_without_gaps() {
    let mut surface = DrawingSurface::new(64, 64);
    let points = [(10.0, 10.0), (14.0, 12.0), (18.0, 16.0), (22.0, 22.0)];
    for pair in points.windows(2) {
        surface.apply_segment(&segment(pair[0], pair[1], "#000", 3.0));
    }
    // Every vertex, including the interior joins, is covered.
    for (x, y) in points {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = surface.raster().pixel(x as u32, y as u32);
        assert_eq!(px, Some(Rgba::BLACK), "gap at ({x}, {y})");
    }
}
