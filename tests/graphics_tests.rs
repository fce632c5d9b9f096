use std::f64::consts::PI;

use pathtess::graphics::defaults;
use pathtess::{
    BlendMode, DrawMode, Graphics, LineCap, LineJoin, Matrix, Polygon, RecordingTarget, Shape, TessellationSettings,
    pt,
};

const EPSILON: f64 = 1e-4;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "value mismatch: {actual} != {expected}"
    );
}

fn polygon_points(shape: &Shape) -> Vec<f64> {
    match shape {
        Shape::Polygon(Polygon { points, .. }) => points.iter().flat_map(|p| [p.x, p.y]).collect(),
        other => panic!("expected a polygon, got {other:?}"),
    }
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults() {
    let g = Graphics::new();
    assert_eq!(g.current_fill_style().color, 0xFFFFFF);
    assert_eq!(g.current_fill_style().alpha, 1.0);
    assert_eq!(g.current_line_style().width, 0.0);
    assert_eq!(g.current_line_style().color, 0);
    assert_eq!(g.current_line_style().join, LineJoin::Miter);
    assert_eq!(g.tint(), 0xFFFFFF);
    assert_eq!(g.blend_mode(), BlendMode::Normal);
    assert!(g.current_path().is_none());
}

// =============================================================================
// Bounds
// =============================================================================

#[test]
fn bounds_north() {
    let mut g = Graphics::new();
    g.line_style(1.0, 0, 1.0).move_to(0.0, 0.0).line_to(0.0, 10.0);
    assert_close(g.width(), 1.0);
    assert_close(g.height(), 10.0);
}

#[test]
fn bounds_south() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).line_style(1.0, 0, 1.0).line_to(0.0, -10.0);
    assert_close(g.width(), 1.0);
    assert_close(g.height(), 10.0);
}

#[test]
fn bounds_east() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).line_style(1.0, 0, 1.0).line_to(10.0, 0.0);
    assert_close(g.height(), 1.0);
    assert_close(g.width(), 10.0);
}

#[test]
fn bounds_west() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).line_style(1.0, 0, 1.0).line_to(-10.0, 0.0);
    assert_close(g.height(), 1.0);
    assert_close(g.width(), 10.0);
}

#[test]
fn bounds_stacked_with_circle() {
    let mut g = Graphics::new();
    g.begin_fill(0xFF0000, 1.0).draw_circle(50.0, 50.0, 50.0).end_fill();
    assert_close(g.width(), 100.0);
    assert_close(g.height(), 100.0);

    g.line_style(20.0, 0, 1.0).move_to(25.0, 50.0).line_to(75.0, 50.0);
    assert_close(g.width(), 100.0);
    assert_close(g.height(), 100.0);
}

#[test]
fn bounds_closed_square() {
    let mut g = Graphics::new();
    g.line_style(20.0, 0, 0.5)
        .move_to(0.0, 0.0)
        .line_to(50.0, 0.0)
        .line_to(50.0, 50.0)
        .line_to(0.0, 50.0)
        .line_to(0.0, 0.0);
    assert_close(g.width(), 70.0);
    assert_close(g.height(), 70.0);
}

#[test]
fn world_bounds_follow_transform() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0).draw_rect(0.0, 0.0, 10.0, 20.0);
    g.set_transform(Matrix::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0));
    let bounds = g.bounds();
    assert_close(bounds.min.x, 5.0);
    assert_close(bounds.max.y, 45.0);
    assert_close(g.width(), 20.0);
    assert_close(g.height(), 40.0);
}

#[test]
fn local_bounds_are_scanned_once() {
    let mut g = Graphics::new();
    g.local_bounds();
    assert_eq!(g.graphics_geometry().bounds_scan_count(), 1);
    g.local_bounds();
    assert_eq!(g.graphics_geometry().bounds_scan_count(), 1);

    g.begin_fill(0, 1.0).draw_rect(0.0, 0.0, 1.0, 1.0);
    g.local_bounds();
    g.local_bounds();
    assert_eq!(g.graphics_geometry().bounds_scan_count(), 2);
}

// =============================================================================
// Path building
// =============================================================================

#[test]
fn duplicate_line_to_is_ignored() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).line_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 0.0);
    assert_eq!(g.current_path(), Some(&[pt(0.0, 0.0), pt(10.0, 0.0)][..]));
}

#[test]
fn move_to_splits_into_two_datums() {
    let mut g = Graphics::new();
    g.begin_fill(0xFFFFFF, 1.0)
        .move_to(50.0, 50.0)
        .line_to(250.0, 50.0)
        .line_to(100.0, 100.0)
        .line_to(50.0, 50.0)
        .move_to(250.0, 50.0)
        .line_to(450.0, 50.0)
        .line_to(300.0, 100.0)
        .line_to(250.0, 50.0)
        .end_fill();

    let data = g.graphics_data();
    assert_eq!(data.len(), 2);
    assert_eq!(
        polygon_points(&data[0].shape),
        vec![50.0, 50.0, 250.0, 50.0, 100.0, 100.0, 50.0, 50.0]
    );
    assert_eq!(
        polygon_points(&data[1].shape),
        vec![250.0, 50.0, 450.0, 50.0, 300.0, 100.0, 250.0, 50.0]
    );
}

#[test]
fn line_style_break_splits_path() {
    let mut g = Graphics::new();
    g.line_style(1.0, 0xFFFFFF, 1.0)
        .move_to(50.0, 50.0)
        .line_to(250.0, 50.0)
        .line_style(2.0, 0xFFFFFF, 1.0)
        .line_to(100.0, 100.0)
        .line_to(50.0, 50.0)
        .line_style(0.0, 0, 1.0);

    let data = g.graphics_data();
    assert_eq!(data.len(), 2);
    assert_eq!(polygon_points(&data[0].shape), vec![50.0, 50.0, 250.0, 50.0]);
    assert_eq!(
        polygon_points(&data[1].shape),
        vec![250.0, 50.0, 100.0, 100.0, 50.0, 50.0]
    );
    assert_eq!(data[0].line.width, 1.0);
    assert_eq!(data[1].line.width, 2.0);
}

#[test]
fn circle_outline_has_no_gap() {
    let mut g = Graphics::new();
    g.line_style(15.0, 0x8FC7E6, 1.0).draw_circle(100.0, 100.0, 30.0);
    g.update_geometry();
    let points = &g.graphics_data()[0].points;
    assert_eq!(points.first(), points.last());
}

#[test]
fn polygon_outline_is_closed() {
    let mut g = Graphics::new();
    g.line_style(1.0, 0, 1.0).draw_polygon(&[0.0, 0.0, 10.0, 0.0, 5.0, 8.0]);
    let points = &g.graphics_data()[0].points;
    assert_eq!(points.len(), 4);
    assert_eq!(points.first(), points.last());
}

#[test]
fn chaining_ends_in_empty_state() {
    let mut g = Graphics::new();
    g.begin_fill(0xFF3300, 1.0)
        .line_style(4.0, 0xFFD900, 1.0)
        .move_to(50.0, 50.0)
        .line_to(250.0, 50.0)
        .end_fill()
        .draw_rounded_rect(150.0, 450.0, 300.0, 100.0, 15.0)
        .begin_hole()
        .end_hole()
        .quadratic_curve_to(1.0, 1.0, 1.0, 1.0)
        .bezier_curve_to(1.0, 1.0, 1.0, 1.0, 1.0, 1.0)
        .arc_to(1.0, 1.0, 1.0, 1.0, 1.0)
        .arc(1.0, 1.0, 1.0, 1.0, 1.0, false)
        .draw_rect(1.0, 1.0, 1.0, 1.0)
        .draw_rounded_rect(1.0, 1.0, 1.0, 1.0, 0.1)
        .draw_circle(1.0, 1.0, 20.0)
        .draw_ellipse(1.0, 1.0, 1.0, 1.0)
        .draw_polygon(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0])
        .draw_star(1.0, 1.0, 1, 1.0, 1.0, 1.0);

    // everything drawn above tessellates without panicking
    g.update_geometry();
    assert!(g.graphics_data().len() > 5);

    let dirty = g.dirty();
    g.clear();
    assert!(g.dirty() > dirty);
    assert!(g.graphics_data().is_empty());
    assert!(g.current_path().is_none());
    assert!(!g.is_hole_mode());
    assert!(g.geometry().is_empty());
    assert!(g.local_bounds().is_empty());
}

#[test]
fn empty_shapes_are_discarded() {
    let mut g = Graphics::new();
    let dirty = g.dirty();
    g.begin_fill(0xFF0000, 1.0)
        .draw_circle(5.0, 5.0, 0.0)
        .draw_ellipse(0.0, 0.0, 3.0, 0.0)
        .draw_polygon(&[]);
    assert!(g.graphics_data().is_empty());
    assert_eq!(g.dirty(), dirty);
    assert!(g.geometry().is_empty());
}

#[test]
fn empty_hole_is_discarded() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0)
        .draw_rect(0.0, 0.0, 10.0, 10.0)
        .begin_hole()
        .draw_circle(5.0, 5.0, 0.0)
        .end_hole();
    assert_eq!(g.graphics_data().len(), 1);
    assert!(g.graphics_data()[0].holes.is_empty());
    assert!(g.contains_point(pt(5.0, 5.0)));
}

#[test]
fn line_to_after_clear_starts_at_origin() {
    let mut g = Graphics::new();
    g.move_to(5.0, 5.0).line_to(6.0, 6.0).clear().line_to(3.0, 0.0);
    assert_eq!(g.current_path(), Some(&[pt(0.0, 0.0), pt(3.0, 0.0)][..]));
}

// =============================================================================
// Arcs and curves
// =============================================================================

#[test]
fn arc_opens_a_path() {
    let mut g = Graphics::new();
    assert!(g.current_path().is_none());
    g.arc(100.0, 30.0, 20.0, 0.0, PI, false);
    let path = g.current_path().expect("arc should open a path");
    assert!((path[0] - pt(120.0, 30.0)).length() < EPSILON);
    assert!((*path.last().unwrap() - pt(80.0, 30.0)).length() < EPSILON);
}

#[test]
fn arc_with_other_shapes() {
    let mut g = Graphics::new();
    g.begin_fill(0xFF3300, 1.0)
        .line_style(4.0, 0xFFD900, 1.0)
        .move_to(50.0, 50.0)
        .line_to(250.0, 50.0)
        .line_to(100.0, 100.0)
        .line_to(50.0, 50.0)
        .end_fill()
        .line_style(2.0, 0xFF00FF, 1.0)
        .begin_fill(0xFF00BB, 0.25)
        .draw_rounded_rect(150.0, 450.0, 300.0, 100.0, 15.0)
        .end_fill()
        .begin_fill(0, 1.0)
        .line_style(4.0, 0x00FF00, 1.0)
        .arc(300.0, 100.0, 20.0, 0.0, PI, false);
    assert!(g.current_path().is_some());
    assert!(!g.geometry().is_empty());
}

#[test]
fn arc_with_equal_angles_does_nothing() {
    let mut g = Graphics::new();
    g.arc(0.0, 0.0, 10.0, 0.0, 0.0, false);
    assert!(g.current_path().is_none());
}

#[test]
fn arc_with_zero_sweep_does_nothing() {
    let mut g = Graphics::new();
    g.arc(0.0, 0.0, 10.0, 10.0, 10.0, false);
    assert!(g.current_path().is_none());
}

#[test]
fn arc_to_rounds_a_corner() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).arc_to(10.0, 0.0, 10.0, 10.0, 4.0);
    let path = g.current_path().unwrap();
    assert_eq!(path[0], pt(0.0, 0.0));
    assert!((path[1] - pt(6.0, 0.0)).length() < EPSILON);
    assert!((*path.last().unwrap() - pt(10.0, 4.0)).length() < EPSILON);
}

#[test]
fn bezier_ends_on_target() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).bezier_curve_to(0.0, 50.0, 100.0, 50.0, 100.0, 0.0);
    let path = g.current_path().unwrap();
    assert!(path.len() > 4);
    assert_eq!(*path.last().unwrap(), pt(100.0, 0.0));
}

#[test]
fn fixed_arc_segments() {
    let settings = TessellationSettings {
        curves: pathtess::CurveSettings {
            adaptive: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut g = Graphics::with_settings(settings);
    g.arc(0.0, 0.0, 100.0, 0.0, PI, false);
    // start point plus one full turn's worth of segments
    assert_eq!(
        g.current_path().map(<[_]>::len),
        Some(defaults::ARC_FIXED_SEGMENTS + 1)
    );
}

// =============================================================================
// Hit testing
// =============================================================================

#[test]
fn contains_point_inside() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0).draw_rect(0.0, 0.0, 10.0, 10.0);
    assert!(g.contains_point(pt(1.0, 1.0)));
}

#[test]
fn contains_point_outside() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0).draw_rect(0.0, 0.0, 10.0, 10.0);
    assert!(!g.contains_point(pt(20.0, 20.0)));
}

#[test]
fn contains_point_without_fill() {
    let mut g = Graphics::new();
    g.line_style(4.0, 0, 1.0).draw_rect(0.0, 0.0, 10.0, 10.0);
    assert!(!g.contains_point(pt(1.0, 1.0)));
}

#[test]
fn contains_point_with_hole() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0)
        .move_to(0.0, 0.0)
        .line_to(10.0, 0.0)
        .line_to(10.0, 10.0)
        .line_to(0.0, 10.0)
        .begin_hole()
        .move_to(2.0, 2.0)
        .line_to(8.0, 2.0)
        .line_to(8.0, 8.0)
        .line_to(2.0, 8.0)
        .end_hole();

    assert!(g.contains_point(pt(1.0, 1.0)));
    assert!(!g.contains_point(pt(5.0, 5.0)));
    assert_eq!(g.graphics_data().len(), 1);
    assert_eq!(g.graphics_data()[0].holes.len(), 1);
}

#[test]
fn contains_point_through_transform() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0).draw_circle(0.0, 0.0, 10.0);
    g.set_transform(Matrix::translation(100.0, 0.0));
    assert!(g.contains_point(pt(105.0, 0.0)));
    assert!(!g.contains_point(pt(5.0, 0.0)));

    g.set_transform(Matrix::scale(0.0, 1.0));
    assert!(!g.contains_point(pt(0.0, 0.0)));
}

#[test]
fn hole_is_cut_from_fill_triangles() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0)
        .draw_rect(0.0, 0.0, 10.0, 10.0)
        .begin_hole()
        .draw_rect(2.0, 2.0, 6.0, 6.0)
        .end_hole();
    let built = g.geometry();
    assert_eq!(built.vertex_count(), 8);
    let area: f64 = built
        .indices
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| built.vertex(i as usize).unwrap());
            ((b - a).perp_dot(c - a) / 2.0).abs()
        })
        .sum();
    assert_close(area, 64.0);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn small_graphics_are_batched_in_world_space() {
    let mut g = Graphics::new();
    g.begin_fill(0xFF0000, 1.0).draw_rect(0.0, 0.0, 10.0, 10.0);
    g.set_transform(Matrix::translation(100.0, 0.0)).set_tint(0x00FF00);

    let mut target = RecordingTarget::new();
    g.render(&mut target).unwrap();
    assert_eq!(target.calls.len(), 1);
    let call = &target.calls[0];
    assert!(call.is_batched());
    assert_eq!(call.mode, DrawMode::Triangles);
    assert_eq!(call.indices.len(), 6);
    assert_eq!(call.tint, 0x00FF00);
    assert_eq!(&call.vertices[..2], &[100.0, 0.0]);
}

#[test]
fn native_lines_are_drawn_directly() {
    let mut g = Graphics::new();
    g.set_line_style(pathtess::LineStyle {
        width: 1.0,
        native: true,
        ..Default::default()
    })
    .move_to(0.0, 0.0)
    .line_to(10.0, 0.0);

    let mut target = RecordingTarget::new();
    g.render(&mut target).unwrap();
    assert_eq!(target.direct().count(), 1);
    assert_eq!(target.calls[0].mode, DrawMode::Lines);
    assert_eq!(target.calls[0].transform, Some(Matrix::IDENTITY));
}

#[test]
fn batch_threshold_is_exclusive() {
    fn ring(n: usize) -> Vec<f64> {
        (0..n)
            .flat_map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                [100.0 * angle.cos(), 100.0 * angle.sin()]
            })
            .collect()
    }

    let mut below = Graphics::new();
    below.begin_fill(0, 1.0).draw_polygon(&ring(defaults::BATCHABLE_SIZE - 1));
    assert_eq!(below.geometry().vertex_count(), defaults::BATCHABLE_SIZE - 1);
    assert!(below.is_batchable());

    let mut at = Graphics::new();
    at.begin_fill(0, 1.0).draw_polygon(&ring(defaults::BATCHABLE_SIZE));
    assert_eq!(at.geometry().vertex_count(), defaults::BATCHABLE_SIZE);
    assert!(!at.is_batchable());
}

#[test]
fn large_graphics_are_drawn_directly() {
    let mut g = Graphics::new();
    g.line_style(2.0, 0, 1.0).draw_circle(0.0, 0.0, 200.0);
    assert!(g.geometry().vertex_count() > defaults::BATCHABLE_SIZE);

    let mut target = RecordingTarget::new();
    g.render(&mut target).unwrap();
    assert!(target.calls.iter().all(|c| !c.is_batched()));
}

#[test]
fn empty_graphics_render_nothing() {
    let mut g = Graphics::new();
    let mut target = RecordingTarget::new();
    g.render(&mut target).unwrap();
    assert!(target.calls.is_empty());
}

#[test]
fn miter_vertex_dump() {
    let mut g = Graphics::new();
    g.line_style(2.0, 0, 1.0)
        .move_to(0.0, 0.0)
        .line_to(50.0, 0.0)
        .line_to(50.0, 50.0);
    let built = g.geometry();
    let dump: Vec<String> = built
        .points
        .chunks_exact(2)
        .map(|v| format!("{:.2} {:.2}", v[0] + 0.0, v[1] + 0.0))
        .collect();
    insta::assert_snapshot!(dump.join("\n"), @r"
    0.00 1.00
    0.00 -1.00
    49.00 1.00
    51.00 -1.00
    49.00 50.00
    51.00 50.00
    ");
}

#[test]
fn open_path_is_emitted_on_update() {
    let mut g = Graphics::new();
    g.line_style(1.0, 0, 1.0).move_to(0.0, 0.0).line_to(5.0, 0.0);
    assert!(matches!(g.current_path(), Some(p) if p.len() == 2));
    g.update_geometry();
    assert!(g.current_path().is_none());
    assert_eq!(g.graphics_data().len(), 1);
    // the cursor survives so drawing continues where it stopped
    g.line_to(5.0, 5.0);
    assert_eq!(g.current_path(), Some(&[pt(5.0, 0.0), pt(5.0, 5.0)][..]));
}

// =============================================================================
// Non-finite input
// =============================================================================

fn draw_with(bad: f64) -> Graphics {
    let mut g = Graphics::new();
    g.begin_fill(0xFF0000, 1.0)
        .line_style(2.0, 0, 1.0)
        .set_line_join(LineJoin::Round)
        .set_line_cap(LineCap::Round)
        .move_to(0.0, 0.0)
        .arc(0.0, 0.0, 10.0, bad, 0.0, false)
        .arc(bad, 0.0, 10.0, 0.0, PI, false)
        .arc(0.0, 0.0, bad, 0.0, PI, true)
        .arc_to(bad, 0.0, 10.0, 10.0, 5.0)
        .arc_to(10.0, 0.0, 10.0, 10.0, bad)
        .quadratic_curve_to(bad, bad, 10.0, 10.0)
        .bezier_curve_to(0.0, bad, 10.0, 10.0, bad, 0.0)
        .line_to(bad, 5.0)
        .draw_rect(bad, 0.0, 10.0, 10.0)
        .draw_rounded_rect(0.0, 0.0, bad, 10.0, 2.0)
        .draw_circle(0.0, 0.0, bad)
        .draw_ellipse(0.0, 0.0, bad, 5.0)
        .draw_polygon(&[0.0, 0.0, bad, 0.0, 5.0, 5.0])
        .draw_star(0.0, 0.0, 5, bad, 0.0, 0.0)
        .begin_hole()
        .draw_circle(1.0, 1.0, bad)
        .end_hole();
    g
}

#[test]
fn non_finite_input_never_panics() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut g = draw_with(bad);
        g.update_geometry();
        assert!(!g.graphics_data().is_empty());
        let built = g.geometry();
        let count = built.vertex_count();
        assert!(built.indices.iter().all(|&i| (i as usize) < count));
        let _ = g.bounds();
        let _ = g.width();
        let _ = g.contains_point(pt(1.0, 1.0));
        let _ = g.contains_point(pt(bad, bad));

        let mut target = RecordingTarget::new();
        assert!(g.render(&mut target).is_ok());
    }
}

#[test]
fn infinite_arc_sweep_is_bounded() {
    let mut g = Graphics::new();
    g.move_to(0.0, 0.0).arc(0.0, 0.0, 10.0, f64::INFINITY, 0.0, false);
    let points = g.current_path().map_or(0, <[_]>::len);
    assert!(points <= defaults::ARC_MAX_SEGMENTS + 2, "{points} points");
}

#[test]
fn infinite_circle_outline_is_bounded() {
    let mut g = Graphics::new();
    g.begin_fill(0, 1.0).draw_circle(0.0, 0.0, f64::INFINITY);
    assert_eq!(g.graphics_data()[0].points.len(), defaults::ARC_MAX_SEGMENTS + 1);
    // non-finite rings are not triangulated
    assert!(g.geometry().is_empty());
}
