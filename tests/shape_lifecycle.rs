use egui::{pos2, vec2, Pos2, Rect};
use vector_sketch::geometry::Geometry;
use vector_sketch::path::Sweep;
use vector_sketch::shape::{self, AnyShape, Phase, Shape, ShapeKind};
use vector_sketch::{Canvas, DrawingSurface, EventFlow, PointerEvent, StyleSettings};

/// Sizes a freshly created shape by moving the pointer and releasing at `to`.
fn size_to(canvas: &mut Canvas, to: Pos2) {
    canvas.dispatch(PointerEvent::moved(to));
    canvas.dispatch(PointerEvent::up(to));
}

/// Presses at `from`, moves to `to` and releases there.
fn drag(canvas: &mut Canvas, from: Pos2, to: Pos2) {
    canvas.dispatch(PointerEvent::down(from));
    canvas.dispatch(PointerEvent::moved(to));
    canvas.dispatch(PointerEvent::up(to));
}

fn create(canvas: &mut Canvas, kind: ShapeKind, at: Pos2) -> AnyShape {
    kind.factory()(canvas, &StyleSettings::default(), at)
}

fn rect_geometry(canvas: &Canvas, shape: &AnyShape) -> Rect {
    match canvas.geometry(shape.primitive()) {
        Some(Geometry::Rect(rect)) | Some(Geometry::Ellipse(rect)) => *rect,
        other => panic!("expected a box geometry, got {:?}", other),
    }
}

#[test]
fn test_rectangle_drag_down_right() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(10.0, 10.0));
    size_to(&mut canvas, pos2(50.0, 40.0));

    assert_eq!(
        canvas.geometry(rect.primitive()),
        Some(&Geometry::Rect(Rect::from_min_size(pos2(10.0, 10.0), vec2(40.0, 30.0))))
    );
}

#[test]
fn test_rectangle_drag_up_left() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(10.0, 10.0));
    size_to(&mut canvas, pos2(0.0, 5.0));

    assert_eq!(
        canvas.geometry(rect.primitive()),
        Some(&Geometry::Rect(Rect::from_min_size(pos2(0.0, 5.0), vec2(10.0, 5.0))))
    );
    let boxed = rect.as_box().unwrap();
    assert_eq!(boxed.extent(), vec2(-10.0, -5.0));
    assert!(boxed.quadrant().neg_x && boxed.quadrant().neg_y);
}

#[test]
fn test_sizing_far_corner_follows_pointer() {
    let mut canvas = Canvas::new();
    let origin = pos2(100.0, 100.0);
    let ellipse = create(&mut canvas, ShapeKind::Ellipse, origin);

    for pointer in [pos2(130.0, 90.0), pos2(60.0, 140.0), pos2(100.0, 20.0), pos2(0.0, 0.0)] {
        canvas.dispatch(PointerEvent::moved(pointer));
        let rect = rect_geometry(&canvas, &ellipse);
        assert!(rect.width() >= 0.0 && rect.height() >= 0.0);

        let quadrant = ellipse.as_box().unwrap().quadrant();
        let far_x = if quadrant.neg_x { rect.min.x } else { rect.max.x };
        let far_y = if quadrant.neg_y { rect.min.y } else { rect.max.y };
        assert_eq!(pos2(far_x, far_y), pointer);
    }
    assert_eq!(ellipse.phase(), Phase::Sizing);
    assert!(matches!(canvas.geometry(ellipse.primitive()), Some(Geometry::Ellipse(_))));
}

#[test]
fn test_quadratic_curve_control_drag() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::QuadraticCurve, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));

    let curve = shape.as_curve().unwrap();
    assert_eq!(curve.control(), pos2(50.0, 0.0));

    drag(&mut canvas, pos2(50.0, 0.0), pos2(50.0, 60.0));

    assert_eq!(curve.control(), pos2(50.0, 60.0));
    assert_eq!(curve.end(), pos2(100.0, 0.0));
    assert_eq!(curve.path().to_string(), "M0,0 Q50,60 100,0");
    match canvas.geometry(shape.primitive()) {
        Some(Geometry::Path { data, .. }) => assert_eq!(data, &curve.path()),
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn test_elliptical_arc_anchor_drag_translates_handles() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::EllipticalArc, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 100.0));

    let before: Vec<Pos2> = shape.markers().iter().map(|m| m.position()).collect();
    assert_eq!(before.len(), 3);

    drag(&mut canvas, pos2(0.0, 0.0), pos2(10.0, 10.0));

    let after: Vec<Pos2> = shape.markers().iter().map(|m| m.position()).collect();
    assert_eq!(shape.origin(), pos2(10.0, 10.0));
    assert_eq!(after[0], pos2(10.0, 10.0));
    assert_eq!(after[1], before[1] + vec2(10.0, 10.0));
    assert_eq!(after[2], before[2] + vec2(10.0, 10.0));

    let arc = shape.as_arc().unwrap();
    assert_eq!(arc.end(), pos2(110.0, 110.0));
    assert!(arc.path().to_string().starts_with("M10,10 A"));
}

#[test]
fn test_marker_counts_per_phase() {
    for (kind, expected) in [
        (ShapeKind::Rectangle, 2),
        (ShapeKind::Ellipse, 2),
        (ShapeKind::EllipticalArc, 3),
        (ShapeKind::QuadraticCurve, 3),
    ] {
        let mut canvas = Canvas::new();
        let shape = create(&mut canvas, kind, pos2(20.0, 20.0));
        assert_eq!(shape.kind(), kind);
        assert_eq!(shape.phase(), Phase::Sizing);
        assert_eq!(shape.markers().len(), 1);

        canvas.dispatch(PointerEvent::moved(pos2(60.0, 70.0)));
        assert_eq!(shape.markers().len(), 1);

        canvas.dispatch(PointerEvent::up(pos2(80.0, 90.0)));
        assert_eq!(shape.phase(), Phase::Editable);
        assert_eq!(shape.markers().len(), expected, "{:?}", kind);

        // A second release, through the surface or directly, changes nothing
        canvas.dispatch(PointerEvent::up(pos2(10.0, 10.0)));
        let flow = shape.on_pointer_event(&mut canvas, &PointerEvent::up(pos2(5.0, 5.0)));
        assert_eq!(flow, EventFlow::Propagate);
        assert_eq!(shape.markers().len(), expected, "{:?}", kind);
    }
}

#[test]
fn test_sizing_listeners_removed_once() {
    for (kind, after_release) in [
        (ShapeKind::Rectangle, 6),
        (ShapeKind::EllipticalArc, 9),
        (ShapeKind::QuadraticCurve, 9),
    ] {
        let mut canvas = Canvas::new();
        let _shape = create(&mut canvas, kind, pos2(0.0, 0.0));
        // Anchor marker (3) and the shape's move/release pair
        assert_eq!(canvas.listener_count(), 5);

        size_to(&mut canvas, pos2(30.0, 30.0));
        assert_eq!(canvas.listener_count(), after_release, "{:?}", kind);

        canvas.dispatch(PointerEvent::up(pos2(30.0, 30.0)));
        assert_eq!(canvas.listener_count(), after_release, "{:?}", kind);
    }
}

#[test]
fn test_moves_after_release_are_ignored() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(10.0, 10.0));
    size_to(&mut canvas, pos2(50.0, 40.0));
    let committed = rect_geometry(&canvas, &rect);

    canvas.dispatch(PointerEvent::moved(pos2(200.0, 200.0)));
    assert_eq!(rect_geometry(&canvas, &rect), committed);
}

#[test]
fn test_edits_before_release_are_noops() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(10.0, 10.0));
    let arc = create(&mut canvas, ShapeKind::EllipticalArc, pos2(10.0, 10.0));
    let curve = create(&mut canvas, ShapeKind::QuadraticCurve, pos2(10.0, 10.0));
    let rect_before = canvas.geometry(rect.primitive()).cloned();

    rect.as_box().unwrap().resize(&mut canvas, pos2(90.0, 90.0));
    rect.as_box().unwrap().move_shape(&mut canvas, pos2(90.0, 90.0));
    arc.as_arc().unwrap().adjust_curvature(&mut canvas, pos2(90.0, 90.0));
    arc.as_arc().unwrap().resize(&mut canvas, pos2(90.0, 90.0));
    curve.as_curve().unwrap().move_shape(&mut canvas, pos2(90.0, 90.0));

    assert_eq!(canvas.geometry(rect.primitive()).cloned(), rect_before);
    assert_eq!(arc.as_arc().unwrap().end(), pos2(10.0, 10.0));
    assert_eq!(curve.origin(), pos2(10.0, 10.0));
    for shape in [&rect, &arc, &curve] {
        assert_eq!(shape.phase(), Phase::Sizing);
        assert_eq!(shape.markers().len(), 1);
    }
}

#[test]
fn test_release_without_press() {
    let mut canvas = Canvas::new();
    assert_eq!(canvas.dispatch(PointerEvent::up(pos2(3.0, 4.0))), EventFlow::Propagate);
    assert_eq!(canvas.dispatch(PointerEvent::moved(pos2(5.0, 6.0))), EventFlow::Propagate);
    assert_eq!(canvas.primitive_count(), 0);
}

#[test]
fn test_rectangle_corner_resize_measures_from_origin() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(10.0, 10.0));
    size_to(&mut canvas, pos2(50.0, 40.0));

    drag(&mut canvas, pos2(50.0, 40.0), pos2(0.0, 0.0));

    assert_eq!(
        rect_geometry(&canvas, &rect),
        Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0))
    );
    assert_eq!(rect.markers()[1].position(), pos2(0.0, 0.0));
    assert_eq!(rect.origin(), pos2(10.0, 10.0));
}

#[test]
fn test_move_keeps_corner_glued_in_negative_quadrant() {
    let mut canvas = Canvas::new();
    let rect = create(&mut canvas, ShapeKind::Rectangle, pos2(50.0, 50.0));
    size_to(&mut canvas, pos2(30.0, 20.0));

    drag(&mut canvas, pos2(50.0, 50.0), pos2(60.0, 70.0));

    assert_eq!(rect.origin(), pos2(60.0, 70.0));
    assert_eq!(
        rect_geometry(&canvas, &rect),
        Rect::from_min_size(pos2(40.0, 40.0), vec2(20.0, 30.0))
    );
    assert_eq!(rect.markers()[1].position(), pos2(40.0, 40.0));
}

#[test]
fn test_arc_belly_starts_beyond_chord() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::EllipticalArc, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));

    let arc = shape.as_arc().unwrap();
    assert_eq!(arc.radii(), vec2(50.0, shape::PROVISIONAL_RADIUS_Y));
    assert_eq!(arc.sweep(), Sweep::Up);

    let belly = shape.markers()[2].position();
    assert_eq!(belly.x, 50.0);
    assert_eq!(belly.y, -arc.height());
    assert!(arc.height() > 90.0);
}

#[test]
fn test_arc_curvature_drag_flips_sweep() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::EllipticalArc, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));
    let arc = shape.as_arc().unwrap();

    let belly = shape.markers()[2].position();
    drag(&mut canvas, belly, pos2(50.0, 80.0));

    assert_eq!(arc.sweep(), Sweep::Down);
    assert_eq!(arc.radii().x, 50.0);
    assert!((arc.radii().y + 80.0).abs() < 1e-3);
    assert_eq!(arc.end(), pos2(100.0, 0.0));
}

#[test]
fn test_arc_endpoint_drag_keeps_radii() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::EllipticalArc, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));
    let arc = shape.as_arc().unwrap();
    let radii = arc.radii();

    drag(&mut canvas, pos2(100.0, 0.0), pos2(120.0, 10.0));

    assert_eq!(arc.end(), pos2(120.0, 10.0));
    assert_eq!(arc.radii(), radii);
    assert_eq!(arc.sweep(), Sweep::Up);
    assert_eq!(arc.path().to_string(), "M0,0 A50,100 0 0 1 120,10");
}

#[test]
fn test_curve_endpoint_drag_updates_bounds() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::QuadraticCurve, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));
    let curve = shape.as_curve().unwrap();

    drag(&mut canvas, pos2(100.0, 0.0), pos2(60.0, -40.0));

    assert_eq!(curve.end(), pos2(60.0, -40.0));
    assert_eq!(curve.control(), pos2(50.0, 0.0));
    let expected = Rect::from_min_size(pos2(0.0, -40.0), vec2(60.0, 40.0));
    assert_eq!(curve.bounds(), expected);
    match canvas.geometry(shape.primitive()) {
        Some(Geometry::Path { bounds, .. }) => assert_eq!(*bounds, expected),
        other => panic!("expected a path, got {:?}", other),
    }
}

#[test]
fn test_curve_anchor_drag_translates_everything() {
    let mut canvas = Canvas::new();
    let shape = create(&mut canvas, ShapeKind::QuadraticCurve, pos2(0.0, 0.0));
    size_to(&mut canvas, pos2(100.0, 0.0));
    let curve = shape.as_curve().unwrap();

    drag(&mut canvas, pos2(0.0, 0.0), pos2(-10.0, 5.0));

    assert_eq!(curve.end(), pos2(90.0, 5.0));
    assert_eq!(curve.control(), pos2(40.0, 5.0));
    let markers = shape.markers();
    assert_eq!(markers[1].position(), pos2(90.0, 5.0));
    assert_eq!(markers[2].position(), pos2(40.0, 5.0));
    assert_eq!(curve.path().to_string(), "M-10,5 Q40,5 90,5");
}

#[test]
fn test_shape_style_is_captured() {
    let mut canvas = Canvas::new();
    let style = StyleSettings {
        line_width: 3.0,
        ..Default::default()
    };
    let rect = shape::create_rectangle(&mut canvas, &style, pos2(0.0, 0.0));

    assert_eq!(rect.style().line_width, 3.0);
    assert_eq!(rect.style().stroke.0, 0x000000ff);
    assert_eq!(canvas.primitive(rect.primitive()).unwrap().style, rect.style());
}
