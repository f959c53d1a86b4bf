use super::*;
use crate::{foundation::error::StackdiagError, shape::model::Style};

fn marker() -> Shape {
    Shape::circle(Point::new(42.0, 42.0), 0.05, Style::default()).unwrap()
}

#[test]
fn waypoints_are_prefix_sums_then_end() {
    let c = build_connector(
        Point::new(0.0, 0.0),
        Point::new(5.0, 5.0),
        &[Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        marker(),
    )
    .unwrap();

    assert_eq!(
        c.waypoints(),
        &[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(5.0, 5.0)
        ]
    );
    assert_eq!(c.segments().len(), 3);
    assert_eq!(c.segments()[2], Line::new((1.0, 1.0), (5.0, 5.0)));
    assert_eq!(c.start(), Point::ORIGIN);
    assert_eq!(c.end(), Point::new(5.0, 5.0));
}

#[test]
fn empty_offsets_give_one_direct_segment() {
    let c = build_connector(Point::new(1.0, 2.0), Point::new(3.0, 4.0), &[], marker()).unwrap();
    assert_eq!(c.segments(), &[Line::new((1.0, 2.0), (3.0, 4.0))]);
}

#[test]
fn last_segment_closes_on_end_even_when_offsets_overshoot() {
    let offsets = [
        Vec2::new(0.0, 0.2),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, -1.5),
        Vec2::new(-8.9, 0.0),
    ];
    let end = Point::new(-3.0, 0.25);
    let c = build_connector(Point::new(2.0, 1.0), end, &offsets, marker()).unwrap();
    assert_eq!(c.segments().len(), offsets.len() + 1);
    assert_eq!(c.segments().last().unwrap().p1, end);

    for pair in c.segments().windows(2) {
        assert_eq!(pair[0].p1, pair[1].p0);
    }
}

#[test]
fn marker_sits_on_start() {
    let start = Point::new(-1.0, 3.0);
    let c = build_connector(start, Point::ORIGIN, &[Vec2::new(0.0, 1.0)], marker()).unwrap();
    assert_eq!(c.marker().center, start);
    assert_eq!(c.marker().kind, marker().kind);
}

#[test]
fn non_finite_inputs_are_rejected() {
    assert!(matches!(
        build_connector(Point::new(f64::NAN, 0.0), Point::ORIGIN, &[], marker()),
        Err(StackdiagError::InvalidGeometry(_))
    ));
    assert!(matches!(
        build_connector(
            Point::ORIGIN,
            Point::ORIGIN,
            &[Vec2::new(0.0, f64::INFINITY)],
            marker()
        ),
        Err(StackdiagError::InvalidGeometry(_))
    ));
}

#[test]
fn connectors_expose_read_only_geometry() {
    let c = build_connector(Point::ORIGIN, Point::new(0.0, 2.0), &[], marker()).unwrap();
    assert_eq!(c.waypoints().len(), 2);
    assert_eq!(c.start(), c.marker().center);
    assert_eq!(c.end(), c.segments()[0].p1);
    assert!(c.validate().is_ok());
}
