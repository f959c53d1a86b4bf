use crate::{
    foundation::core::{Line, Point, Vec2, ensure_finite_point, ensure_finite_vec},
    foundation::error::StackdiagResult,
    shape::model::Shape,
};

/// Multi-segment path with a marker at its start.
///
/// Only [`build_connector`] creates connectors, so there are always at least two waypoints
/// and one segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Connector {
    waypoints: Vec<Point>,
    segments: Vec<Line>,
    marker: Shape,
}

impl Connector {
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[Line] {
        &self.segments
    }

    pub fn marker(&self) -> &Shape {
        &self.marker
    }

    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    pub fn end(&self) -> Point {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Every waypoint and the marker must still be finite after placement.
    pub fn validate(&self) -> StackdiagResult<()> {
        for p in &self.waypoints {
            ensure_finite_point("connector waypoint", *p)?;
        }
        self.marker.validate()
    }
}

/// Elbow connector from `start` to `end`.
///
/// Waypoints are the running sums of `offsets` from `start`; the path then always closes on
/// `end`, wherever the last offset landed. `marker` is moved onto `start`.
#[tracing::instrument(level = "debug", skip(marker))]
pub fn build_connector(
    start: Point,
    end: Point,
    offsets: &[Vec2],
    marker: Shape,
) -> StackdiagResult<Connector> {
    ensure_finite_point("connector start", start)?;
    ensure_finite_point("connector end", end)?;
    for off in offsets {
        ensure_finite_vec("connector offset", *off)?;
    }
    marker.validate()?;

    let mut waypoints = Vec::with_capacity(offsets.len() + 2);
    waypoints.push(start);
    let mut cursor = start;
    for &off in offsets {
        cursor += off;
        waypoints.push(cursor);
    }
    waypoints.push(end);

    let segments = waypoints
        .windows(2)
        .map(|w| Line::new(w[0], w[1]))
        .collect();

    Ok(Connector {
        waypoints,
        segments,
        marker: marker.moved_to(start),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/connector.rs"]
mod tests;
