use crate::{
    foundation::core::{Anchor, Direction, Line, Point, Rect, Vec2, ensure_finite_point},
    foundation::error::{StackdiagError, StackdiagResult},
    layout::stack::Stack,
    shape::model::{Shape, Style},
};

/// Translation that puts `moving` beside `target` on side `direction`.
///
/// The facing edges end up `buff` apart and the boxes share a centre line on the other
/// axis (vertical centres for left/right, horizontal centres for up/down).
pub fn next_to(moving: Rect, target: Rect, direction: Direction, buff: f64) -> Vec2 {
    let target_side = direction.anchor().of(target);
    let moving_side = direction.opposite().anchor().of(moving);
    let aligned = target_side + direction.unit() * buff;
    aligned - moving_side
}

/// Straight arrow between two points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Arrow {
    pub line: Line,
    pub tip_length: f64,
    pub stroke_width: f64,
}

impl Arrow {
    pub fn start(&self) -> Point {
        self.line.p0
    }

    pub fn end(&self) -> Point {
        self.line.p1
    }
}

/// Arrow from `start` to `end`, pulled in by `buff` at both ends.
///
/// Arrows shorter than `2 * buff` collapse onto their midpoint.
pub fn arrow(
    start: Point,
    end: Point,
    buff: f64,
    tip_length: f64,
    stroke_width: f64,
) -> StackdiagResult<Arrow> {
    ensure_finite_point("arrow start", start)?;
    ensure_finite_point("arrow end", end)?;
    if !buff.is_finite() || buff < 0.0 {
        return Err(StackdiagError::validation(format!(
            "arrow buff must be finite and >= 0, got {buff}"
        )));
    }

    let d = end - start;
    let len = d.hypot();
    let line = if len <= 2.0 * buff {
        let mid = start.midpoint(end);
        Line::new(mid, mid)
    } else {
        let u = d / len;
        Line::new(start + u * buff, end - u * buff)
    };
    Ok(Arrow {
        line,
        tip_length,
        stroke_width,
    })
}

/// `bounds` grown by `buff` on every side.
pub fn surround(bounds: Rect, buff: f64) -> StackdiagResult<Rect> {
    if !buff.is_finite() || buff < 0.0 {
        return Err(StackdiagError::validation(format!(
            "surround buff must be finite and >= 0, got {buff}"
        )));
    }
    let grown = bounds.inflate(buff, buff);
    ensure_finite_point("surround corner", grown.origin())?;
    ensure_finite_point("surround corner", Point::new(grown.x1, grown.y1))?;
    Ok(grown)
}

/// Rectangle shape drawn around `bounds`, `buff` away from it.
pub fn surrounding_rect(bounds: Rect, buff: f64, style: Style) -> StackdiagResult<Shape> {
    let r = surround(bounds, buff)?;
    Shape::rect(r.center(), r.width(), r.height(), style)
}

/// Every edge from the right side of each `from` element to the left side of each `to`
/// element, in row-major order.
pub fn mesh(from: &Stack, to: &Stack) -> Vec<Line> {
    let mut edges = Vec::with_capacity(from.len() * to.len());
    for a in from {
        let p0 = Anchor::Right.of(a.bounds());
        for b in to {
            edges.push(Line::new(p0, Anchor::Left.of(b.bounds())));
        }
    }
    edges
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
