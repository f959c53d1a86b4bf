use crate::{
    foundation::core::{Anchor, Color, Direction, Point, Rect, Vec2, ensure_finite_vec},
    foundation::error::{StackdiagError, StackdiagResult},
    layout::placement::next_to,
    shape::model::Shape,
};

/// Ordered run of shapes, front-to-back in construction order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Stack {
    shapes: Vec<Shape>,
}

/// Largest number of elements a single stack (or a whole levelled block) may hold.
pub const MAX_STACK_LEN: usize = 1_000;

/// Repeat `seed` `count` times, each copy offset from the previous one by `offset`.
///
/// Element 0 is `seed` itself and element `i` sits at `seed.center + i * offset`.
/// `count` must be within `1..=MAX_STACK_LEN`.
#[tracing::instrument(level = "debug", skip(seed))]
pub fn build_stack(seed: Shape, count: usize, offset: Vec2) -> StackdiagResult<Stack> {
    if count == 0 || count > MAX_STACK_LEN {
        return Err(StackdiagError::invalid_count(count));
    }
    seed.validate()?;
    ensure_finite_vec("stack offset", offset)?;

    let mut shapes = vec![seed];
    for _ in 1..count {
        let prev = shapes[shapes.len() - 1];
        shapes.push(prev.translated(offset));
    }
    Ok(Stack { shapes })
}

/// Chain several stacks into one block, one level per fill colour.
///
/// Level `n + 1` starts one `offset` past the last element of level `n`, so the whole block
/// reads as a single evenly-offset run whose fill changes every `per_level` elements.
pub fn build_levels(
    seed: Shape,
    fills: &[Color],
    per_level: usize,
    offset: Vec2,
) -> StackdiagResult<Stack> {
    if fills.is_empty() {
        return Err(StackdiagError::invalid_count(0));
    }
    let total = fills.len().saturating_mul(per_level);
    if per_level == 0 || total > MAX_STACK_LEN {
        return Err(StackdiagError::invalid_count(total));
    }

    let mut out = Stack { shapes: Vec::new() };
    let mut level_seed = seed;
    for &fill in fills {
        let level = build_stack(level_seed.with_fill(fill), per_level, offset)?;
        level_seed = level.last().translated(offset);
        out.shapes.extend(level.shapes);
    }
    Ok(out)
}

impl Stack {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always false for stacks built through [`build_stack`].
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Stacks are never empty: both constructors reject a zero count.
    pub fn first(&self) -> Shape {
        self.shapes[0]
    }

    pub fn last(&self) -> Shape {
        self.shapes[self.shapes.len() - 1]
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    /// Centres in stacking order.
    pub fn positions(&self) -> Vec<Point> {
        self.shapes.iter().map(|s| s.center).collect()
    }

    /// Union of all element bounds.
    pub fn bounds(&self) -> Rect {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO)
    }

    pub fn anchor(&self, anchor: Anchor) -> Point {
        anchor.of(self.bounds())
    }

    pub fn shifted(self, offset: Vec2) -> Self {
        self.map(|s| s.translated(offset))
    }

    /// Scale positions and sizes about the centre of the stack's bounds.
    pub fn scaled(self, factor: f64) -> StackdiagResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(StackdiagError::validation(format!(
                "scale factor must be finite and > 0, got {factor}"
            )));
        }
        let origin = self.bounds().center();
        Ok(self.map(|s| s.scaled_about(origin, factor)))
    }

    /// Derive a new stack by transforming every element.
    pub fn map(self, f: impl FnMut(Shape) -> Shape) -> Self {
        Self {
            shapes: self.shapes.into_iter().map(f).collect(),
        }
    }

    /// Widen (or narrow, for negative `delta`) every element by `delta`.
    ///
    /// Fails when any element would end up with a negative or non-finite width.
    pub fn stretched_by(self, delta: f64) -> StackdiagResult<Self> {
        let shapes = self
            .shapes
            .into_iter()
            .map(|s| {
                let w = s.width() + delta;
                s.stretched_to_width(w)
            })
            .collect::<StackdiagResult<Vec<_>>>()?;
        Ok(Self { shapes })
    }

    /// Check every element; transforms can push coordinates past `f64` range.
    pub fn validate(&self) -> StackdiagResult<()> {
        self.shapes.iter().try_for_each(Shape::validate)
    }

    /// Move the whole stack beside `target` on side `direction`, `buff` apart.
    pub fn next_to(self, target: Rect, direction: Direction, buff: f64) -> Self {
        let delta = next_to(self.bounds(), target, direction, buff);
        self.shifted(delta)
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/stack.rs"]
mod tests;
