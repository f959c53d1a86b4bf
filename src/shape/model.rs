use crate::foundation::core::{Color, Point, Rect, Vec2};
use crate::foundation::error::{StackdiagError, StackdiagResult};

/// Geometry of a primitive, independent of where it sits.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl ShapeKind {
    /// Width and height of the axis-aligned box enclosing this geometry.
    pub fn extent(self) -> Vec2 {
        match self {
            ShapeKind::Rect { width, height } => Vec2::new(width, height),
            ShapeKind::Circle { radius } => Vec2::new(radius * 2.0, radius * 2.0),
        }
    }
}

/// Visual attributes shared by every element of a stack.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub fill: Color,
    /// 0..1
    pub fill_opacity: f64,
    pub stroke: Color,
    pub stroke_width: f64,
    #[serde(default)]
    pub dashed: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            fill_opacity: 1.0,
            stroke: Color::WHITE,
            stroke_width: 1.0,
            dashed: false,
        }
    }
}

impl Style {
    pub fn validate(&self) -> StackdiagResult<()> {
        self.fill.validate("fill")?;
        self.stroke.validate("stroke")?;
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(StackdiagError::validation(format!(
                "fill_opacity must be within 0..=1, got {}",
                self.fill_opacity
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(StackdiagError::validation(format!(
                "stroke_width must be finite and >= 0, got {}",
                self.stroke_width
            )));
        }
        Ok(())
    }
}

/// A positioned, styled primitive.
///
/// Shapes are plain values: every operation returns a new shape and leaves the receiver
/// untouched, so copies handed out by layout functions never alias each other.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Point,
    pub style: Style,
}

impl Shape {
    /// Rectangle centred on `center`.
    pub fn rect(center: Point, width: f64, height: f64, style: Style) -> StackdiagResult<Self> {
        Self::new(ShapeKind::Rect { width, height }, center, style)
    }

    /// Circle centred on `center`.
    pub fn circle(center: Point, radius: f64, style: Style) -> StackdiagResult<Self> {
        Self::new(ShapeKind::Circle { radius }, center, style)
    }

    pub fn new(kind: ShapeKind, center: Point, style: Style) -> StackdiagResult<Self> {
        let shape = Self {
            kind,
            center,
            style,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> StackdiagResult<()> {
        crate::foundation::core::ensure_finite_point("shape center", self.center)?;
        let ext = self.kind.extent();
        if !ext.is_finite() || ext.x < 0.0 || ext.y < 0.0 {
            return Err(StackdiagError::geometry(format!(
                "shape size must be finite and non-negative, got {}x{}",
                ext.x, ext.y
            )));
        }
        self.style.validate()
    }

    pub fn width(&self) -> f64 {
        self.kind.extent().x
    }

    pub fn height(&self) -> f64 {
        self.kind.extent().y
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.kind.extent().to_size())
    }

    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            ..self
        }
    }

    pub fn moved_to(self, center: Point) -> Self {
        Self { center, ..self }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.style.fill = fill;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> StackdiagResult<Self> {
        self.style.fill_opacity = opacity;
        self.style.validate()?;
        Ok(self)
    }

    pub fn with_style(self, style: Style) -> Self {
        Self { style, ..self }
    }

    /// Resize horizontally to `width`, keeping the centre.
    ///
    /// Circles scale uniformly to the requested diameter. Negative or non-finite widths are
    /// rejected.
    pub fn stretched_to_width(self, width: f64) -> StackdiagResult<Self> {
        if !width.is_finite() || width < 0.0 {
            return Err(StackdiagError::geometry(format!(
                "stretched width must be finite and >= 0, got {width}"
            )));
        }
        let kind = match self.kind {
            ShapeKind::Rect { height, .. } => ShapeKind::Rect { width, height },
            ShapeKind::Circle { .. } => ShapeKind::Circle {
                radius: width / 2.0,
            },
        };
        Ok(Self { kind, ..self })
    }

    /// Scale size and position about `origin`.
    pub fn scaled_about(self, origin: Point, factor: f64) -> Self {
        let kind = match self.kind {
            ShapeKind::Rect { width, height } => ShapeKind::Rect {
                width: width * factor,
                height: height * factor,
            },
            ShapeKind::Circle { radius } => ShapeKind::Circle {
                radius: radius * factor,
            },
        };
        Self {
            kind,
            center: origin + (self.center - origin) * factor,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/model.rs"]
mod tests;
