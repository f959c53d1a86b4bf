use crate::{
    foundation::core::{Color, Point, Vec2},
    foundation::error::{StackdiagError, StackdiagResult},
    shape::model::{Shape, Style},
};

/// Which seed primitive a stack repeats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedKind {
    /// Square layer block.
    Block,
    /// Small circle standing for one neuron.
    Neuron,
}

/// Sizes, strokes and default offsets used when building diagram primitives.
///
/// Owned by the caller and threaded through explicitly; every field has a default so a
/// JSON document only has to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub block_size: f64,
    pub block_stroke_width: f64,
    pub block_offset: [f64; 2],
    pub neuron_radius: f64,
    pub neuron_stroke_width: f64,
    pub neuron_fill_opacity: f64,
    pub neuron_offset: [f64; 2],
    pub connector_stroke_width: f64,
    pub marker_radius: f64,
    pub arrow_stroke_width: f64,
    pub arrow_tip_length: f64,
    pub arrow_buff: f64,
    pub mesh_stroke_width: f64,
    /// Gap between an element and the rectangle drawn around it.
    pub surround_buff: f64,
    pub surround_stroke_width: f64,
    pub stroke: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            block_size: 0.5,
            block_stroke_width: 1.5,
            block_offset: [-0.4, 0.4],
            neuron_radius: 0.05,
            neuron_stroke_width: 1.5,
            neuron_fill_opacity: 0.5,
            neuron_offset: [0.0, -0.3],
            connector_stroke_width: 1.0,
            marker_radius: 0.05,
            arrow_stroke_width: 0.7,
            arrow_tip_length: 0.1,
            arrow_buff: 0.25,
            mesh_stroke_width: 0.5,
            surround_buff: 0.1,
            surround_stroke_width: 2.0,
            stroke: Color::WHITE,
        }
    }
}

impl Theme {
    pub fn validate(&self) -> StackdiagResult<()> {
        let positive = [
            ("block_size", self.block_size),
            ("neuron_radius", self.neuron_radius),
            ("marker_radius", self.marker_radius),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(StackdiagError::validation(format!(
                    "theme.{name} must be finite and > 0, got {v}"
                )));
            }
        }

        let non_negative = [
            ("block_stroke_width", self.block_stroke_width),
            ("neuron_stroke_width", self.neuron_stroke_width),
            ("connector_stroke_width", self.connector_stroke_width),
            ("arrow_stroke_width", self.arrow_stroke_width),
            ("arrow_tip_length", self.arrow_tip_length),
            ("arrow_buff", self.arrow_buff),
            ("mesh_stroke_width", self.mesh_stroke_width),
            ("surround_buff", self.surround_buff),
            ("surround_stroke_width", self.surround_stroke_width),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(StackdiagError::validation(format!(
                    "theme.{name} must be finite and >= 0, got {v}"
                )));
            }
        }

        self.stroke.validate("theme.stroke")?;
        if !(0.0..=1.0).contains(&self.neuron_fill_opacity) {
            return Err(StackdiagError::validation(format!(
                "theme.neuron_fill_opacity must be within 0..=1, got {}",
                self.neuron_fill_opacity
            )));
        }

        for (name, v) in [
            ("block_offset", self.block_offset),
            ("neuron_offset", self.neuron_offset),
        ] {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(StackdiagError::geometry(format!(
                    "theme.{name} must be finite, got {v:?}"
                )));
            }
        }
        Ok(())
    }

    /// Default step between consecutive elements of a stack of `kind`.
    pub fn offset_for(&self, kind: SeedKind) -> Vec2 {
        let [x, y] = match kind {
            SeedKind::Block => self.block_offset,
            SeedKind::Neuron => self.neuron_offset,
        };
        Vec2::new(x, y)
    }

    pub fn seed(&self, kind: SeedKind, center: Point, fill: Color) -> StackdiagResult<Shape> {
        match kind {
            SeedKind::Block => self.block(center, fill),
            SeedKind::Neuron => self.neuron(center, fill),
        }
    }

    /// Opaque square layer block.
    pub fn block(&self, center: Point, fill: Color) -> StackdiagResult<Shape> {
        Shape::rect(
            center,
            self.block_size,
            self.block_size,
            Style {
                fill,
                fill_opacity: 1.0,
                stroke: self.stroke,
                stroke_width: self.block_stroke_width,
                dashed: false,
            },
        )
    }

    /// Half-transparent neuron circle.
    pub fn neuron(&self, center: Point, fill: Color) -> StackdiagResult<Shape> {
        Shape::circle(
            center,
            self.neuron_radius,
            Style {
                fill,
                fill_opacity: self.neuron_fill_opacity,
                stroke: self.stroke,
                stroke_width: self.neuron_stroke_width,
                dashed: false,
            },
        )
    }

    /// Solid dot drawn at the start of a connector.
    pub fn marker(&self) -> StackdiagResult<Shape> {
        Shape::circle(
            Point::ORIGIN,
            self.marker_radius,
            Style {
                fill: self.stroke,
                fill_opacity: 1.0,
                stroke: self.stroke,
                stroke_width: self.neuron_stroke_width,
                dashed: false,
            },
        )
    }

    /// Style for connector segments.
    pub fn connector_style(&self) -> Style {
        Style {
            fill: self.stroke,
            fill_opacity: 0.0,
            stroke: self.stroke,
            stroke_width: self.connector_stroke_width,
            dashed: true,
        }
    }

    /// Unfilled outline used to highlight an element.
    pub fn surround_style(&self, color: Color) -> Style {
        Style {
            fill: color,
            fill_opacity: 0.0,
            stroke: color,
            stroke_width: self.surround_stroke_width,
            dashed: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/theme.rs"]
mod tests;
