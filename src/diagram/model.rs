use std::collections::BTreeSet;

use crate::{
    diagram::theme::Theme,
    foundation::core::{Line, Rect},
    foundation::error::{StackdiagError, StackdiagResult},
    foundation::core::ensure_finite_point,
    layout::{connector::Connector, placement::Arrow, stack::Stack},
    shape::model::{Shape, Style},
};

/// A laid-out diagram: named geometry in drawing order.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Diagram {
    pub theme: Theme,
    pub bounds: Rect,
    pub elements: Vec<DiagramElement>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct DiagramElement {
    pub name: String,
    #[serde(flatten)]
    pub geometry: Geometry,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Stack {
        shapes: Stack,
    },
    Connector {
        connector: Connector,
        style: Style,
    },
    Arrow {
        arrow: Arrow,
    },
    Mesh {
        edges: Vec<Line>,
        stroke_width: f64,
    },
    /// Outline drawn around another element.
    Surround {
        shape: Shape,
    },
}

impl Geometry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Stack { .. } => "stack",
            Geometry::Connector { .. } => "connector",
            Geometry::Arrow { .. } => "arrow",
            Geometry::Mesh { .. } => "mesh",
            Geometry::Surround { .. } => "surround",
        }
    }

    /// Every coordinate and size must be finite. Placement transforms can overflow even when
    /// their inputs were valid.
    pub fn validate(&self) -> StackdiagResult<()> {
        match self {
            Geometry::Stack { shapes } => shapes.validate(),
            Geometry::Connector { connector, style } => {
                connector.validate()?;
                style.validate()
            }
            Geometry::Arrow { arrow } => ensure_finite_line("arrow", arrow.line),
            Geometry::Mesh { edges, .. } => edges
                .iter()
                .try_for_each(|l| ensure_finite_line("mesh edge", *l)),
            Geometry::Surround { shape } => shape.validate(),
        }
    }

    /// Bounding box of everything this element draws, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Geometry::Stack { shapes } => Some(shapes.bounds()),
            Geometry::Connector { connector, .. } => {
                lines_bounds(connector.segments()).map(|r| r.union(connector.marker().bounds()))
            }
            Geometry::Arrow { arrow } => Some(line_bounds(arrow.line)),
            Geometry::Mesh { edges, .. } => lines_bounds(edges),
            Geometry::Surround { shape } => Some(shape.bounds()),
        }
    }
}

fn ensure_finite_line(what: &str, line: Line) -> StackdiagResult<()> {
    ensure_finite_point(what, line.p0)?;
    ensure_finite_point(what, line.p1)
}

fn line_bounds(line: Line) -> Rect {
    Rect::from_points(line.p0, line.p1)
}

fn lines_bounds(lines: &[Line]) -> Option<Rect> {
    lines
        .iter()
        .copied()
        .map(line_bounds)
        .reduce(|acc, r| acc.union(r))
}

impl Diagram {
    pub fn element(&self, name: &str) -> Option<&DiagramElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        match &self.element(name)?.geometry {
            Geometry::Stack { shapes } => Some(shapes),
            _ => None,
        }
    }

    pub fn to_json_pretty(&self) -> StackdiagResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StackdiagError::serde(e.to_string()))
    }

    pub fn to_json(&self) -> StackdiagResult<String> {
        serde_json::to_string(self).map_err(|e| StackdiagError::serde(e.to_string()))
    }
}

/// Builder for [`Diagram`] values.
pub struct DiagramBuilder {
    theme: Theme,
    elements: Vec<DiagramElement>,
}

impl DiagramBuilder {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            elements: Vec::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Look up an element added earlier.
    pub fn element(&self, name: &str) -> Option<&DiagramElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn stack(self, name: impl Into<String>, shapes: Stack) -> Self {
        self.push(name, Geometry::Stack { shapes })
    }

    pub fn connector(self, name: impl Into<String>, connector: Connector) -> Self {
        let style = self.theme.connector_style();
        self.push(name, Geometry::Connector { connector, style })
    }

    pub fn arrow(self, name: impl Into<String>, arrow: Arrow) -> Self {
        self.push(name, Geometry::Arrow { arrow })
    }

    pub fn mesh(self, name: impl Into<String>, edges: Vec<Line>) -> Self {
        let stroke_width = self.theme.mesh_stroke_width;
        self.push(
            name,
            Geometry::Mesh {
                edges,
                stroke_width,
            },
        )
    }

    pub fn surround(self, name: impl Into<String>, shape: Shape) -> Self {
        self.push(name, Geometry::Surround { shape })
    }

    fn push(mut self, name: impl Into<String>, geometry: Geometry) -> Self {
        self.elements.push(DiagramElement {
            name: name.into(),
            geometry,
        });
        self
    }

    /// Build validated [`Diagram`].
    pub fn build(self) -> StackdiagResult<Diagram> {
        self.theme.validate()?;

        let mut seen = BTreeSet::new();
        for e in &self.elements {
            if e.name.trim().is_empty() {
                return Err(StackdiagError::validation(format!(
                    "{} element name must be non-empty",
                    e.geometry.kind_name()
                )));
            }
            if !seen.insert(e.name.as_str()) {
                return Err(StackdiagError::validation(format!(
                    "duplicate element name '{}'",
                    e.name
                )));
            }
            e.geometry.validate().map_err(|err| match err {
                StackdiagError::InvalidGeometry(msg) => {
                    StackdiagError::geometry(format!("element '{}': {msg}", e.name))
                }
                other => other,
            })?;
        }

        let bounds = self
            .elements
            .iter()
            .filter_map(|e| e.geometry.bounds())
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO);

        Ok(Diagram {
            theme: self.theme,
            bounds,
            elements: self.elements,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/model.rs"]
mod tests;
