//! Stackdiag lays out procedural diagrams: stacks of repeated shapes (network layers, neurons),
//! elbow connectors, arrows, fully-connected meshes and highlight outlines.
//!
//! Everything here is pure geometry. Nothing is rendered; the output is a [`Diagram`] that a
//! renderer (or the `stackdiag` CLI, as JSON) consumes.
//!
//! - Build pieces directly with [`build_stack`], [`build_connector`] and friends
//! - Or describe a whole diagram as a [`DiagramDoc`] and call [`DiagramDoc::build`]
#![forbid(unsafe_code)]

mod foundation;

pub mod diagram;
pub mod layout;
pub mod shape;

pub use crate::foundation::core::{
    Anchor, Color, Direction, Line, Point, Rect, Vec2, point_from_coords, vec_from_coords,
};
pub use crate::foundation::error::{StackdiagError, StackdiagResult};

pub use crate::diagram::document::{DiagramDoc, Item};
pub use crate::diagram::model::{Diagram, DiagramBuilder, DiagramElement, Geometry};
pub use crate::diagram::theme::{SeedKind, Theme};
pub use crate::layout::connector::{Connector, build_connector};
pub use crate::layout::placement::{Arrow, arrow, mesh, next_to, surround, surrounding_rect};
pub use crate::layout::stack::{MAX_STACK_LEN, Stack, build_levels, build_stack};
pub use crate::shape::model::{Shape, ShapeKind, Style};
