use std::{collections::BTreeSet, fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    diagram::{
        model::{Diagram, DiagramBuilder, Geometry},
        theme::{SeedKind, Theme},
    },
    foundation::core::{
        Anchor, Color, Direction, Point, Rect, Vec2, point_from_coords, vec_from_coords,
    },
    foundation::error::{StackdiagError, StackdiagResult},
    layout::{
        connector::build_connector,
        placement::{arrow, mesh, surrounding_rect},
        stack::{MAX_STACK_LEN, Stack, build_levels, build_stack},
    },
    shape::model::{Shape, ShapeKind},
};

/// Gap used by `next_to` when a document does not give one.
pub const DEFAULT_NEXT_TO_BUFF: f64 = 0.25;

/// Declarative JSON description of a diagram.
///
/// Items are laid out in order; an item may only refer to items listed before it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DiagramDoc {
    #[serde(default)]
    pub theme: Theme,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Stack(StackItem),
    Levels(LevelsItem),
    Connector(ConnectorItem),
    Arrow(ArrowItem),
    Mesh(MeshItem),
    Surround(SurroundItem),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Stack(i) => &i.name,
            Item::Levels(i) => &i.name,
            Item::Connector(i) => &i.name,
            Item::Arrow(i) => &i.name,
            Item::Mesh(i) => &i.name,
            Item::Surround(i) => &i.name,
        }
    }

    fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match self {
            Item::Stack(StackItem { arrange, .. }) | Item::Levels(LevelsItem { arrange, .. }) => {
                if let Some(n) = &arrange.next_to {
                    out.push(n.target.as_str());
                }
            }
            Item::Connector(i) => {
                out.extend(i.start.reference());
                out.extend(i.end.reference());
            }
            Item::Arrow(i) => {
                out.extend(i.from.as_deref());
                out.extend(i.to.as_deref());
                out.extend(i.start.as_ref().and_then(PointRef::reference));
                out.extend(i.end.as_ref().and_then(PointRef::reference));
            }
            Item::Mesh(i) => {
                out.push(i.from.as_str());
                out.push(i.to.as_str());
            }
            Item::Surround(i) => out.push(i.target.as_str()),
        }
        out
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StackItem {
    pub name: String,
    pub shape: SeedKind,
    #[serde(default = "default_fill")]
    pub fill: Color,
    #[serde(default = "origin")]
    pub at: Vec<f64>,
    pub count: i64,
    /// Defaults to the theme offset for `shape`.
    #[serde(default)]
    pub offset: Option<Vec<f64>>,
    /// Overrides the theme's fill opacity for `shape`.
    #[serde(default)]
    pub fill_opacity: Option<f64>,
    #[serde(flatten)]
    pub size: SizeOverride,
    #[serde(flatten)]
    pub arrange: Arrange,
}

/// Seed size overrides: `width`/`height` for blocks, `radius` for neurons.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SizeOverride {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LevelsItem {
    pub name: String,
    pub fills: Vec<Color>,
    pub per_level: i64,
    #[serde(default = "origin")]
    pub at: Vec<f64>,
    #[serde(default)]
    pub offset: Option<Vec<f64>>,
    #[serde(flatten)]
    pub arrange: Arrange,
}

/// Post-construction adjustments, applied in field order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Arrange {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub width_delta: Option<f64>,
    #[serde(default)]
    pub next_to: Option<NextTo>,
    #[serde(default)]
    pub shift: Option<Vec<f64>>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NextTo {
    pub target: String,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default = "default_buff")]
    pub buff: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ConnectorItem {
    pub name: String,
    pub start: PointRef,
    pub end: PointRef,
    #[serde(default)]
    pub offsets: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ArrowItem {
    pub name: String,
    /// Start at the right side of this element.
    #[serde(default)]
    pub from: Option<String>,
    /// End at the left side of this element.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub start: Option<PointRef>,
    #[serde(default)]
    pub end: Option<PointRef>,
    #[serde(default)]
    pub buff: Option<f64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MeshItem {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Outline around an earlier element, or around one element of a stack.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SurroundItem {
    pub name: String,
    pub target: String,
    /// Element of a stack; negative counts from the end.
    #[serde(default)]
    pub index: Option<i64>,
    /// Defaults to the theme's `surround_buff`.
    #[serde(default)]
    pub buff: Option<f64>,
    #[serde(default = "default_surround_color")]
    pub color: Color,
}

/// A point given literally or relative to an earlier element.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PointRef {
    Coords(Vec<f64>),
    Anchored {
        of: String,
        #[serde(default)]
        anchor: Anchor,
        /// Element of a stack; negative counts from the end.
        #[serde(default)]
        index: Option<i64>,
        #[serde(default)]
        shift: Option<Vec<f64>>,
    },
}

impl PointRef {
    fn reference(&self) -> Option<&str> {
        match self {
            PointRef::Coords(_) => None,
            PointRef::Anchored { of, .. } => Some(of),
        }
    }
}

fn default_fill() -> Color {
    Color::WHITE
}

fn default_surround_color() -> Color {
    Color::YELLOW
}

fn origin() -> Vec<f64> {
    vec![0.0, 0.0]
}

fn default_direction() -> Direction {
    Direction::Right
}

fn default_buff() -> f64 {
    DEFAULT_NEXT_TO_BUFF
}

/// Counts must be within `1..=MAX_STACK_LEN`.
fn count_from(n: i64) -> StackdiagResult<usize> {
    match usize::try_from(n) {
        Ok(c) if (1..=MAX_STACK_LEN).contains(&c) => Ok(c),
        _ => Err(StackdiagError::InvalidCount(n)),
    }
}

impl ArrowItem {
    /// Each end is given exactly once, either as a point or as an element name.
    fn check_ends(&self) -> StackdiagResult<()> {
        for (point, element, p_key, e_key) in [
            (self.start.is_some(), self.from.is_some(), "start", "from"),
            (self.end.is_some(), self.to.is_some(), "end", "to"),
        ] {
            match (point, element) {
                (true, true) => {
                    return Err(StackdiagError::validation(format!(
                        "arrow '{}' gives both `{p_key}` and `{e_key}`",
                        self.name
                    )));
                }
                (false, false) => {
                    return Err(StackdiagError::validation(format!(
                        "arrow '{}' needs `{p_key}` or `{e_key}`",
                        self.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl DiagramDoc {
    pub fn from_path(path: &Path) -> StackdiagResult<Self> {
        let f = File::open(path).with_context(|| format!("open diagram '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StackdiagError::serde(format!("{}: {e}", path.display())))
    }

    pub fn from_json(s: &str) -> StackdiagResult<Self> {
        serde_json::from_str(s).map_err(|e| StackdiagError::serde(e.to_string()))
    }

    /// Check the theme, names and references without laying anything out.
    pub fn validate(&self) -> StackdiagResult<()> {
        self.theme.validate()?;

        let mut known = BTreeSet::new();
        for item in &self.items {
            let name = item.name();
            if name.trim().is_empty() {
                return Err(StackdiagError::validation("item name must be non-empty"));
            }
            if let Item::Arrow(a) = item {
                a.check_ends()?;
            }
            for r in item.references() {
                if !known.contains(r) {
                    return Err(StackdiagError::validation(format!(
                        "item '{name}' refers to '{r}', which is not defined before it"
                    )));
                }
            }
            if !known.insert(name) {
                return Err(StackdiagError::validation(format!(
                    "duplicate item name '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Lay out every item in order.
    #[tracing::instrument(skip(self), fields(items = self.items.len()))]
    pub fn build(&self) -> StackdiagResult<Diagram> {
        self.validate()?;

        let mut b = DiagramBuilder::new(self.theme.clone());
        for item in &self.items {
            tracing::debug!(name = item.name(), "laying out item");
            b = match item {
                Item::Stack(i) => {
                    let stack = build_stack_item(&b, i)?;
                    b.stack(&i.name, stack)
                }
                Item::Levels(i) => {
                    let stack = build_levels_item(&b, i)?;
                    b.stack(&i.name, stack)
                }
                Item::Connector(i) => {
                    let start = resolve_point(&b, &i.start)?;
                    let end = resolve_point(&b, &i.end)?;
                    let offsets = i
                        .offsets
                        .iter()
                        .map(|o| vec_from_coords(o))
                        .collect::<StackdiagResult<Vec<_>>>()?;
                    let connector = build_connector(start, end, &offsets, b.theme().marker()?)?;
                    b.connector(&i.name, connector)
                }
                Item::Arrow(i) => {
                    let start =
                        arrow_end(&b, i.start.as_ref(), i.from.as_deref(), Anchor::Right)?;
                    let end = arrow_end(&b, i.end.as_ref(), i.to.as_deref(), Anchor::Left)?;
                    let theme = b.theme();
                    let a = arrow(
                        start,
                        end,
                        i.buff.unwrap_or(theme.arrow_buff),
                        theme.arrow_tip_length,
                        theme.arrow_stroke_width,
                    )?;
                    b.arrow(&i.name, a)
                }
                Item::Mesh(i) => {
                    let edges = mesh(stack_ref(&b, &i.from)?, stack_ref(&b, &i.to)?);
                    b.mesh(&i.name, edges)
                }
                Item::Surround(i) => {
                    let target = element_bounds(&b, &i.target, i.index)?;
                    let theme = b.theme();
                    let outline = surrounding_rect(
                        target,
                        i.buff.unwrap_or(theme.surround_buff),
                        theme.surround_style(i.color),
                    )?;
                    b.surround(&i.name, outline)
                }
            };
        }
        b.build()
    }
}

fn build_stack_item(b: &DiagramBuilder, item: &StackItem) -> StackdiagResult<Stack> {
    let theme = b.theme();
    let seed = stack_seed(theme, item)?;
    let offset = match &item.offset {
        Some(o) => vec_from_coords(o)?,
        None => theme.offset_for(item.shape),
    };
    let stack = build_stack(seed, count_from(item.count)?, offset)?;
    arrange(b, stack, &item.arrange)
}

fn stack_seed(theme: &Theme, item: &StackItem) -> StackdiagResult<Shape> {
    let mut seed = theme.seed(item.shape, point_from_coords(&item.at)?, item.fill)?;
    let SizeOverride {
        width,
        height,
        radius,
    } = item.size;
    seed.kind = match seed.kind {
        ShapeKind::Rect {
            width: w,
            height: h,
        } => {
            if radius.is_some() {
                return Err(StackdiagError::validation(format!(
                    "stack '{}' repeats blocks; size them with `width`/`height`, not `radius`",
                    item.name
                )));
            }
            ShapeKind::Rect {
                width: width.unwrap_or(w),
                height: height.unwrap_or(h),
            }
        }
        ShapeKind::Circle { radius: r } => {
            if width.is_some() || height.is_some() {
                return Err(StackdiagError::validation(format!(
                    "stack '{}' repeats neurons; size them with `radius`, not `width`/`height`",
                    item.name
                )));
            }
            ShapeKind::Circle {
                radius: radius.unwrap_or(r),
            }
        }
    };
    if let Some(opacity) = item.fill_opacity {
        seed = seed.with_fill_opacity(opacity)?;
    }
    seed.validate()?;
    Ok(seed)
}

fn build_levels_item(b: &DiagramBuilder, item: &LevelsItem) -> StackdiagResult<Stack> {
    let theme = b.theme();
    let seed = theme.block(point_from_coords(&item.at)?, default_fill())?;
    let offset = match &item.offset {
        Some(o) => vec_from_coords(o)?,
        None => theme.offset_for(SeedKind::Block),
    };
    let stack = build_levels(seed, &item.fills, count_from(item.per_level)?, offset)?;
    arrange(b, stack, &item.arrange)
}

fn arrange(b: &DiagramBuilder, mut stack: Stack, arrange: &Arrange) -> StackdiagResult<Stack> {
    if let Some(factor) = arrange.scale {
        stack = stack.scaled(factor)?;
    }
    if let Some(delta) = arrange.width_delta {
        stack = stack.stretched_by(delta)?;
    }
    if let Some(n) = &arrange.next_to {
        let target = element_bounds(b, &n.target, None)?;
        stack = stack.next_to(target, n.direction, n.buff);
    }
    if let Some(shift) = &arrange.shift {
        stack = stack.shifted(vec_from_coords(shift)?);
    }
    Ok(stack)
}

fn stack_ref<'a>(b: &'a DiagramBuilder, name: &str) -> StackdiagResult<&'a Stack> {
    match b.element(name).map(|e| &e.geometry) {
        Some(Geometry::Stack { shapes }) => Ok(shapes),
        Some(other) => Err(StackdiagError::validation(format!(
            "'{name}' is not a stack (found {})",
            other.kind_name()
        ))),
        None => Err(StackdiagError::validation(format!(
            "unknown element '{name}'"
        ))),
    }
}

fn element_bounds(b: &DiagramBuilder, name: &str, index: Option<i64>) -> StackdiagResult<Rect> {
    if let Some(index) = index {
        let stack = stack_ref(b, name)?;
        let len = stack.len() as i64;
        let i = if index < 0 { len + index } else { index };
        if !(0..len).contains(&i) {
            return Err(StackdiagError::validation(format!(
                "index {index} out of range for '{name}' ({len} elements)"
            )));
        }
        return Ok(stack.shapes()[i as usize].bounds());
    }

    let element = b
        .element(name)
        .ok_or_else(|| StackdiagError::validation(format!("unknown element '{name}'")))?;
    element.geometry.bounds().ok_or_else(|| {
        StackdiagError::validation(format!("element '{name}' has no extent to anchor to"))
    })
}

/// One end of an arrow: a point, or the `side` of a named element.
fn arrow_end(
    b: &DiagramBuilder,
    point: Option<&PointRef>,
    element: Option<&str>,
    side: Anchor,
) -> StackdiagResult<Point> {
    match (point, element) {
        (Some(p), None) => resolve_point(b, p),
        (None, Some(name)) => Ok(side.of(element_bounds(b, name, None)?)),
        _ => Err(StackdiagError::validation(
            "arrow ends take either a point or an element name",
        )),
    }
}

fn resolve_point(b: &DiagramBuilder, p: &PointRef) -> StackdiagResult<Point> {
    match p {
        PointRef::Coords(c) => point_from_coords(c),
        PointRef::Anchored {
            of,
            anchor,
            index,
            shift,
        } => {
            let base = anchor.of(element_bounds(b, of, *index)?);
            let shift = match shift {
                Some(s) => vec_from_coords(s)?,
                None => Vec2::ZERO,
            };
            Ok(base + shift)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diagram/document.rs"]
mod tests;
