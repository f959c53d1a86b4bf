use crate::foundation::error::{StackdiagError, StackdiagResult};

pub use kurbo::{Line, Point, Rect, Vec2};

/// Side of a box or direction of travel, in y-up diagram space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `(0, 1)`.
    Up,
    /// `(0, -1)`.
    Down,
    /// `(-1, 0)`.
    Left,
    /// `(1, 0)`.
    Right,
}

impl Direction {
    /// Unit vector pointing in this direction.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// The side of a box facing this direction.
    pub fn anchor(self) -> Anchor {
        match self {
            Direction::Up => Anchor::Top,
            Direction::Down => Anchor::Bottom,
            Direction::Left => Anchor::Left,
            Direction::Right => Anchor::Right,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Named point on a bounding box.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    Left,
    Right,
    /// Middle of the edge with the largest y.
    Top,
    /// Middle of the edge with the smallest y.
    Bottom,
}

impl Anchor {
    /// Resolve this anchor against `bounds`.
    pub fn of(self, bounds: Rect) -> Point {
        let c = bounds.center();
        match self {
            Anchor::Center => c,
            Anchor::Left => Point::new(bounds.x0, c.y),
            Anchor::Right => Point::new(bounds.x1, c.y),
            Anchor::Top => Point::new(c.x, bounds.y1),
            Anchor::Bottom => Point::new(c.x, bounds.y0),
        }
    }
}

/// Parse an external coordinate array into a point.
///
/// Exactly two finite components are accepted.
pub fn point_from_coords(coords: &[f64]) -> StackdiagResult<Point> {
    let [x, y] = two_finite(coords)?;
    Ok(Point::new(x, y))
}

/// Parse an external coordinate array into a vector.
pub fn vec_from_coords(coords: &[f64]) -> StackdiagResult<Vec2> {
    let [x, y] = two_finite(coords)?;
    Ok(Vec2::new(x, y))
}

fn two_finite(coords: &[f64]) -> StackdiagResult<[f64; 2]> {
    let &[x, y] = coords else {
        return Err(StackdiagError::geometry(format!(
            "expected 2 coordinates, got {}",
            coords.len()
        )));
    };
    if !x.is_finite() || !y.is_finite() {
        return Err(StackdiagError::geometry(format!(
            "coordinates must be finite, got [{x}, {y}]"
        )));
    }
    Ok([x, y])
}

pub(crate) fn ensure_finite_point(what: &str, p: Point) -> StackdiagResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(StackdiagError::geometry(format!(
            "{what} must be finite, got ({}, {})",
            p.x, p.y
        )))
    }
}

pub(crate) fn ensure_finite_vec(what: &str, v: Vec2) -> StackdiagResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(StackdiagError::geometry(format!(
            "{what} must be finite, got ({}, {})",
            v.x, v.y
        )))
    }
}

/// Straight-alpha RGBA colour with channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const BLUE: Color = Color::hex_rgb(0x58, 0xC4, 0xDD);
    pub const PURPLE: Color = Color::hex_rgb(0x9A, 0x72, 0xAC);
    pub const ORANGE: Color = Color::hex_rgb(0xFF, 0x86, 0x2F);
    pub const RED: Color = Color::hex_rgb(0xFC, 0x62, 0x55);
    pub const GREEN: Color = Color::hex_rgb(0x83, 0xC1, 0x67);
    pub const YELLOW: Color = Color::hex_rgb(0xFF, 0xFF, 0x00);
    pub const GRAY: Color = Color::hex_rgb(0x88, 0x88, 0x88);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    const fn hex_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Look up a palette colour by (case-insensitive) name.
    pub fn named(name: &str) -> Option<Self> {
        let c = match name.trim().to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "blue" => Self::BLUE,
            "purple" => Self::PURPLE,
            "orange" => Self::ORANGE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "yellow" => Self::YELLOW,
            "gray" | "grey" => Self::GRAY,
            _ => return None,
        };
        Some(c)
    }

    /// Every channel must be finite and within `0..=1`.
    pub fn validate(&self, what: &str) -> StackdiagResult<()> {
        let channels = [("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)];
        for (name, v) in channels {
            if !(0.0..=1.0).contains(&v) {
                return Err(StackdiagError::validation(format!(
                    "{what} channel {name} must be within 0..=1, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Quantize to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        let color = match Repr::deserialize(deserializer)? {
            Repr::Str(s) => match Color::named(&s) {
                Some(c) => c,
                None => parse_hex(&s).map_err(serde::de::Error::custom)?,
            },
            Repr::RgbaObj { r, g, b, a } => Self::rgba(r, g, b, a),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Self::rgb(r, g, b),
                &[r, g, b, a] => Self::rgba(r, g, b, a),
                _ => {
                    return Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ));
                }
            },
        };
        color.validate("color").map_err(serde::de::Error::custom)?;
        Ok(color)
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let Some(s) = s.strip_prefix('#') else {
        return Err(format!("unknown color \"{s}\""));
    };

    fn hex_byte(pair: &str) -> Result<f64, String> {
        u8::from_str_radix(pair, 16)
            .map(|b| f64::from(b) / 255.0)
            .map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be #RRGGBB or #RRGGBBAA".to_owned());
    }
    match s.len() {
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
