use serde::{Deserialize, Serialize};

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Resizes smaller than a pixel are layout jitter, not a real change.
    pub fn differs_materially(&self, other: Size) -> bool {
        (self.width - other.width).abs() > 1.0 || (self.height - other.height).abs() > 1.0
    }
}

/// Signed displacement of the background from its centered position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn with(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Y => Self { y: value, ..self },
        }
    }

    pub fn lerp(self, to: Offset, t: f64) -> Self {
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Direction the background moves. Left/up decrease the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Up | Self::Down => Axis::Y,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Self::Left | Self::Up => -1.0,
            Self::Right | Self::Down => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Maps `KeyboardEvent.key` values to a direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }
}

/// What kind of background the floor renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Image,
    Video,
}

impl BackgroundMode {
    /// Parses the page's background-type attribute. Unknown values fall back to image.
    pub fn from_attr(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "video" | "youtube" => Self::Video,
            _ => Self::Image,
        }
    }
}

/// Read-only description of the background supplied by the page.
/// In video mode the natural size is the rendered player size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSource {
    pub mode: BackgroundMode,
    pub natural: Size,
}

impl BackgroundSource {
    pub fn image(width: f64, height: f64) -> Self {
        Self {
            mode: BackgroundMode::Image,
            natural: Size::new(width, height),
        }
    }

    pub fn video(width: f64, height: f64) -> Self {
        Self {
            mode: BackgroundMode::Video,
            natural: Size::new(width, height),
        }
    }
}

/// Inclusive pan range along one axis. Always `min <= 0 <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub const FIXED: AxisBounds = AxisBounds { min: 0.0, max: 0.0 };

    pub fn symmetric(reach: f64) -> Self {
        let reach = reach.max(0.0);
        Self {
            min: -reach,
            max: reach,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0_f64.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: AxisBounds,
    pub y: AxisBounds,
}

impl Bounds {
    pub fn along(&self, axis: Axis) -> AxisBounds {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn clamp(&self, offset: Offset) -> Offset {
        Offset {
            x: self.x.clamp(offset.x),
            y: self.y.clamp(offset.y),
        }
    }

    pub fn contains(&self, offset: Offset) -> bool {
        self.x.contains(offset.x) && self.y.contains(offset.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl ScrollDirection {
    pub fn from_axes(x: bool, y: bool) -> Self {
        match (x, y) {
            (false, false) => Self::None,
            (true, false) => Self::Horizontal,
            (false, true) => Self::Vertical,
            (true, true) => Self::Both,
        }
    }

    pub fn includes(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Both, _) | (Self::Horizontal, Axis::X) | (Self::Vertical, Axis::Y)
        )
    }
}
