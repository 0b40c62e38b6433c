/// A point in display or source-pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// True when either side is non-positive or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Where a source image sits inside its container after aspect-preserving fitting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMetrics {
    /// Container the image was fitted into.
    pub container: Size,
    /// Size of the letterboxed/pillarboxed image.
    pub display_size: Size,
    /// Top-left of the displayed image inside the container.
    pub display_offset: Point,
}

impl DisplayMetrics {
    pub fn left(&self) -> f64 {
        self.display_offset.x
    }

    pub fn top(&self) -> f64 {
        self.display_offset.y
    }

    pub fn right(&self) -> f64 {
        self.display_offset.x + self.display_size.width
    }

    pub fn bottom(&self) -> f64 {
        self.display_offset.y + self.display_size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.display_offset.x + self.display_size.width / 2.0,
            self.display_offset.y + self.display_size.height / 2.0,
        )
    }

    /// Whether `rect` lies inside the displayed image, with `tolerance` slack on every side.
    pub fn contains(&self, rect: &CropRectangle, tolerance: f64) -> bool {
        rect.x >= self.left() - tolerance
            && rect.y >= self.top() - tolerance
            && rect.right() <= self.right() + tolerance
            && rect.bottom() <= self.bottom() + tolerance
    }
}

/// The square crop selection, in display space. Its inscribed circle is the crop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `side` centered on `center`.
    pub fn from_center(center: Point, side: f64) -> Self {
        Self::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Zero-area or non-finite rectangles cannot be rendered.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// An axis-aligned rectangle that need not be square, e.g. a crop mapped into source pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

impl From<CropRectangle> for Rect {
    fn from(r: CropRectangle) -> Self {
        Rect::new(r.x, r.y, r.width, r.height)
    }
}
