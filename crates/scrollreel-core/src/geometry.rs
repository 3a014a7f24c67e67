#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Vertical extent as a span.
    pub fn v_span(&self) -> Span {
        Span::new(self.y, self.h)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// One-dimensional (offset, extent) pair.
///
/// Used for anything that only matters along a single axis: section bounds
/// in page flow, navigation button positions, trigger bands.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub offset: f32,
    pub extent: f32,
}

impl Span {
    pub const ZERO: Span = Span {
        offset: 0.0,
        extent: 0.0,
    };

    pub fn new(offset: f32, extent: f32) -> Self {
        Self {
            offset,
            extent: extent.max(0.0),
        }
    }

    pub fn end(&self) -> f32 {
        self.offset + self.extent
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.offset && v <= self.end()
    }

    /// True when the two spans share any length (touching edges do not count).
    pub fn overlaps(&self, other: &Span) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.extent <= 0.0
    }
}
