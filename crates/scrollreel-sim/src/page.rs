//! The simulated document.
//!
//! Page coordinates, top to bottom: a header that scrolls away, then one
//! Section per item. The sticky window covers the whole viewport and holds
//! the active item's inner content box plus a horizontal navigation bar.

use scrollreel_core::{Rect, Size, Span};
use scrollreel_engine::{ContentSize, LayoutProbe};

pub const HEADER_HEIGHT: f32 = 64.0;
pub const CONTENT_VIEWPORT: f32 = 600.0;

const NAV_INSET: f32 = 16.0;
const NAV_BUTTON_WIDTH: f32 = 80.0;
const NAV_GAP: f32 = 16.0;

/// Default inner content: every item a bit longer than the previous one.
pub fn default_content(index: usize) -> ContentSize {
    ContentSize::new(1500.0 + 400.0 * index as f32, CONTENT_VIEWPORT)
}

#[derive(Clone, Debug)]
pub struct SimPage {
    viewport: Size,
    offset: f32,
    sections: Vec<Span>,
    contents: Vec<ContentSize>,
    inner_offsets: Vec<f32>,
}

impl SimPage {
    pub fn new(viewport: Size, item_count: usize) -> Self {
        let mut page = Self {
            viewport,
            offset: 0.0,
            sections: Vec::new(),
            contents: Vec::new(),
            inner_offsets: Vec::new(),
        };
        page.set_item_count(item_count);
        page
    }

    /// New items get default content; removed items drop theirs.
    pub fn set_item_count(&mut self, count: usize) {
        let from = self.contents.len();
        self.contents.truncate(count);
        self.contents.extend((from..count).map(default_content));
        self.inner_offsets.resize(count, 0.0);
    }

    pub fn set_content(&mut self, index: usize, size: ContentSize) {
        if let Some(slot) = self.contents.get_mut(index) {
            *slot = size;
            self.inner_offsets[index] = self.inner_offsets[index].clamp(0.0, size.max_offset());
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.offset = self.clamp_offset(self.offset);
    }

    /// Adopts the Section placeholders the engine asked for.
    pub fn lay_out(&mut self, sections: &[Span]) {
        if self.sections != sections {
            self.sections = sections.to_vec();
            self.offset = self.clamp_offset(self.offset);
        }
    }

    pub fn height(&self) -> f32 {
        self.sections
            .last()
            .map(|s| s.end())
            .unwrap_or(HEADER_HEIGHT)
            .max(HEADER_HEIGHT)
    }

    pub fn max_offset(&self) -> f32 {
        (self.height() - self.viewport.height).max(0.0)
    }

    pub fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scrolls the page; out-of-range offsets are clamped like a browser does.
    pub fn set_offset(&mut self, offset: f32) -> f32 {
        self.offset = self.clamp_offset(offset);
        self.offset
    }

    pub fn inner_offset(&self, index: usize) -> f32 {
        self.inner_offsets.get(index).copied().unwrap_or(0.0)
    }

    pub fn set_inner_offset(&mut self, index: usize, offset: f32) {
        let max = self.content_size(index).max_offset();
        if let Some(slot) = self.inner_offsets.get_mut(index) {
            *slot = offset.clamp(0.0, max);
        }
    }

    pub fn content_size(&self, index: usize) -> ContentSize {
        self.contents.get(index).copied().unwrap_or_default()
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }
}

impl LayoutProbe for SimPage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn sections_origin(&self) -> f32 {
        HEADER_HEIGHT
    }

    fn sticky_window(&self) -> Option<Rect> {
        Some(Rect {
            x: 0.0,
            y: 0.0,
            w: self.viewport.width,
            h: self.viewport.height,
        })
    }

    fn header(&self) -> Option<Rect> {
        Some(Rect {
            x: 0.0,
            y: 0.0,
            w: self.viewport.width,
            h: HEADER_HEIGHT,
        }
        .translate(0.0, -self.offset))
    }

    fn nav_button(&self, index: usize) -> Option<Rect> {
        (index < self.contents.len()).then(|| Rect {
            x: NAV_INSET + index as f32 * (NAV_BUTTON_WIDTH + NAV_GAP),
            y: 8.0,
            w: NAV_BUTTON_WIDTH,
            h: 48.0,
        })
    }

    fn content(&self, index: usize) -> Option<ContentSize> {
        self.contents.get(index).copied()
    }
}
