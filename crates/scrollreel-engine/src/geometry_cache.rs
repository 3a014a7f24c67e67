//! Measured layout, cached between recomputations.
//!
//! The host owns the real layout and answers through [`LayoutProbe`]. Anything
//! it cannot measure yet (an element that has not been laid out) is recorded
//! as zero size and corrected by the next recompute.

use scrollreel_core::{Rect, Size, Span};

use crate::config::Tuning;

/// Scroll metrics of one item's inner content box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentSize {
    /// Full height of the content.
    pub scroll_height: f32,
    /// Visible height of the box.
    pub viewport_height: f32,
}

impl ContentSize {
    pub fn new(scroll_height: f32, viewport_height: f32) -> Self {
        Self {
            scroll_height,
            viewport_height,
        }
    }

    pub fn max_offset(&self) -> f32 {
        (self.scroll_height - self.viewport_height).max(0.0)
    }
}

/// Read access to the host's current layout.
///
/// `sticky_window` and `header` are in viewport coordinates, navigation
/// buttons in their own bar's coordinates. `sections_origin` is the page
/// offset at which the first Section starts.
pub trait LayoutProbe {
    fn viewport(&self) -> Size;
    fn sections_origin(&self) -> f32;
    fn sticky_window(&self) -> Option<Rect>;
    fn header(&self) -> Option<Rect>;
    fn nav_button(&self, index: usize) -> Option<Rect>;
    fn content(&self, index: usize) -> Option<ContentSize>;
}

#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    viewport: Size,
    window_top: f32,
    window_height: f32,
    header_height: f32,
    origin: f32,
    section_height: f32,
    sections: Vec<Span>,
    buttons: Vec<Span>,
    contents: Vec<ContentSize>,
    generation: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self, probe: &dyn LayoutProbe, item_count: usize, tuning: &Tuning) {
        self.viewport = probe.viewport();
        self.origin = probe.sections_origin();

        let window = probe.sticky_window().unwrap_or_default();
        self.window_top = window.y;
        self.window_height = window.h;
        self.header_height = probe.header().map(|r| r.h).unwrap_or(0.0);

        // Buttons sit in a horizontal bar; the highlight moves along x.
        self.buttons = (0..item_count)
            .map(|i| {
                probe
                    .nav_button(i)
                    .map(|r| Span::new(r.x, r.w))
                    .unwrap_or(Span::ZERO)
            })
            .collect();
        self.contents = (0..item_count)
            .map(|i| probe.content(i).unwrap_or_default())
            .collect();

        self.layout_sections(item_count, tuning);
        self.generation += 1;

        log::debug!(
            "geometry: viewport {:?}, window top {}, {} sections of {}px",
            self.viewport,
            self.window_top,
            item_count,
            self.section_height
        );
    }

    /// Re-creates one Section per item from the last measured viewport and
    /// trims or pads the per-item caches. Used when the list changes before
    /// a fresh measurement is available.
    pub fn rebuild(&mut self, item_count: usize, tuning: &Tuning) {
        self.buttons.resize(item_count, Span::ZERO);
        self.contents.resize(item_count, ContentSize::default());
        self.layout_sections(item_count, tuning);
        self.generation += 1;
    }

    fn layout_sections(&mut self, item_count: usize, tuning: &Tuning) {
        self.section_height = (tuning.section_viewports * self.viewport.height).max(0.0);
        let h = self.section_height;
        let origin = self.origin;
        self.sections = (0..item_count)
            .map(|i| Span::new(origin + i as f32 * h, h))
            .collect();
    }

    pub fn set_content(&mut self, index: usize, size: ContentSize) {
        if let Some(slot) = self.contents.get_mut(index) {
            *slot = size;
            self.generation += 1;
        }
    }

    pub fn section(&self, index: usize) -> Span {
        self.sections.get(index).copied().unwrap_or(Span::ZERO)
    }

    pub fn sections(&self) -> &[Span] {
        &self.sections
    }

    pub fn button(&self, index: usize) -> Span {
        self.buttons.get(index).copied().unwrap_or(Span::ZERO)
    }

    pub fn buttons(&self) -> &[Span] {
        &self.buttons
    }

    pub fn content(&self, index: usize) -> ContentSize {
        self.contents.get(index).copied().unwrap_or_default()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sticky window top, viewport coordinates.
    pub fn window_top(&self) -> f32 {
        self.window_top
    }

    pub fn window_height(&self) -> f32 {
        self.window_height
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn section_height(&self) -> f32 {
        self.section_height
    }

    /// Bumped on every change; lets observers tell stale geometry apart.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
