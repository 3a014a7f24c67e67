//! Coarse "which section is on screen" signal.
//!
//! Hosts deliver region-entered notifications from whatever intersection
//! facility they have. [`BandObserver`] is the fallback: a plain
//! bounding-box check against the trigger band, run once per frame.

use scrollreel_core::Span;
use smallvec::SmallVec;

use crate::config::Tuning;
use crate::geometry_cache::GeometryCache;
use crate::state::EngineState;

pub struct VisibilityTracker;

impl VisibilityTracker {
    /// Trigger band in viewport coordinates for the given tuning.
    pub fn trigger_band(tuning: &Tuning, viewport_height: f32) -> Span {
        tuning.band.resolve(viewport_height)
    }

    /// Returns the new active index when the notification is accepted.
    ///
    /// Locked notifications are dropped, not queued.
    pub fn region_entered(state: &EngineState, index: usize) -> Option<usize> {
        if state.is_visibility_locked() {
            log::trace!("visibility: section {index} entered while locked; dropped");
            return None;
        }
        if index >= state.item_count() || index == state.active_index() {
            return None;
        }
        Some(index)
    }
}

/// Tracks which sections currently intersect the trigger band and reports
/// the ones that just started to.
#[derive(Clone, Debug, Default)]
pub struct BandObserver {
    intersecting: Vec<bool>,
}

impl BandObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; the next `observe` reports every section already
    /// inside the band.
    pub fn reset(&mut self, section_count: usize) {
        self.intersecting.clear();
        self.intersecting.resize(section_count, false);
    }

    /// `band` is in viewport coordinates, sections in page coordinates.
    pub fn observe(
        &mut self,
        cache: &GeometryCache,
        band: Span,
        page_offset: f32,
    ) -> SmallVec<[usize; 2]> {
        let sections = cache.sections();
        if self.intersecting.len() != sections.len() {
            self.reset(sections.len());
        }

        let band_in_page = Span::new(band.offset + page_offset, band.extent);
        let mut entered = SmallVec::new();
        for (i, section) in sections.iter().enumerate() {
            let now = !section.is_empty() && section.overlaps(&band_in_page);
            if now && !self.intersecting[i] {
                entered.push(i);
            }
            self.intersecting[i] = now;
        }
        entered
    }
}
