//! Page scroll → progress through the active section.

use crate::geometry_cache::GeometryCache;
use crate::state::{EngineState, ScrollDirection};

/// Frame-coalesced sampler.
///
/// Raw scroll offsets go into a single pending slot; a newer offset replaces
/// an older one that has not been sampled yet, so a burst of events costs at
/// most one sample per animation frame.
#[derive(Clone, Debug, Default)]
pub struct ScrollSampler {
    pending: Option<f32>,
    frame_requested: bool,
    last_offset: Option<f32>,
}

impl ScrollSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `offset` as the pending sample. Returns `true` when the host
    /// has to be asked for a frame.
    pub fn submit(&mut self, offset: f32) -> bool {
        self.pending = Some(offset);
        !std::mem::replace(&mut self.frame_requested, true)
    }

    pub fn take_pending(&mut self) -> Option<f32> {
        self.frame_requested = false;
        self.pending.take()
    }

    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    pub fn last_offset(&self) -> Option<f32> {
        self.last_offset
    }

    /// One sampling pass. Does nothing while the programmatic scroll lock is
    /// held and returns whether a sample was taken.
    pub fn sample(&mut self, state: &mut EngineState, cache: &GeometryCache, page_offset: f32) -> bool {
        if state.is_programmatic_scroll_locked() {
            return false;
        }

        if let Some(prev) = self.last_offset {
            if page_offset > prev {
                state.scroll_direction = ScrollDirection::Down;
            } else if page_offset < prev {
                state.scroll_direction = ScrollDirection::Up;
            }
        }
        self.last_offset = Some(page_offset);

        state.scroll_progress = progress_at(state.active_index(), cache, page_offset);
        log::trace!(
            "sample: offset {page_offset}, item {} progress {:.3} {:?}",
            state.active_index(),
            state.scroll_progress,
            state.scroll_direction
        );
        true
    }

    /// Recomputes progress for the current active index from the last seen
    /// offset, without touching direction. Keeps progress consistent with a
    /// freshly changed index.
    pub fn resample(&self, state: &mut EngineState, cache: &GeometryCache) {
        state.scroll_progress = match self.last_offset {
            Some(offset) => progress_at(state.active_index(), cache, offset),
            None => 0.0,
        };
    }
}

fn progress_at(index: usize, cache: &GeometryCache, page_offset: f32) -> f32 {
    let section = cache.section(index);
    if section.extent <= 0.0 {
        if cfg!(debug_assertions) {
            log::warn!("sample: section {index} has zero height; holding progress at 0");
        }
        return 0.0;
    }
    let window_top = page_offset + cache.window_top();
    let relative = window_top - section.offset;
    (relative / section.extent).clamp(0.0, 1.0)
}
