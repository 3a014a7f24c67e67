//! Outer progress → offset inside the active item's own scroll box.

use crate::geometry_cache::ContentSize;
use crate::state::{EngineState, ScrollDirection};

pub struct InnerSync;

impl InnerSync {
    /// Maps `scroll_progress` onto the content box and refreshes the
    /// boundary flags. Returns the offset to apply.
    ///
    /// With a speed ratio below 1 the inner content is fully traversed
    /// before the outer section runs out.
    pub fn apply(
        state: &mut EngineState,
        content: ContentSize,
        speed_ratio: f32,
        tolerance: f32,
    ) -> f32 {
        let adjusted = if speed_ratio > 0.0 {
            (state.scroll_progress / speed_ratio).min(1.0)
        } else {
            1.0
        };
        let max = content.max_offset();
        state.inner_offset = adjusted * max;
        Self::update_bounds(state, max, tolerance);
        state.inner_offset
    }

    /// Places a newly active item's content at the edge nearest to where the
    /// user came from: the top when moving forward, the end when moving back.
    pub fn reset_for_arrival(
        state: &mut EngineState,
        content: ContentSize,
        arrival: ScrollDirection,
        tolerance: f32,
    ) -> f32 {
        let max = content.max_offset();
        state.inner_offset = match arrival {
            ScrollDirection::Down => 0.0,
            ScrollDirection::Up => max,
        };
        Self::update_bounds(state, max, tolerance);
        state.inner_offset
    }

    /// Re-clamps the current offset after the content was re-measured.
    pub fn refit(state: &mut EngineState, content: ContentSize, tolerance: f32) -> f32 {
        let max = content.max_offset();
        state.inner_offset = state.inner_offset.clamp(0.0, max);
        Self::update_bounds(state, max, tolerance);
        state.inner_offset
    }

    fn update_bounds(state: &mut EngineState, max: f32, tolerance: f32) {
        state.is_at_top = state.inner_offset <= tolerance;
        state.is_at_bottom = state.inner_offset >= max - tolerance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 5.0;

    fn content() -> ContentSize {
        ContentSize::new(1600.0, 600.0)
    }

    #[test]
    fn speed_ratio_finishes_inner_scroll_early() {
        let mut state = EngineState::new(3);
        state.scroll_progress = 0.3;
        let off = InnerSync::apply(&mut state, content(), 0.6, TOL);
        assert!((off - 500.0).abs() < 1e-3);
        assert!(!state.is_at_top() && !state.is_at_bottom());

        state.scroll_progress = 0.6;
        assert!((InnerSync::apply(&mut state, content(), 0.6, TOL) - 1000.0).abs() < 1e-3);
        assert!(state.is_at_bottom());

        state.scroll_progress = 0.9;
        assert!((InnerSync::apply(&mut state, content(), 0.6, TOL) - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn tolerance_absorbs_sub_pixel_misses() {
        let mut state = EngineState::new(1);
        state.scroll_progress = 0.598;
        InnerSync::apply(&mut state, content(), 0.6, TOL);
        assert!(state.is_at_bottom());

        state.scroll_progress = 0.002;
        InnerSync::apply(&mut state, content(), 0.6, TOL);
        assert!(state.is_at_top());
    }

    #[test]
    fn short_content_is_both_top_and_bottom() {
        let mut state = EngineState::new(1);
        state.scroll_progress = 0.4;
        InnerSync::apply(&mut state, ContentSize::new(300.0, 600.0), 0.6, TOL);
        assert!(state.is_at_top());
        assert!(state.is_at_bottom());
    }

    #[test]
    fn arrival_direction_picks_the_edge() {
        let mut state = EngineState::new(3);
        InnerSync::reset_for_arrival(&mut state, content(), ScrollDirection::Down, TOL);
        assert!(state.is_at_top());
        assert!(!state.is_at_bottom());

        let off = InnerSync::reset_for_arrival(&mut state, content(), ScrollDirection::Up, TOL);
        assert_eq!(off, 1000.0);
        assert!(state.is_at_bottom());
        assert!(!state.is_at_top());
    }

    #[test]
    fn refit_clamps_to_shrunk_content() {
        let mut state = EngineState::new(1);
        InnerSync::reset_for_arrival(&mut state, content(), ScrollDirection::Up, TOL);
        let off = InnerSync::refit(&mut state, ContentSize::new(900.0, 600.0), TOL);
        assert_eq!(off, 300.0);
        assert!(state.is_at_bottom());
    }
}
