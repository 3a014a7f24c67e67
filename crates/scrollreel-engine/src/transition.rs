//! Idle → Pulling → Advancing.
//!
//! Pulling is entered whenever the inner content sits at its bottom and a
//! next item exists. Pull progress only grows while the user keeps scrolling
//! down through the trailing zone of the section. A gesture end above the
//! commit threshold turns into the same programmatic jump explicit
//! navigation uses; the lock-release timer brings the machine back to Idle.

use crate::config::Tuning;
use crate::geometry_cache::GeometryCache;
use crate::state::{EngineState, Phase, ScrollDirection};

pub struct TransitionController;

impl TransitionController {
    /// Runs after every sample. Returns `true` if phase or pull progress
    /// changed.
    pub fn update_pull(state: &mut EngineState, tuning: &Tuning) -> bool {
        if state.phase == Phase::Advancing {
            return false;
        }
        let before = (state.phase, state.transition_progress);

        if state.is_at_bottom && state.has_next() {
            state.phase = Phase::Pulling;
            state.transition_progress = if state.scroll_direction == ScrollDirection::Down {
                pull_progress(state.scroll_progress, tuning)
            } else {
                0.0
            };
        } else {
            state.phase = Phase::Idle;
            state.transition_progress = 0.0;
        }

        if state.phase != before.0 {
            log::debug!("transition: {:?} -> {:?}", before.0, state.phase);
        }
        (state.phase, state.transition_progress) != before
    }

    /// The raw scroll signal went quiet: drop any preview.
    pub fn decay(state: &mut EngineState) -> bool {
        if state.phase == Phase::Advancing {
            return false;
        }
        let changed = state.transition_progress != 0.0 || state.phase == Phase::Pulling;
        if changed {
            log::trace!("transition: pull decayed at {:.3}", state.transition_progress);
        }
        state.transition_progress = 0.0;
        state.phase = Phase::Idle;
        changed
    }

    /// Target index if a gesture ending now should advance.
    pub fn commit_target(state: &EngineState, tuning: &Tuning) -> Option<usize> {
        if state.phase != Phase::Pulling || !state.has_next() {
            return None;
        }
        (state.transition_progress > tuning.commit_threshold).then_some(state.active_index + 1)
    }

    pub fn begin_advance(state: &mut EngineState) {
        state.set_locks(true);
        state.phase = Phase::Advancing;
        state.transition_progress = 0.0;
    }

    pub fn finish_advance(state: &mut EngineState) {
        state.set_locks(false);
        state.transition_progress = 0.0;
        state.phase = Phase::Idle;
    }

    /// Absolute page offset a jump to `index` scrolls to.
    pub fn destination(cache: &GeometryCache, index: usize, breathing_room: f32) -> f32 {
        (cache.section(index).offset - breathing_room).max(0.0)
    }
}

fn pull_progress(scroll_progress: f32, tuning: &Tuning) -> f32 {
    if tuning.pull_length <= 0.0 {
        return if scroll_progress >= tuning.pull_start { 1.0 } else { 0.0 };
    }
    ((scroll_progress - tuning.pull_start) / tuning.pull_length).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulling_state(progress: f32) -> EngineState {
        let mut state = EngineState::new(3);
        state.is_at_bottom = true;
        state.scroll_progress = progress;
        state
    }

    #[test]
    fn pull_progress_maps_the_trailing_zone() {
        let tuning = Tuning::pointer();
        let mut state = pulling_state(0.7);
        assert!(TransitionController::update_pull(&mut state, &tuning));
        assert_eq!(state.phase(), Phase::Pulling);
        assert!((state.transition_progress() - 0.5).abs() < 1e-4);

        state.scroll_progress = 0.95;
        TransitionController::update_pull(&mut state, &tuning);
        assert_eq!(state.transition_progress(), 1.0);

        state.scroll_progress = 0.3;
        TransitionController::update_pull(&mut state, &tuning);
        assert_eq!(state.transition_progress(), 0.0);
        assert_eq!(state.phase(), Phase::Pulling);
    }

    #[test]
    fn scrolling_up_never_pulls() {
        let tuning = Tuning::touch();
        let mut state = pulling_state(0.9);
        state.scroll_direction = ScrollDirection::Up;
        TransitionController::update_pull(&mut state, &tuning);
        assert_eq!(state.phase(), Phase::Pulling);
        assert_eq!(state.transition_progress(), 0.0);
    }

    #[test]
    fn last_item_cannot_pull() {
        let tuning = Tuning::pointer();
        let mut state = pulling_state(0.9);
        state.active_index = 2;
        TransitionController::update_pull(&mut state, &tuning);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.transition_progress(), 0.0);
        assert_eq!(TransitionController::commit_target(&state, &tuning), None);
    }

    #[test]
    fn commit_threshold_depends_on_device() {
        let mut state = pulling_state(0.5 + 0.3 * 0.4);
        TransitionController::update_pull(&mut state, &Tuning::touch());
        assert_eq!(TransitionController::commit_target(&state, &Tuning::touch()), Some(1));

        let mut state = pulling_state(0.6 + 0.2 * 0.4);
        TransitionController::update_pull(&mut state, &Tuning::pointer());
        assert_eq!(TransitionController::commit_target(&state, &Tuning::pointer()), None);
    }

    #[test]
    fn advancing_ignores_samples_and_decay() {
        let tuning = Tuning::pointer();
        let mut state = pulling_state(0.9);
        TransitionController::begin_advance(&mut state);
        assert!(state.is_programmatic_scroll_locked() && state.is_visibility_locked());
        assert!(!TransitionController::update_pull(&mut state, &tuning));
        assert!(!TransitionController::decay(&mut state));
        assert_eq!(state.phase(), Phase::Advancing);

        TransitionController::finish_advance(&mut state);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_programmatic_scroll_locked() && !state.is_visibility_locked());
    }

    #[test]
    fn decay_resets_preview() {
        let tuning = Tuning::touch();
        let mut state = pulling_state(0.77);
        TransitionController::update_pull(&mut state, &tuning);
        assert!(state.transition_progress() > 0.8);
        assert!(TransitionController::decay(&mut state));
        assert_eq!(state.transition_progress(), 0.0);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!TransitionController::decay(&mut state));
    }
}
