//! Coordinator for the five components.
//!
//! Every input is a method taking the event data (and `now` where a timer may
//! be armed) and returning the side effects the host has to perform. The
//! engine never reads a clock, never blocks and never calls back into the
//! host; timers are polled through [`Engine::advance`].

use scrollreel_core::{Interpolate, Span, TimerKey, TimerQueue};
use smallvec::SmallVec;
use web_time::Instant;

use crate::config::{DeviceClass, EngineConfig, Tuning};
use crate::error::{EngineError, Result};
use crate::geometry_cache::{ContentSize, GeometryCache, LayoutProbe};
use crate::inner::InnerSync;
use crate::sampler::ScrollSampler;
use crate::state::{EngineState, ItemId, ItemList, ListKey, Phase, ScrollDirection, Snapshot};
use crate::transition::TransitionController;
use crate::visibility::VisibilityTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Side effect requested from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Call [`Engine::on_frame`] on the next animation frame.
    RequestFrame,
    ScrollPageTo { offset: f32, behavior: ScrollBehavior },
    SetInnerOffset { index: usize, offset: f32 },
    /// Call [`Engine::measure`] with a fresh probe.
    MeasureLayout,
    /// The active index changed. Fired exactly once per change.
    Committed { index: usize },
}

pub type Effects = SmallVec<[Effect; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    GeometryDebounce,
    PullDecay,
    GestureEnd,
    Unlock,
}

/// At most one pending timer of each kind.
#[derive(Default)]
struct Timers {
    queue: TimerQueue<TimerKind>,
    geometry: Option<TimerKey>,
    pull_decay: Option<TimerKey>,
    gesture_end: Option<TimerKey>,
    unlock: Option<TimerKey>,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> (&mut TimerQueue<TimerKind>, &mut Option<TimerKey>) {
        let slot = match kind {
            TimerKind::GeometryDebounce => &mut self.geometry,
            TimerKind::PullDecay => &mut self.pull_decay,
            TimerKind::GestureEnd => &mut self.gesture_end,
            TimerKind::Unlock => &mut self.unlock,
        };
        (&mut self.queue, slot)
    }

    /// Arms `kind`, replacing a pending one.
    fn arm(&mut self, kind: TimerKind, at: Instant) {
        let (queue, slot) = self.slot(kind);
        queue.reschedule(slot, at, kind);
    }

    fn cancel(&mut self, kind: TimerKind) {
        let (queue, slot) = self.slot(kind);
        queue.cancel_slot(slot);
    }

    fn pop_due(&mut self, now: Instant) -> Option<TimerKind> {
        let (key, kind) = self.queue.pop_due(now)?;
        let (_, slot) = self.slot(kind);
        if *slot == Some(key) {
            *slot = None;
        }
        Some(kind)
    }
}

pub struct Engine {
    config: EngineConfig,
    class: DeviceClass,
    state: EngineState,
    cache: GeometryCache,
    sampler: ScrollSampler,
    timers: Timers,
    list_key: ListKey,
    ids: Vec<ItemId>,
    measure_requested: bool,
    touch_active: bool,
}

impl Engine {
    /// Mounts an engine over `list`. The returned effects ask for the first
    /// measurement.
    pub fn new(config: EngineConfig, list: &ItemList) -> (Self, Effects) {
        let class = config.policy.classify(0.0);
        let mut engine = Self {
            config,
            class,
            state: EngineState::new(list.len()),
            cache: GeometryCache::new(),
            sampler: ScrollSampler::new(),
            timers: Timers::default(),
            list_key: list.key,
            ids: list.items.iter().map(|i| i.id).collect(),
            measure_requested: false,
            touch_active: false,
        };
        let tuning = engine.tuning();
        engine.cache.rebuild(list.len(), &tuning);

        let mut fx = Effects::new();
        engine.request_measure(&mut fx);
        log::debug!("mount: {} items, {:?}", list.len(), engine.state.status());
        (engine, fx)
    }

    /// Supplies a new or updated item list.
    ///
    /// A new list key resets to the first item. The same key with fewer
    /// items clamps the active index and jumps there. Either way both locks
    /// are released and pending gesture timers dropped, so a transition
    /// interrupted by the change can never leave the engine locked.
    pub fn set_items(&mut self, list: &ItemList, now: Instant) -> Effects {
        let mut fx = Effects::new();
        let identity_changed = list.key != self.list_key;
        let count = list.len();
        let previous = self.state.active_index;

        self.timers.cancel(TimerKind::Unlock);
        self.timers.cancel(TimerKind::GestureEnd);
        self.timers.cancel(TimerKind::PullDecay);
        self.sampler.discard_pending();
        TransitionController::finish_advance(&mut self.state);

        self.list_key = list.key;
        self.ids = list.items.iter().map(|i| i.id).collect();
        self.state.item_count = count;
        let tuning = self.tuning();
        self.cache.rebuild(count, &tuning);
        self.timers.arm(
            TimerKind::GeometryDebounce,
            now + self.config.timings.geometry_debounce(),
        );

        if count == 0 {
            self.state.active_index = 0;
            self.state.scroll_progress = 0.0;
            log::debug!("items: list {:?} is empty", list.key);
            return fx;
        }

        if identity_changed {
            log::debug!("items: new list {:?} with {count} items", list.key);
            self.jump_instant(0, &mut fx);
            if previous == 0 {
                self.reset_inner(ScrollDirection::Down, &mut fx);
            }
        } else if previous >= count {
            log::debug!("items: list shrank to {count}; clamping index {previous}");
            self.request_measure(&mut fx);
            self.jump_instant(count - 1, &mut fx);
        } else {
            self.sampler.resample(&mut self.state, &self.cache);
            self.rederive(&mut fx);
        }
        fx
    }

    /// Raw page scroll notification.
    pub fn on_scroll(&mut self, page_offset: f32, now: Instant) -> Effects {
        let mut fx = Effects::new();
        if self.state.item_count == 0 || self.state.is_programmatic_scroll_locked() {
            return fx;
        }
        if self.sampler.submit(page_offset) {
            fx.push(Effect::RequestFrame);
        }
        let timings = self.config.timings;
        self.timers.arm(TimerKind::PullDecay, now + timings.pull_decay());
        if !self.touch_active {
            self.timers
                .arm(TimerKind::GestureEnd, now + timings.gesture_end());
        }
        fx
    }

    /// Animation-frame callback; samples the latest pending offset.
    pub fn on_frame(&mut self) -> Effects {
        let mut fx = Effects::new();
        let Some(page_offset) = self.sampler.take_pending() else {
            return fx;
        };
        if self.state.item_count == 0
            || !self
                .sampler
                .sample(&mut self.state, &self.cache, page_offset)
        {
            return fx;
        }
        self.rederive(&mut fx);
        fx
    }

    pub fn on_region_entered(&mut self, index: usize) -> Effects {
        let mut fx = Effects::new();
        if let Some(target) = VisibilityTracker::region_entered(&self.state, index) {
            log::debug!(
                "visibility: section {target} entered; active {} -> {target}",
                self.state.active_index
            );
            self.change_active(target, &mut fx);
        }
        fx
    }

    pub fn on_touch_start(&mut self) {
        self.touch_active = true;
        self.timers.cancel(TimerKind::GestureEnd);
    }

    pub fn on_touch_end(&mut self, now: Instant) {
        self.touch_active = false;
        if self.state.item_count > 0 && !self.state.is_locked() {
            self.timers.arm(
                TimerKind::GestureEnd,
                now + self.config.timings.gesture_end(),
            );
        }
    }

    /// Viewport resized. Repeated calls before the host measured collapse
    /// into one request. A jump already in flight keeps its old target.
    pub fn on_resize(&mut self) -> Effects {
        let mut fx = Effects::new();
        self.request_measure(&mut fx);
        fx
    }

    /// The active item's content changed size. The reader keeps their
    /// position inside it; boundary flags and the pull follow the new size.
    pub fn on_content_resized(&mut self, index: usize, size: ContentSize) -> Effects {
        let mut fx = Effects::new();
        self.cache.set_content(index, size);
        if index != self.state.active_index || self.state.item_count == 0 {
            return fx;
        }
        self.refit_inner(&mut fx);
        if !self.state.is_locked() {
            let tuning = self.tuning();
            TransitionController::update_pull(&mut self.state, &tuning);
        }
        fx
    }

    /// Host answer to [`Effect::MeasureLayout`].
    pub fn measure(&mut self, probe: &dyn LayoutProbe) -> Effects {
        let mut fx = Effects::new();
        self.measure_requested = false;

        let class = self.config.policy.classify(probe.viewport().width);
        if class != self.class {
            log::debug!("device class {:?} -> {:?}", self.class, class);
            self.class = class;
        }
        let tuning = self.tuning();
        self.cache.recompute(probe, self.state.item_count, &tuning);

        if self.state.item_count == 0 {
            return fx;
        }
        if self.state.is_locked() {
            self.refit_inner(&mut fx);
        } else {
            self.sampler.resample(&mut self.state, &self.cache);
            self.rederive(&mut fx);
        }
        fx
    }

    /// Explicit navigation: lock, jump, and switch the index right away.
    pub fn navigate(&mut self, target: usize, now: Instant) -> Result<Effects> {
        let len = self.state.item_count;
        if len == 0 {
            return Err(EngineError::EmptyList);
        }
        if target >= len {
            return Err(EngineError::IndexOutOfRange { index: target, len });
        }
        let mut fx = Effects::new();
        self.jump_to(target, now, &mut fx);
        Ok(fx)
    }

    pub fn navigate_next(&mut self, now: Instant) -> Result<Effects> {
        if self.state.item_count == 0 {
            return Err(EngineError::EmptyList);
        }
        if !self.state.has_next() {
            return Err(EngineError::AtEnd);
        }
        self.navigate(self.state.active_index + 1, now)
    }

    pub fn navigate_previous(&mut self, now: Instant) -> Result<Effects> {
        if self.state.item_count == 0 {
            return Err(EngineError::EmptyList);
        }
        let Some(target) = self.state.active_index.checked_sub(1) else {
            return Err(EngineError::AtStart);
        };
        self.navigate(target, now)
    }

    /// Fires every timer due at `now`, earliest first.
    pub fn advance(&mut self, now: Instant) -> Effects {
        let mut fx = Effects::new();
        while let Some(kind) = self.timers.pop_due(now) {
            match kind {
                TimerKind::GeometryDebounce => self.request_measure(&mut fx),
                TimerKind::PullDecay => {
                    TransitionController::decay(&mut self.state);
                }
                TimerKind::GestureEnd => self.gesture_ended(now, &mut fx),
                TimerKind::Unlock => {
                    log::debug!("locks released at item {}", self.state.active_index);
                    TransitionController::finish_advance(&mut self.state);
                }
            }
        }
        fx
    }

    /// When [`Engine::advance`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.queue.next_deadline()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn device_class(&self) -> DeviceClass {
        self.class
    }

    pub fn tuning(&self) -> Tuning {
        *self.config.tuning(self.class)
    }

    pub fn list_key(&self) -> ListKey {
        self.list_key
    }

    pub fn active_item(&self) -> Option<ItemId> {
        self.ids.get(self.state.active_index).copied()
    }

    /// Section placeholders in page coordinates, one per item.
    pub fn section_layout(&self) -> &[Span] {
        self.cache.sections()
    }

    pub fn button_geometry(&self) -> &[Span] {
        self.cache.buttons()
    }

    /// Highlight position: the active button, slid toward the next one by
    /// the pull progress.
    pub fn highlight(&self) -> Span {
        let i = self.state.active_index;
        let from = self.cache.button(i);
        if self.state.transition_progress > 0.0 && self.state.has_next() {
            from.interpolate(&self.cache.button(i + 1), self.state.transition_progress)
        } else {
            from
        }
    }

    pub fn is_measure_requested(&self) -> bool {
        self.measure_requested
    }

    fn request_measure(&mut self, fx: &mut Effects) {
        if !self.measure_requested {
            self.measure_requested = true;
            fx.push(Effect::MeasureLayout);
        }
    }

    fn gesture_ended(&mut self, now: Instant, fx: &mut Effects) {
        if self.state.is_locked() {
            return;
        }
        let tuning = self.tuning();
        if let Some(target) = TransitionController::commit_target(&self.state, &tuning) {
            log::debug!(
                "gesture end at pull {:.2}: advancing to {target}",
                self.state.transition_progress
            );
            self.jump_to(target, now, fx);
        }
    }

    /// Shared by explicit navigation and committed pulls. A jump while
    /// already locked restarts the unlock timer rather than adding one.
    fn jump_to(&mut self, target: usize, now: Instant, fx: &mut Effects) {
        TransitionController::begin_advance(&mut self.state);
        self.sampler.discard_pending();
        self.timers.cancel(TimerKind::GestureEnd);
        self.timers.cancel(TimerKind::PullDecay);
        self.timers
            .arm(TimerKind::Unlock, now + self.config.timings.settle());

        let offset = TransitionController::destination(&self.cache, target, self.config.breathing_room);
        log::debug!(
            "jump: {} -> {target} (page offset {offset}), locked for {}ms",
            self.state.active_index,
            self.config.timings.settle_ms
        );
        fx.push(Effect::ScrollPageTo {
            offset,
            behavior: ScrollBehavior::Smooth,
        });
        self.change_active(target, fx);
    }

    /// Non-animated jump used by list changes. Nothing animates, so no lock
    /// window is opened.
    fn jump_instant(&mut self, target: usize, fx: &mut Effects) {
        let offset = TransitionController::destination(&self.cache, target, self.config.breathing_room);
        fx.push(Effect::ScrollPageTo {
            offset,
            behavior: ScrollBehavior::Instant,
        });
        self.change_active(target, fx);
    }

    fn change_active(&mut self, target: usize, fx: &mut Effects) -> bool {
        let previous = self.state.active_index;
        if target == previous {
            return false;
        }
        let arrival = if target > previous {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };

        self.state.active_index = target;
        self.state.transition_progress = 0.0;
        if self.state.phase != Phase::Advancing {
            self.state.phase = Phase::Idle;
        }
        self.sampler.resample(&mut self.state, &self.cache);
        self.reset_inner(arrival, fx);
        fx.push(Effect::Committed { index: target });
        true
    }

    /// Progress → inner offset → pull, the chain every fresh sample feeds.
    /// A locked engine is mid-jump and keeps its arrival state.
    fn rederive(&mut self, fx: &mut Effects) {
        if self.state.item_count == 0 || self.state.is_locked() {
            return;
        }
        let tuning = self.tuning();
        let index = self.state.active_index;
        let before = self.state.inner_offset;
        let offset = InnerSync::apply(
            &mut self.state,
            self.cache.content(index),
            tuning.speed_ratio,
            self.config.boundary_tolerance,
        );
        if offset != before {
            fx.push(Effect::SetInnerOffset { index, offset });
        }
        TransitionController::update_pull(&mut self.state, &tuning);
    }

    fn reset_inner(&mut self, arrival: ScrollDirection, fx: &mut Effects) {
        let index = self.state.active_index;
        let offset = InnerSync::reset_for_arrival(
            &mut self.state,
            self.cache.content(index),
            arrival,
            self.config.boundary_tolerance,
        );
        fx.push(Effect::SetInnerOffset { index, offset });
    }

    fn refit_inner(&mut self, fx: &mut Effects) {
        let index = self.state.active_index;
        let before = self.state.inner_offset;
        let offset = InnerSync::refit(
            &mut self.state,
            self.cache.content(index),
            self.config.boundary_tolerance,
        );
        if offset != before {
            fx.push(Effect::SetInnerOffset { index, offset });
        }
    }
}
