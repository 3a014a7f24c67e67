//! Deterministic host loop.
//!
//! One [`Harness::tick`] is one animation frame on a [`ManualClock`]:
//!
//! 1. advance the smooth-scroll animation and report the new page offset,
//! 2. run the frame callback if the engine asked for one,
//! 3. check the trigger band and deliver region-entered notifications,
//! 4. fire due timers,
//! 5. record a snapshot.
//!
//! User input (`scroll_event`, `click_nav`, touches, resizes) happens
//! between frames at the current clock time.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use scrollreel_core::{AnimatedValue, AnimationSpec, Clock, ManualClock, Size, SystemClock};
use scrollreel_engine::{
    BandObserver, ContentSize, Effect, Effects, EngineConfig, ItemList, Result, ScrollBehavior,
    Snapshot, Update, Viewer, VisibilityTracker,
};
use web_time::{Duration, Instant};

use crate::page::SimPage;

pub struct Harness {
    viewer: Viewer,
    page: SimPage,
    clock: ManualClock,
    frame: Duration,
    scroller: AnimatedValue<f32>,
    observer: BandObserver,
    frame_pending: bool,
    scroll_event_pending: bool,
    commits: Rc<RefCell<Vec<usize>>>,
    updates: Rc<Cell<usize>>,
    trace: Vec<Snapshot>,
}

impl Harness {
    /// Starts the manual clock at the current wall-clock time.
    pub fn new(config: EngineConfig, list: ItemList, viewport: Size) -> Self {
        Self::starting_at(config, list, viewport, SystemClock.now())
    }

    pub fn starting_at(config: EngineConfig, list: ItemList, viewport: Size, start: Instant) -> Self {
        let (viewer, fx) = Viewer::mount(config, &list);

        let commits = Rc::new(RefCell::new(Vec::new()));
        let c = commits.clone();
        viewer.on_commit(move |index| c.borrow_mut().push(index));

        let updates = Rc::new(Cell::new(0));
        let u = updates.clone();
        viewer.subscribe(move |_: &Update| u.set(u.get() + 1));

        let mut harness = Self {
            viewer,
            page: SimPage::new(viewport, list.len()),
            clock: ManualClock::new(start),
            frame: config.timings.frame(),
            scroller: AnimatedValue::new(0.0, AnimationSpec::smooth_scroll()),
            observer: BandObserver::new(),
            frame_pending: false,
            scroll_event_pending: false,
            commits,
            updates,
            trace: Vec::new(),
        };
        harness.apply(fx);
        harness.record();
        harness
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn tick(&mut self) {
        let now = self.clock.advance(self.frame);

        if self.scroller.is_animating() {
            self.scroller.update(now);
            self.page.set_offset(*self.scroller.get());
            self.scroll_event_pending = true;
        }
        if std::mem::take(&mut self.scroll_event_pending) {
            let fx = self.viewer.on_scroll(self.page.offset(), now);
            self.apply(fx);
        }
        if std::mem::take(&mut self.frame_pending) {
            let fx = self.viewer.on_frame();
            self.apply(fx);
        }

        self.observe_regions();

        let fx = self.viewer.advance(now);
        self.apply(fx);
        self.record();
    }

    /// Runs frames until at least `duration` has passed.
    pub fn idle(&mut self, duration: Duration) {
        let until = self.clock.now() + duration;
        while self.clock.now() < until {
            self.tick();
        }
    }

    /// One user scroll event at the current time. Interrupts a smooth
    /// scroll in flight.
    pub fn scroll_event(&mut self, offset: f32) {
        let offset = self.page.set_offset(offset);
        self.scroller.snap_to(offset);
        let fx = self.viewer.on_scroll(offset, self.clock.now());
        self.apply(fx);
    }

    /// Scrolls toward `target` by `step` pixels per frame without pausing.
    pub fn scroll_to(&mut self, target: f32, step: f32) {
        let target = self.page.clamp_offset(target);
        let step = step.abs().max(1.0);
        while self.page.offset() != target {
            let current = self.page.offset();
            let next = if target > current {
                (current + step).min(target)
            } else {
                (current - step).max(target)
            };
            self.scroll_event(next);
            self.tick();
        }
    }

    pub fn scroll_by(&mut self, delta: f32, step: f32) {
        self.scroll_to(self.page.offset() + delta, step);
    }

    pub fn touch_start(&mut self) {
        self.viewer.on_touch_start();
    }

    pub fn touch_end(&mut self) {
        self.viewer.on_touch_end(self.clock.now());
    }

    pub fn click_nav(&mut self, index: usize) -> Result<()> {
        let fx = self.viewer.navigate(index, self.clock.now())?;
        self.apply(fx);
        self.record();
        Ok(())
    }

    pub fn navigate_next(&mut self) -> Result<()> {
        let fx = self.viewer.navigate_next(self.clock.now())?;
        self.apply(fx);
        self.record();
        Ok(())
    }

    pub fn navigate_previous(&mut self) -> Result<()> {
        let fx = self.viewer.navigate_previous(self.clock.now())?;
        self.apply(fx);
        self.record();
        Ok(())
    }

    pub fn replace_items(&mut self, list: ItemList) {
        self.page.set_item_count(list.len());
        let fx = self.viewer.set_items(&list, self.clock.now());
        self.apply(fx);
        self.record();
    }

    pub fn resize(&mut self, viewport: Size) {
        self.page.set_viewport(viewport);
        let fx = self.viewer.on_resize();
        self.apply(fx);
        self.record();
    }

    pub fn resize_content(&mut self, index: usize, size: ContentSize) {
        self.page.set_content(index, size);
        let fx = self.viewer.on_content_resized(index, size);
        self.apply(fx);
        self.record();
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn page(&self) -> &SimPage {
        &self.page
    }

    pub fn snapshot(&self) -> Snapshot {
        self.viewer.snapshot()
    }

    pub fn commits(&self) -> Vec<usize> {
        self.commits.borrow().clone()
    }

    /// Number of updates delivered to subscribers so far.
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }

    /// One snapshot after mount, after every frame, and after every
    /// discrete input.
    pub fn trace(&self) -> &[Snapshot] {
        &self.trace
    }

    pub fn history(&self) -> Vec<usize> {
        self.trace.iter().map(|s| s.active_index).collect()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroller.is_animating()
    }

    /// Where the page scroll in flight (or the last one) ends up.
    pub fn scroll_target(&self) -> f32 {
        *self.scroller.target()
    }

    pub fn unmount(self) {
        self.viewer.unmount();
    }

    fn observe_regions(&mut self) {
        let engine = self.viewer.engine();
        let band = VisibilityTracker::trigger_band(&engine.tuning(), self.page.viewport_size().height);
        let entered = self
            .observer
            .observe(engine.geometry(), band, self.page.offset());
        for index in entered {
            let fx = self.viewer.on_region_entered(index);
            self.apply(fx);
        }
    }

    fn apply(&mut self, fx: Effects) {
        self.page.lay_out(self.viewer.section_layout());

        let mut queue: VecDeque<Effect> = fx.into_iter().collect();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::RequestFrame => self.frame_pending = true,
                Effect::ScrollPageTo { offset, behavior } => {
                    let offset = self.page.clamp_offset(offset);
                    match behavior {
                        ScrollBehavior::Smooth => {
                            self.scroller.snap_to(self.page.offset());
                            self.scroller.set_target(offset, self.clock.now());
                        }
                        ScrollBehavior::Instant => {
                            self.scroller.snap_to(offset);
                            self.page.set_offset(offset);
                            self.scroll_event_pending = true;
                        }
                    }
                }
                Effect::SetInnerOffset { index, offset } => {
                    self.page.set_inner_offset(index, offset);
                }
                Effect::MeasureLayout => {
                    let more = self.viewer.measure(&self.page);
                    self.page.lay_out(self.viewer.section_layout());
                    queue.extend(more);
                }
                Effect::Committed { index } => {
                    log::debug!("sim: committed item {index} at page offset {}", self.page.offset());
                }
            }
        }
    }

    fn record(&mut self) {
        let snapshot = self.viewer.snapshot();
        log::trace!("sim: {snapshot:?}");
        self.trace.push(snapshot);
    }
}
