//! Single owner of an [`Engine`] for one mounted viewer.
//!
//! The viewer forwards host events, publishes a fresh [`Snapshot`] whenever
//! something observable changed, and fans commit signals out to
//! subscribers. The viewer's [`Scope`] clears both signals on unmount, so
//! every subscription still held at that point is dropped at once.

use bitflags::bitflags;
use scrollreel_core::{Scope, Signal, Span, SubId, signal};
use web_time::Instant;

use crate::config::EngineConfig;
use crate::engine::{Effect, Effects, Engine};
use crate::error::Result;
use crate::geometry_cache::{ContentSize, LayoutProbe};
use crate::state::{ItemList, Snapshot};

bitflags! {
    /// Which output groups changed since the previous publish.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Changed: u16 {
        const STATUS = 1 << 0;
        const ACTIVE = 1 << 1;
        const PROGRESS = 1 << 2;
        const TRANSITION = 1 << 3;
        const DIRECTION = 1 << 4;
        const BOUNDARY = 1 << 5;
        const LOCKS = 1 << 6;
        const GEOMETRY = 1 << 7;
    }
}

impl Changed {
    pub fn between(old: &Snapshot, new: &Snapshot) -> Changed {
        let mut c = Changed::empty();
        c.set(Changed::STATUS, old.status != new.status || old.item_count != new.item_count);
        c.set(Changed::ACTIVE, old.active_index != new.active_index);
        c.set(
            Changed::PROGRESS,
            old.scroll_progress != new.scroll_progress || old.inner_offset != new.inner_offset,
        );
        c.set(
            Changed::TRANSITION,
            old.transition_progress != new.transition_progress || old.phase != new.phase,
        );
        c.set(Changed::DIRECTION, old.scroll_direction != new.scroll_direction);
        c.set(
            Changed::BOUNDARY,
            old.is_at_top != new.is_at_top || old.is_at_bottom != new.is_at_bottom,
        );
        c.set(
            Changed::LOCKS,
            old.is_programmatic_scroll_locked != new.is_programmatic_scroll_locked
                || old.is_visibility_locked != new.is_visibility_locked,
        );
        c
    }
}

/// Handle for [`Viewer::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscription {
    Updates(SubId),
    Commits(SubId),
}

/// What subscribers receive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Update {
    pub snapshot: Snapshot,
    pub changed: Changed,
}

pub struct Viewer {
    engine: Engine,
    updates: Signal<Update>,
    commits: Signal<Option<usize>>,
    scope: Scope,
    geometry_generation: u64,
}

impl Viewer {
    pub fn mount(config: EngineConfig, list: &ItemList) -> (Self, Effects) {
        let (engine, fx) = Engine::new(config, list);
        let snapshot = engine.snapshot();
        let viewer = Self {
            geometry_generation: engine.geometry().generation(),
            engine,
            updates: signal(Update {
                snapshot,
                changed: Changed::all(),
            }),
            commits: signal(None),
            scope: Scope::new(),
        };
        let updates = viewer.updates.clone();
        let commits = viewer.commits.clone();
        viewer.scope.add_disposer(move || {
            updates.clear_subscribers();
            commits.clear_subscribers();
        });
        (viewer, fx)
    }

    /// Subscribes to state changes. The subscription lives until
    /// [`Viewer::unsubscribe`] or [`Viewer::unmount`].
    pub fn subscribe(&self, f: impl Fn(&Update) + 'static) -> Subscription {
        Subscription::Updates(self.updates.subscribe(f))
    }

    /// Subscribes to the commit signal.
    pub fn on_commit(&self, f: impl Fn(usize) + 'static) -> Subscription {
        let id = self.commits.subscribe(move |c| {
            if let Some(index) = *c {
                f(index);
            }
        });
        Subscription::Commits(id)
    }

    pub fn unsubscribe(&self, sub: Subscription) -> bool {
        match sub {
            Subscription::Updates(id) => self.updates.unsubscribe(id),
            Subscription::Commits(id) => self.commits.unsubscribe(id),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.subscriber_count() + self.commits.subscriber_count()
    }

    /// Tears the viewer down; every subscription is dropped.
    pub fn unmount(self) {
        log::debug!("unmount at item {}", self.engine.state().active_index());
        self.scope.dispose();
    }

    pub fn set_items(&mut self, list: &ItemList, now: Instant) -> Effects {
        let fx = self.engine.set_items(list, now);
        self.publish(fx)
    }

    pub fn on_scroll(&mut self, page_offset: f32, now: Instant) -> Effects {
        let fx = self.engine.on_scroll(page_offset, now);
        self.publish(fx)
    }

    pub fn on_frame(&mut self) -> Effects {
        let fx = self.engine.on_frame();
        self.publish(fx)
    }

    pub fn on_region_entered(&mut self, index: usize) -> Effects {
        let fx = self.engine.on_region_entered(index);
        self.publish(fx)
    }

    pub fn on_touch_start(&mut self) {
        self.engine.on_touch_start();
    }

    pub fn on_touch_end(&mut self, now: Instant) {
        self.engine.on_touch_end(now);
    }

    pub fn on_resize(&mut self) -> Effects {
        let fx = self.engine.on_resize();
        self.publish(fx)
    }

    pub fn on_content_resized(&mut self, index: usize, size: ContentSize) -> Effects {
        let fx = self.engine.on_content_resized(index, size);
        self.publish(fx)
    }

    pub fn measure(&mut self, probe: &dyn LayoutProbe) -> Effects {
        let fx = self.engine.measure(probe);
        self.publish(fx)
    }

    pub fn navigate(&mut self, index: usize, now: Instant) -> Result<Effects> {
        let fx = self.engine.navigate(index, now)?;
        Ok(self.publish(fx))
    }

    pub fn navigate_next(&mut self, now: Instant) -> Result<Effects> {
        let fx = self.engine.navigate_next(now)?;
        Ok(self.publish(fx))
    }

    pub fn navigate_previous(&mut self, now: Instant) -> Result<Effects> {
        let fx = self.engine.navigate_previous(now)?;
        Ok(self.publish(fx))
    }

    pub fn advance(&mut self, now: Instant) -> Effects {
        let fx = self.engine.advance(now);
        self.publish(fx)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn highlight(&self) -> Span {
        self.engine.highlight()
    }

    pub fn section_layout(&self) -> &[Span] {
        self.engine.section_layout()
    }

    /// Fires commit subscribers, then publishes one update if anything
    /// observable moved. Effects pass through untouched.
    fn publish(&mut self, fx: Effects) -> Effects {
        for effect in &fx {
            if let Effect::Committed { index } = *effect {
                self.commits.set(Some(index));
            }
        }

        let snapshot = self.engine.snapshot();
        let previous = self.updates.with(|u| u.snapshot);
        let mut changed = Changed::between(&previous, &snapshot);

        let generation = self.engine.geometry().generation();
        if generation != self.geometry_generation {
            self.geometry_generation = generation;
            changed |= Changed::GEOMETRY;
        }

        if !changed.is_empty() {
            self.updates.set(Update { snapshot, changed });
        }
        fx
    }
}
