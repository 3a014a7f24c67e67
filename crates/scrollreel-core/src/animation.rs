use web_time::{Duration, Instant};

use crate::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Quadratic in, quadratic out.
    EaseInOut,
}

impl Easing {
    /// Maps linear time `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut if t < 0.5 => 2.0 * t * t,
            Easing::EaseInOut => {
                let u = 1.0 - t;
                1.0 - 2.0 * u * u
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Roughly what a browser smooth scroll takes across a few screens.
    pub fn smooth_scroll() -> Self {
        Self::tween(Duration::from_millis(500), Easing::EaseInOut)
    }
}

/// Linear blend between two values of the same type.
pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Span {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Span {
            offset: self.offset.interpolate(&other.offset, t),
            extent: self.extent.interpolate(&other.extent, t),
        }
    }
}

/// Source of "now" for hosts that drive the engine.
///
/// Nothing in the engine reads a clock itself; hosts pick one and pass the
/// instants along with every event.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you advance by hand. Used by the simulator and tests.
#[derive(Clone, Debug)]
pub struct ManualClock {
    t: Instant,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self { t: start }
    }

    pub fn advance(&mut self, by: Duration) -> Instant {
        self.t += by;
        self.t
    }

    /// Moves the clock to `t`. Never goes backwards.
    pub fn set(&mut self, t: Instant) {
        self.t = self.t.max(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t
    }
}

/// A value tweening toward a target, sampled at caller-supplied instants.
pub struct AnimatedValue<T: Interpolate + Clone> {
    spec: AnimationSpec,
    from: T,
    to: T,
    value: T,
    started: Option<Instant>,
}

impl<T: Interpolate + Clone> AnimatedValue<T> {
    pub fn new(initial: T, spec: AnimationSpec) -> Self {
        Self {
            spec,
            from: initial.clone(),
            to: initial.clone(),
            value: initial,
            started: None,
        }
    }

    /// Starts (or restarts) a tween from the current value toward `target`.
    pub fn set_target(&mut self, target: T, now: Instant) {
        self.from = self.value.clone();
        self.to = target;
        self.started = Some(now);
    }

    /// Jumps straight to `value`, dropping any tween in flight.
    pub fn snap_to(&mut self, value: T) {
        self.from = value.clone();
        self.to = value.clone();
        self.value = value;
        self.started = None;
    }

    /// Samples the tween at `now`. Returns `true` while still running.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.spec.duration {
            self.value = self.to.clone();
            self.started = None;
            return false;
        }
        let t = elapsed.as_secs_f32() / self.spec.duration.as_secs_f32();
        self.value = self.from.interpolate(&self.to, self.spec.easing.apply(t));
        true
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    pub fn is_animating(&self) -> bool {
        self.started.is_some()
    }
}
