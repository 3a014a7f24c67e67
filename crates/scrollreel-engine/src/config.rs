//! Engine tuning.
//!
//! Touch sessions get taller sections, a lower speed ratio, an earlier and
//! wider pull zone, and a lower commit bar than pointer sessions. Which class
//! a session belongs to is decided by a [`DevicePolicy`], never by hard-coded
//! viewport checks in the engine itself.

use scrollreel_core::Span;
use web_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defaults taken from the behaviour the engine was tuned against.
pub mod defaults {
    /// Viewport widths at or below this count as touch under the legacy policy.
    pub const TOUCH_BREAKPOINT_PX: f32 = 768.0;
    /// Slack for the inner box top/bottom flags; absorbs sub-pixel rounding.
    pub const BOUNDARY_TOLERANCE_PX: f32 = 5.0;
    /// Programmatic jumps land this far above the target section.
    pub const BREATHING_ROOM_PX: f32 = 10.0;

    pub const GEOMETRY_DEBOUNCE_MS: u64 = 100;
    pub const PULL_DECAY_MS: u64 = 150;
    pub const GESTURE_END_MS: u64 = 100;
    /// Must exceed the host's smooth-scroll duration.
    pub const SETTLE_MS: u64 = 800;
    pub const FRAME_MS: u64 = 16;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum DeviceClass {
    Touch,
    Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum DevicePolicy {
    /// The host knows the input type.
    Fixed(DeviceClass),
    /// Viewport-width proxy: narrow viewports are treated as touch.
    WidthBreakpoint { max_touch_width: f32 },
}

impl Default for DevicePolicy {
    fn default() -> Self {
        DevicePolicy::WidthBreakpoint {
            max_touch_width: defaults::TOUCH_BREAKPOINT_PX,
        }
    }
}

impl DevicePolicy {
    pub fn classify(&self, viewport_width: f32) -> DeviceClass {
        match *self {
            DevicePolicy::Fixed(class) => class,
            DevicePolicy::WidthBreakpoint { max_touch_width } => {
                if viewport_width > 0.0 && viewport_width <= max_touch_width {
                    DeviceClass::Touch
                } else {
                    DeviceClass::Pointer
                }
            }
        }
    }
}

/// Visibility trigger band as fractions of the viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriggerBand {
    pub start: f32,
    pub end: f32,
}

impl TriggerBand {
    /// Band in viewport coordinates.
    pub fn resolve(&self, viewport_height: f32) -> Span {
        let start = self.start.clamp(0.0, 1.0);
        let end = self.end.clamp(start, 1.0);
        Span::new(start * viewport_height, (end - start) * viewport_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tuning {
    /// Section height in multiples of the viewport height.
    pub section_viewports: f32,
    /// Outer progress at which the inner content reaches its end.
    pub speed_ratio: f32,
    pub pull_start: f32,
    pub pull_length: f32,
    /// Pull progress that must be exceeded at gesture end to advance.
    pub commit_threshold: f32,
    pub band: TriggerBand,
}

impl Tuning {
    pub fn touch() -> Self {
        Self {
            section_viewports: 4.0,
            speed_ratio: 0.5,
            pull_start: 0.5,
            pull_length: 0.3,
            commit_threshold: 0.3,
            band: TriggerBand {
                start: 0.15,
                end: 0.35,
            },
        }
    }

    pub fn pointer() -> Self {
        Self {
            section_viewports: 3.0,
            speed_ratio: 0.6,
            pull_start: 0.6,
            pull_length: 0.2,
            commit_threshold: 0.5,
            band: TriggerBand {
                start: 0.4,
                end: 0.6,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timings {
    pub geometry_debounce_ms: u64,
    pub pull_decay_ms: u64,
    pub gesture_end_ms: u64,
    pub settle_ms: u64,
    pub frame_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            geometry_debounce_ms: defaults::GEOMETRY_DEBOUNCE_MS,
            pull_decay_ms: defaults::PULL_DECAY_MS,
            gesture_end_ms: defaults::GESTURE_END_MS,
            settle_ms: defaults::SETTLE_MS,
            frame_ms: defaults::FRAME_MS,
        }
    }
}

impl Timings {
    pub fn geometry_debounce(&self) -> Duration {
        Duration::from_millis(self.geometry_debounce_ms)
    }
    pub fn pull_decay(&self) -> Duration {
        Duration::from_millis(self.pull_decay_ms)
    }
    pub fn gesture_end(&self) -> Duration {
        Duration::from_millis(self.gesture_end_ms)
    }
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EngineConfig {
    pub policy: DevicePolicy,
    pub touch: Tuning,
    pub pointer: Tuning,
    pub timings: Timings,
    pub boundary_tolerance: f32,
    pub breathing_room: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: DevicePolicy::default(),
            touch: Tuning::touch(),
            pointer: Tuning::pointer(),
            timings: Timings::default(),
            boundary_tolerance: defaults::BOUNDARY_TOLERANCE_PX,
            breathing_room: defaults::BREATHING_ROOM_PX,
        }
    }
}

impl EngineConfig {
    /// Default tuning with the device class pinned.
    pub fn fixed(class: DeviceClass) -> Self {
        Self {
            policy: DevicePolicy::Fixed(class),
            ..Self::default()
        }
    }

    pub fn tuning(&self, class: DeviceClass) -> &Tuning {
        match class {
            DeviceClass::Touch => &self.touch,
            DeviceClass::Pointer => &self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_breakpoint_classifies() {
        let p = DevicePolicy::default();
        assert_eq!(p.classify(390.0), DeviceClass::Touch);
        assert_eq!(p.classify(768.0), DeviceClass::Touch);
        assert_eq!(p.classify(1280.0), DeviceClass::Pointer);
        // Unmeasured viewport falls back to pointer.
        assert_eq!(p.classify(0.0), DeviceClass::Pointer);
    }

    #[test]
    fn fixed_policy_ignores_width() {
        let p = DevicePolicy::Fixed(DeviceClass::Touch);
        assert_eq!(p.classify(1920.0), DeviceClass::Touch);
    }

    #[test]
    fn touch_pulls_earlier_and_commits_easier() {
        let t = Tuning::touch();
        let p = Tuning::pointer();
        assert!(t.section_viewports > p.section_viewports);
        assert!(t.speed_ratio < p.speed_ratio);
        assert!(t.pull_start < p.pull_start);
        assert!(t.pull_length > p.pull_length);
        assert!(t.commit_threshold < p.commit_threshold);
    }

    #[test]
    fn band_resolves_in_pixels() {
        let band = Tuning::pointer().band.resolve(800.0);
        assert!((band.offset - 320.0).abs() < 1e-3);
        assert!((band.extent - 160.0).abs() < 1e-3);

        let inverted = TriggerBand {
            start: 0.6,
            end: 0.2,
        };
        assert_eq!(inverted.resolve(100.0).extent, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_json() {
        let json = r#"{ "policy": { "fixed": "touch" }, "breathing_room": 24.0 }"#;
        let cfg: EngineConfig = serde_json::from_str(json).expect("valid config");
        assert_eq!(cfg.policy, DevicePolicy::Fixed(DeviceClass::Touch));
        assert_eq!(cfg.breathing_room, 24.0);
        assert_eq!(cfg.timings, Timings::default());
    }
}
