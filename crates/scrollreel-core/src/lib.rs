//! # Core primitives
//!
//! Scrollreel's engine is a small state machine, but it leans on a handful of
//! toolkit-level pieces that know nothing about items or sections:
//!
//! - `geometry` — `Vec2`, `Size`, `Rect` and the one-axis `Span`.
//! - `animation` — easing curves, `AnimationSpec`, `AnimatedValue` and the
//!   `Clock` abstraction.
//! - `signal` — `Signal<T>`, an observable value with explicit
//!   subscribe/unsubscribe.
//! - `scope` — a `Scope` that owns cleanup work and runs it on unmount.
//! - `timer` — a deadline-ordered `TimerQueue` with cancel-and-reschedule.
//!
//! ## Signals
//!
//! ```rust
//! use scrollreel_core::*;
//!
//! let progress = signal(0.0f32);
//! let id = progress.subscribe(|p| log::trace!("progress {p}"));
//! progress.set(0.5);
//! assert_eq!(progress.get(), 0.5);
//! progress.unsubscribe(id);
//! ```
//!
//! ## Time
//!
//! Nothing here reads the wall clock on its own. Animations and timers take
//! the current `Instant` as an argument, so hosts can drive them from a real
//! frame loop (`SystemClock`) or deterministically (`ManualClock`):
//!
//! ```rust
//! use scrollreel_core::*;
//! use web_time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut timers = TimerQueue::new();
//! let mut slot = None;
//! timers.reschedule(&mut slot, t0 + Duration::from_millis(100), "settle");
//! // Restarting replaces the pending timer instead of stacking a second one.
//! timers.reschedule(&mut slot, t0 + Duration::from_millis(150), "settle");
//! assert_eq!(timers.len(), 1);
//! assert!(timers.pop_due(t0 + Duration::from_millis(120)).is_none());
//! ```

pub mod animation;
pub mod geometry;
pub mod scope;
pub mod signal;
pub mod timer;

pub use animation::*;
pub use geometry::*;
pub use scope::*;
pub use signal::*;
pub use timer::*;
