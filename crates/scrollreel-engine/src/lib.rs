//! # Scroll-driven item pager
//!
//! Shows an ordered list of items one at a time inside a fixed viewport
//! window while the user scrolls a much taller virtual page. Each item owns a
//! tall placeholder *Section* in page flow; scrolling through a Section
//! scrolls the item's own content box, and scrolling on past its end pulls
//! the next item in.
//!
//! Five components share one [`EngineState`]:
//!
//! - [`GeometryCache`] — measured layout (sticky window, header, navigation
//!   buttons, inner content sizes) and the Section placeholders.
//! - [`VisibilityTracker`] — coarse "which Section is on screen" signal,
//!   silenced while a programmatic scroll is in flight.
//! - [`ScrollSampler`] — page offset → progress through the active Section,
//!   plus scroll direction; coalesced to one sample per frame.
//! - [`InnerSync`] — progress → inner content offset and top/bottom flags.
//! - [`TransitionController`] — pull preview, commit on gesture end, and the
//!   locked programmatic jump shared with explicit navigation.
//!
//! [`Engine`] wires them together; [`Viewer`] owns one engine for the
//! lifetime of a mounted view and publishes snapshots to subscribers.
//!
//! ## Driving an engine
//!
//! The engine is a plain state machine. Hosts feed it events with the
//! current time and carry out the [`Effect`]s it returns:
//!
//! ```rust
//! use scrollreel_engine::*;
//! use web_time::{Duration, Instant};
//!
//! let items = ItemList::new(1, (0..3).map(|i| Item::new(i, format!("Item {i}"))).collect());
//! let (mut engine, effects) = Engine::new(EngineConfig::fixed(DeviceClass::Pointer), &items);
//! assert!(effects.contains(&Effect::MeasureLayout));
//!
//! let t0 = Instant::now();
//! let effects = engine.navigate(2, t0).expect("index in range");
//! assert!(effects.contains(&Effect::Committed { index: 2 }));
//! assert!(engine.state().is_visibility_locked());
//!
//! engine.advance(t0 + Duration::from_millis(800));
//! assert!(!engine.state().is_visibility_locked());
//! ```
//!
//! Timer-driven behaviour (pull decay, gesture end, lock release, debounced
//! re-measurement) only happens inside [`Engine::advance`]; hosts call it
//! whenever [`Engine::next_deadline`] has passed.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry_cache;
pub mod inner;
pub mod sampler;
pub mod state;
pub mod transition;
pub mod viewer;
pub mod visibility;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use geometry_cache::*;
pub use inner::*;
pub use sampler::*;
pub use state::*;
pub use transition::*;
pub use viewer::*;
pub use visibility::*;
