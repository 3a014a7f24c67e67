//! # Headless host
//!
//! A reference environment for the engine: a virtual page with a header, one
//! Section per item, a sticky window holding the inner content box and a
//! navigation bar. Smooth scrolling is an [`scrollreel_core::AnimatedValue`],
//! region-entered notifications come from a bounding-box check against the
//! trigger band, and time is a [`scrollreel_core::ManualClock`] stepped one
//! frame at a time.
//!
//! ```rust
//! use scrollreel_core::Size;
//! use scrollreel_engine::{DeviceClass, EngineConfig, Item, ItemList};
//! use scrollreel_sim::Harness;
//! use web_time::Duration;
//!
//! let items = ItemList::new(1, (0..4).map(|i| Item::new(i, format!("Item {i}"))).collect());
//! let viewport = Size { width: 1280.0, height: 800.0 };
//! let mut sim = Harness::new(EngineConfig::fixed(DeviceClass::Pointer), items, viewport);
//!
//! sim.click_nav(2).unwrap();
//! sim.idle(Duration::from_millis(900));
//! assert_eq!(sim.snapshot().active_index, 2);
//! assert_eq!(sim.commits(), vec![2]);
//! ```

pub mod harness;
pub mod page;
pub mod tests;

pub use harness::*;
pub use page::*;
