//! # Event Bus Module
//!
//! Publish/subscribe channel between the canvas engine and its host.
//!
//! ## Overview
//!
//! - The canvas publishes typed [`CanvasEvent`]s without knowing subscribers
//! - Subscribers filter by [`EventCategory`] and are called synchronously on
//!   the publishing call
//! - Hosts that mirror state into async code can take a broadcast receiver
//!
//! Each canvas owns its bus (there is no process-wide instance), so two
//! canvases on the same page never see each other's events.
//!
//! ## Usage
//!
//! ```rust
//! use floorkit_core::event_bus::{CanvasEvent, EventBus, EventCategory, EventFilter};
//! use floorkit_core::InteractionMode;
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Mode]),
//!     |event| {
//!         if let CanvasEvent::ModeChanged { mode } = event {
//!             println!("mode is now {mode}");
//!         }
//!     },
//! );
//!
//! bus.publish(CanvasEvent::ModeChanged { mode: InteractionMode::Edit }).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
