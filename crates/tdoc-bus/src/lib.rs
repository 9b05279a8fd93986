//! In-process topic bus.
//!
//! This crate provides:
//! - [`EventBus`], the emit handle stages publish through
//! - [`SubscriberRegistry`], static topic -> handler routing and the
//!   dispatch loop
//! - [`EventHandler`], the trait every stage implements

pub mod bus;
pub mod error;

pub use bus::{EventBus, EventHandler, SubscriberRegistry};
pub use error::{BusError, BusResult};
