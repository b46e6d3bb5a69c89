//! Aggregation and state-transition engine for the EasyMoo collar
//!
//! Turns raw collar samples (ambient light, temperature, accelerometer,
//! gyroscope) into debounced alert flags, a bounded well-being score and a
//! device mode decided by a five-state machine.
//!
//! Key constraints:
//! - Runs on a Cortex-M4 class MCU with `alloc` only
//! - One cooperative polling loop, no locking
//! - A bad sample never stops the loop
//!
//! ```no_run
//! use easymoo_core::{AggregationEngine, MonitorConfig, SensorFrame, StateMachine};
//! use easymoo_core::fsm::FsmInputs;
//!
//! let config = MonitorConfig::default();
//! let mut engine = AggregationEngine::new(&config)?;
//! let mut fsm = StateMachine::new();
//!
//! let frame = SensorFrame::default();
//! let flags = engine.ingest(&frame);
//! fsm.update(FsmInputs::from_flags(&flags));
//! # Ok::<(), easymoo_core::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod aggregation;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod errors;
pub mod fsm;
pub mod monitor;
pub mod queue;
pub mod reading;
pub mod report;
pub mod score;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use aggregation::{AggregationEngine, Flags};
pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use debounce::Debouncer;
pub use errors::{ConfigError, ConfigResult, QueueError, QueueResult};
pub use fsm::{DeviceState, StateMachine};
pub use monitor::Monitor;
pub use queue::Queue;
pub use reading::{Metric, Reading, SensorFrame};
pub use report::Report;
pub use traits::{LinkState, ReportSink, SensorSource};
pub use window::SlidingWindow;

/// Crate version, reported by the simulator banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
