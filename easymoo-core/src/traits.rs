//! Collaborator Boundary
//!
//! Bus-level sensor reads and the radio live outside this crate. The
//! polling loop only sees these traits: a source that yields one
//! [`SensorFrame`] per cycle and a sink that transmits [`Report`]s.

use core::fmt::Debug;

use crate::reading::SensorFrame;
use crate::report::Report;

/// Radio link as seen by the reporting collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkState {
    /// Advertising only, no receiver attached
    #[default]
    Idle,
    /// A receiver holds a session
    Connected,
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LinkState::Idle => defmt::write!(fmt, "Idle"),
            LinkState::Connected => defmt::write!(fmt, "Connected"),
        }
    }
}

/// Per-cycle sensor input
pub trait SensorSource {
    /// Read failure
    type Error: Debug;

    /// Sample every channel once
    fn read_frame(&mut self) -> Result<SensorFrame, Self::Error>;
}

/// Report output
pub trait ReportSink {
    /// Transmit failure
    type Error: Debug;

    /// Hand one report to the radio
    fn transmit(&mut self, report: &Report) -> Result<(), Self::Error>;

    /// Current radio link
    fn link_state(&self) -> LinkState {
        LinkState::Idle
    }
}

impl<T: SensorSource + ?Sized> SensorSource for &mut T {
    type Error = T::Error;

    fn read_frame(&mut self) -> Result<SensorFrame, Self::Error> {
        (**self).read_frame()
    }
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    type Error = T::Error;

    fn transmit(&mut self, report: &Report) -> Result<(), Self::Error> {
        (**self).transmit(report)
    }

    fn link_state(&self) -> LinkState {
        (**self).link_state()
    }
}
