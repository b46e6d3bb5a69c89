//! Logging stand-in for the BLE reporting collaborator.

use std::convert::Infallible;
use std::fmt::Write as _;

use easymoo_core::{LinkState, Report, ReportSink};
use log::{info, warn};

/// Prints every report and plays a phone that drops by now and then.
///
/// After every `connect_every` reports a receiver connects. It stays until
/// it has received one report during its session, then disconnects.
pub struct LoggingRadio {
    connect_every: u32,
    sent: u32,
    link: LinkState,
    json: bool,
}

impl LoggingRadio {
    pub fn new(connect_every: u32, json: bool) -> Self {
        Self {
            connect_every: connect_every.max(1),
            sent: 0,
            link: LinkState::Idle,
            json,
        }
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02x}");
    }
    out
}

impl ReportSink for LoggingRadio {
    type Error = Infallible;

    fn transmit(&mut self, report: &Report) -> Result<(), Infallible> {
        self.sent += 1;

        info!(
            "report #{} cycle {} state {} score {:.1} [{}]",
            self.sent,
            report.cycle,
            report.state,
            report.score.value(),
            hex(&report.encode())
        );
        if self.json {
            match serde_json::to_string(report) {
                Ok(json) => info!("{json}"),
                Err(e) => warn!("report not serializable: {e}"),
            }
        }

        self.link = match self.link {
            LinkState::Connected => {
                info!("receiver got its report, disconnecting");
                LinkState::Idle
            }
            LinkState::Idle if self.sent % self.connect_every == 0 => {
                info!("receiver connected");
                LinkState::Connected
            }
            LinkState::Idle => LinkState::Idle,
        };
        Ok(())
    }

    fn link_state(&self) -> LinkState {
        self.link
    }
}
