//! Cooperative Polling Loop
//!
//! ## Cycle
//!
//! ```text
//!   wake ──► read frame ──► ingest ──► score? ──► FSM ──► report?
//!    ▲            │ error                                   │
//!    │            └──► log, skip ingest ────────────────────┤
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! 1. Block on the [`WakeSource`] until the cycle is due.
//! 2. Read one frame. A read error is logged; windows and flags stay as
//!    they were, but the cycle still counts.
//! 3. On reporting cycles recompute the composite score.
//! 4. Update the state machine from the flags and the sink's link state.
//!    If nothing changed and a receiver is connected, start a session.
//! 5. Hand a [`Report`] to the sink on reporting cycles and on every state
//!    change. Transmit errors are logged and counted.
//!
//! Each cycle runs to completion; there is one writer and no locking.

use core::convert::Infallible;

use crate::aggregation::{AggregationEngine, Flags};
use crate::config::MonitorConfig;
use crate::errors::ConfigResult;
use crate::fsm::{FsmInputs, StateMachine, Transition};
use crate::report::Report;
use crate::score::CompositeScore;
use crate::time::WakeSource;
use crate::traits::{LinkState, ReportSink, SensorSource};

/// Running totals kept by the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorStats {
    /// Cycles run
    pub cycles: u64,
    /// Failed sensor reads
    pub read_errors: u32,
    /// Reports accepted by the sink
    pub reports_sent: u32,
    /// Reports the sink refused
    pub transmit_errors: u32,
    /// Radio sessions started
    pub sessions: u32,
}

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    /// Flags after the cycle
    pub flags: Flags,
    /// State change, if any
    pub transition: Option<Transition>,
    /// Report handed to the sink, if any
    pub report: Option<Report>,
}

/// Sensor source, engine, state machine and sink wired into one loop
pub struct Monitor<S, R, W> {
    engine: AggregationEngine,
    fsm: StateMachine,
    source: S,
    sink: R,
    wake: W,
    score: CompositeScore,
    stats: MonitorStats,
}

impl<S, R, W> Monitor<S, R, W>
where
    S: SensorSource,
    R: ReportSink,
    W: WakeSource,
{
    /// Validate `config` and wire the collaborators
    pub fn new(config: &MonitorConfig, source: S, sink: R, wake: W) -> ConfigResult<Self> {
        let engine = AggregationEngine::new(config)?;
        log_info!(
            "monitor: window={} report_every={} prune_every={} interval={}ms",
            config.window_capacity,
            config.report_every,
            config.prune_every,
            config.cycle_interval_ms
        );
        Ok(Self {
            engine,
            fsm: StateMachine::new(),
            source,
            sink,
            wake,
            score: CompositeScore::ZERO,
            stats: MonitorStats::default(),
        })
    }

    /// Wait for the wake source, then run one cycle; repeat `cycles` times
    pub fn run(&mut self, cycles: u64) -> Result<(), W::Error> {
        for _ in 0..cycles {
            nb::block!(self.wake.poll_wake())?;
            self.run_cycle();
        }
        Ok(())
    }

    /// Run until the wake source fails
    pub fn run_forever(&mut self) -> Result<Infallible, W::Error> {
        loop {
            nb::block!(self.wake.poll_wake())?;
            self.run_cycle();
        }
    }

    /// One cycle, without waiting
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let flags = match self.source.read_frame() {
            Ok(frame) => self.engine.ingest(&frame),
            Err(e) => {
                self.stats.read_errors = self.stats.read_errors.saturating_add(1);
                log_warn!("cycle {}: sensor read failed: {:?}", self.engine.cycles() + 1, e);
                self.engine.skip_cycle()
            }
        };
        self.stats.cycles = self.engine.cycles();

        let report_due = self.engine.report_due();
        if report_due {
            self.score = self.engine.composite_score();
        }

        let link = self.sink.link_state();
        let mut transition = self.fsm.update(FsmInputs::from_flags(&flags).with_link(link));
        if transition.is_none() && link == LinkState::Connected {
            let from = self.fsm.current();
            if self.fsm.begin_session() {
                self.stats.sessions = self.stats.sessions.saturating_add(1);
                transition = Some(Transition {
                    from,
                    to: self.fsm.current(),
                });
            }
        }

        if let Some(t) = transition {
            log_info!("cycle {}: {} -> {}", self.stats.cycles, t.from, t.to);
        }

        let report = if report_due || transition.is_some() {
            let report = self.snapshot();
            self.send(&report);
            Some(report)
        } else {
            None
        };

        CycleOutcome {
            flags,
            transition,
            report,
        }
    }

    fn send(&mut self, report: &Report) {
        match self.sink.transmit(report) {
            Ok(()) => self.stats.reports_sent = self.stats.reports_sent.saturating_add(1),
            Err(e) => {
                self.stats.transmit_errors = self.stats.transmit_errors.saturating_add(1);
                log_warn!("cycle {}: report not sent: {:?}", report.cycle, e);
            }
        }
    }

    /// Current state as a report
    pub fn snapshot(&self) -> Report {
        Report {
            cycle: self.engine.cycles(),
            frame: self.engine.latest_frame().copied().unwrap_or_default(),
            flags: self.engine.flags(),
            score: self.score,
            state: self.fsm.current(),
        }
    }

    /// Aggregation engine
    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    /// State machine
    pub fn fsm(&self) -> &StateMachine {
        &self.fsm
    }

    /// Running totals
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Score from the last reporting cycle
    pub fn score(&self) -> CompositeScore {
        self.score
    }

    /// Sensor source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Report sink
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Report sink, mutable
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (S, R, W) {
        (self.source, self.sink, self.wake)
    }
}
