//! Device Mode State Machine
//!
//! ## States
//!
//! ```text
//! Off       ── first cycle ──────────► Sensing
//! Sensing   ── inactive ─────────────► Sleep
//! Sensing   ── darkOrHot ────────────► Critical
//! Sleep     ── !inactive ────────────► Sensing
//! Sleep     ── darkOrHot ────────────► Critical
//! Critical  ── !darkOrHot ───────────► Sleep
//! Talk      ── link idle ────────────► Sleep
//! any but Off ── begin_session() ────► Talk
//! ```
//!
//! ## Guard Resolution
//!
//! Guards of the current state are checked in table order and the first
//! one that holds wins. A still animal in the heat therefore sleeps first;
//! once asleep it stays still, the wake guard fails, and the alert guard
//! moves it to `Critical` on a later cycle. At most one transition happens
//! per update.
//!
//! ## Records
//!
//! Every state keeps a small record (`active`, `previous`). Activation is a
//! toggle that first saves the old `active` value into `previous`, so after
//! each transition exactly one record is active and the records of the two
//! states involved show what changed.

use core::fmt;

use crate::aggregation::Flags;
use crate::traits::LinkState;

/// Device operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DeviceState {
    /// Powered down, before the first cycle
    #[default]
    Off = 0,
    /// Actively sampling
    Sensing = 1,
    /// Low power, animal at rest
    Sleep = 2,
    /// Environmental alert raised
    Critical = 3,
    /// Radio session with a receiver
    Talk = 4,
}

impl DeviceState {
    /// Number of states
    pub const COUNT: usize = 5;

    /// Every state, in id order
    pub const ALL: [DeviceState; DeviceState::COUNT] = [
        DeviceState::Off,
        DeviceState::Sensing,
        DeviceState::Sleep,
        DeviceState::Critical,
        DeviceState::Talk,
    ];

    /// Wire id
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// State for a wire id
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(DeviceState::Off),
            1 => Some(DeviceState::Sensing),
            2 => Some(DeviceState::Sleep),
            3 => Some(DeviceState::Critical),
            4 => Some(DeviceState::Talk),
            _ => None,
        }
    }

    /// Upper-case name, as in the status dump
    pub const fn name(self) -> &'static str {
        match self {
            DeviceState::Off => "OFF",
            DeviceState::Sensing => "SENSING",
            DeviceState::Sleep => "SLEEP",
            DeviceState::Critical => "CRITICAL",
            DeviceState::Talk => "TALK",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

/// Per-state activation record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateRecord {
    /// State this record belongs to
    pub state: DeviceState,
    /// True while this is the current state
    pub active: bool,
    /// `active` before the most recent toggle
    pub previous: bool,
}

impl StateRecord {
    const fn new(state: DeviceState) -> Self {
        Self {
            state,
            active: false,
            previous: false,
        }
    }

    fn toggle(&mut self) {
        self.previous = self.active;
        self.active = !self.active;
    }
}

/// Inputs sampled once per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsmInputs {
    /// Debounced stillness
    pub inactive: bool,
    /// Debounced darkness or heat
    pub dark_or_hot: bool,
    /// Radio link as reported by the sink
    pub link: LinkState,
}

impl FsmInputs {
    /// Inputs from the engine flags, with no radio session
    pub fn from_flags(flags: &Flags) -> Self {
        Self {
            inactive: flags.inactive,
            dark_or_hot: flags.dark_or_hot(),
            link: LinkState::Idle,
        }
    }

    /// Same inputs with the given link state
    pub fn with_link(mut self, link: LinkState) -> Self {
        self.link = link;
        self
    }
}

/// A state change performed by [`StateMachine::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State left
    pub from: DeviceState,
    /// State entered
    pub to: DeviceState,
}

/// Five-state device mode machine
#[derive(Debug, Clone)]
pub struct StateMachine {
    records: [StateRecord; DeviceState::COUNT],
    current: DeviceState,
    just_entered: bool,
    transitions: u32,
}

impl StateMachine {
    /// Machine in `Off`, with only the `Off` record active
    pub fn new() -> Self {
        let mut records = DeviceState::ALL.map(StateRecord::new);
        records[DeviceState::Off.index()].toggle();
        Self {
            records,
            current: DeviceState::Off,
            just_entered: false,
            transitions: 0,
        }
    }

    /// Evaluate the current state's guards and move at most once
    pub fn update(&mut self, inputs: FsmInputs) -> Option<Transition> {
        let next = next_state(self.current, &inputs);
        if next == self.current {
            self.just_entered = false;
            return None;
        }
        Some(self.enter(next))
    }

    /// Start a radio session
    ///
    /// Ignored while `Off` or already talking. Returns whether `Talk` was
    /// entered.
    pub fn begin_session(&mut self) -> bool {
        match self.current {
            DeviceState::Off | DeviceState::Talk => false,
            _ => {
                self.enter(DeviceState::Talk);
                true
            }
        }
    }

    fn enter(&mut self, next: DeviceState) -> Transition {
        let from = self.current;
        self.records[from.index()].toggle();
        self.records[next.index()].toggle();
        self.current = next;
        self.just_entered = true;
        self.transitions = self.transitions.saturating_add(1);
        log_debug!("fsm: {} -> {}", from.name(), next.name());
        Transition { from, to: next }
    }

    /// Current state
    pub fn current(&self) -> DeviceState {
        self.current
    }

    /// Record of one state
    pub fn record(&self, state: DeviceState) -> &StateRecord {
        &self.records[state.index()]
    }

    /// All records, in id order
    pub fn records(&self) -> &[StateRecord; DeviceState::COUNT] {
        &self.records
    }

    /// True when the last update or session start changed state
    pub fn just_entered(&self) -> bool {
        self.just_entered
    }

    /// Transitions performed since start
    pub fn transitions(&self) -> u32 {
        self.transitions
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "current: {}", self.current)?;
        for record in &self.records {
            writeln!(
                f,
                "  {:<8} id={} active={} previous={}",
                record.state.name(),
                record.state.id(),
                u8::from(record.active),
                u8::from(record.previous)
            )?;
        }
        Ok(())
    }
}

fn next_state(current: DeviceState, inputs: &FsmInputs) -> DeviceState {
    match current {
        DeviceState::Off => DeviceState::Sensing,
        DeviceState::Sensing if inputs.inactive => DeviceState::Sleep,
        DeviceState::Sensing if inputs.dark_or_hot => DeviceState::Critical,
        DeviceState::Sleep if !inputs.inactive => DeviceState::Sensing,
        DeviceState::Sleep if inputs.dark_or_hot => DeviceState::Critical,
        DeviceState::Sensing | DeviceState::Sleep => current,
        DeviceState::Critical => {
            if inputs.dark_or_hot {
                current
            } else {
                DeviceState::Sleep
            }
        }
        DeviceState::Talk => match inputs.link {
            LinkState::Idle => DeviceState::Sleep,
            LinkState::Connected => current,
        },
    }
}
