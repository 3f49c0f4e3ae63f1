//! Event logging for the pass pipeline.
//!
//! Passes record one [`Event`] per transformation so callers can inspect what changed
//! without diffing the IR. Events are appended to an [`EventLog`] backed by a
//! `boxcar::Vec`, which allows concurrent appends through a shared reference; the
//! scheduler hands one log to passes running on different functions in parallel.
//!
//! # Example
//!
//! ```rust
//! use ssafold::compiler::{EventKind, EventLog};
//! use ssafold::ir::InstId;
//!
//! let log = EventLog::new();
//! log.record(EventKind::ConstantFolded)
//!     .at("foo", InstId::new(3))
//!     .message("add folded to 8");
//! log.info("constant folding finished");
//!
//! assert_eq!(log.count_kind(EventKind::ConstantFolded), 1);
//! assert_eq!(log.len(), 2);
//! ```

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use crate::ir::InstId;

/// Categories of events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A binary operator with constant operands was replaced by its value.
    ConstantFolded,
    /// A division or remainder by zero was replaced by poison.
    PoisonFolded,
    /// An instruction was removed.
    InstructionRemoved,
    /// A pass started running over the module.
    PassStarted,
    /// A pass finished running over the module.
    PassCompleted,
    /// Informational message.
    Info,
    /// Something unexpected that did not stop the pipeline.
    Warning,
    /// A failure that stopped processing of a function.
    Error,
}

impl EventKind {
    /// Human-readable description, also the default event message.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::ConstantFolded => "constant folded",
            Self::PoisonFolded => "folded to poison",
            Self::InstructionRemoved => "instruction removed",
            Self::PassStarted => "pass started",
            Self::PassCompleted => "pass completed",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns `true` for kinds that describe a change to the IR.
    #[must_use]
    pub fn is_transformation(&self) -> bool {
        matches!(
            self,
            Self::ConstantFolded | Self::PoisonFolded | Self::InstructionRemoved
        )
    }

    /// Returns `true` for free-form diagnostics.
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Info | Self::Warning | Self::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single recorded event.
#[derive(Debug, Clone)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Function the event refers to.
    pub function: Option<String>,
    /// Instruction the event refers to.
    pub location: Option<InstId>,
    /// Free-form detail.
    pub message: String,
    /// Name of the pass that recorded the event.
    pub pass: Option<String>,
}

impl Event {
    fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            function: None,
            location: None,
            message: message.into(),
            pass: None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(function) = &self.function {
            write!(f, " @{function}")?;
        }
        if let Some(location) = self.location {
            write!(f, " {location}")?;
        }
        write!(f, " {}", self.message)
    }
}

/// Fluent builder returned by [`EventLog::record`].
///
/// The event is appended when the builder is dropped, so a chain ending in `;` records
/// it.
pub struct EventBuilder<'a> {
    log: &'a EventLog,
    kind: EventKind,
    function: Option<String>,
    location: Option<InstId>,
    message: Option<String>,
    pass: Option<String>,
}

impl<'a> EventBuilder<'a> {
    fn new(log: &'a EventLog, kind: EventKind) -> Self {
        Self {
            log,
            kind,
            function: None,
            location: None,
            message: None,
            pass: None,
        }
    }

    /// Sets function and instruction.
    pub fn at(mut self, function: impl Into<String>, location: InstId) -> Self {
        self.function = Some(function.into());
        self.location = Some(location);
        self
    }

    /// Sets only the function.
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Sets the message; defaults to the kind description.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Sets the recording pass.
    pub fn pass(mut self, pass_name: impl Into<String>) -> Self {
        self.pass = Some(pass_name.into());
        self
    }
}

impl Drop for EventBuilder<'_> {
    fn drop(&mut self) {
        let message = self
            .message
            .take()
            .unwrap_or_else(|| self.kind.description().to_string());

        let event = Event {
            kind: self.kind,
            function: self.function.take(),
            location: self.location.take(),
            message,
            pass: self.pass.take(),
        };

        self.log.events.push(event);
    }
}

/// Append-only, thread-safe collection of events.
#[derive(Debug, Default)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        let new_log = Self::new();
        new_log.merge(self);
        new_log
    }
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: boxcar::Vec::new(),
        }
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.count() == 0
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Starts recording an event of `kind`.
    pub fn record(&self, kind: EventKind) -> EventBuilder<'_> {
        EventBuilder::new(self, kind)
    }

    /// Records an [`EventKind::Info`] message.
    pub fn info(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Info, message));
    }

    /// Records an [`EventKind::Warning`] message.
    pub fn warn(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Warning, message));
    }

    /// Records an [`EventKind::Error`] message.
    pub fn error(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Error, message));
    }

    /// Appends copies of all events of `other`.
    pub fn merge(&self, other: &EventLog) {
        for (_, event) in &other.events {
            self.events.push(event.clone());
        }
    }

    /// Returns `true` if at least one event of `kind` was recorded.
    #[must_use]
    pub fn has(&self, kind: EventKind) -> bool {
        self.events.iter().any(|(_, e)| e.kind == kind)
    }

    /// Number of events of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|(_, e)| e.kind == kind).count()
    }

    /// All events in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, e)| e)
    }

    /// Events of one kind.
    pub fn filter_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(move |e| e.kind == kind)
    }

    /// Events about one function.
    pub fn filter_function<'a>(
        &'a self,
        function: &'a str,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.iter()
            .filter(move |e| e.function.as_deref() == Some(function))
    }

    /// Events describing IR changes.
    pub fn transformations(&self) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(|e| e.kind.is_transformation())
    }

    /// Number of distinct functions with at least one transformation.
    #[must_use]
    pub fn functions_affected(&self) -> usize {
        self.transformations()
            .filter_map(|e| e.function.as_deref())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Event counts grouped by kind.
    #[must_use]
    pub fn count_by_kind(&self) -> HashMap<EventKind, usize> {
        let mut counts = HashMap::new();
        for event in self.iter() {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary of the transformations, e.g. `2 functions: 5 constants folded`.
    #[must_use]
    pub fn summary(&self) -> String {
        let counts = self.count_by_kind();
        let get = |kind: EventKind| counts.get(&kind).copied().unwrap_or(0);

        let mut parts = Vec::new();
        if get(EventKind::ConstantFolded) > 0 {
            parts.push(format!("{} constants folded", get(EventKind::ConstantFolded)));
        }
        if get(EventKind::PoisonFolded) > 0 {
            parts.push(format!("{} folded to poison", get(EventKind::PoisonFolded)));
        }
        if get(EventKind::Warning) > 0 {
            parts.push(format!("{} warnings", get(EventKind::Warning)));
        }
        if get(EventKind::Error) > 0 {
            parts.push(format!("{} errors", get(EventKind::Error)));
        }

        if parts.is_empty() {
            return "no transformations".to_string();
        }
        format!("{} functions: {}", self.functions_affected(), parts.join(", "))
    }
}
