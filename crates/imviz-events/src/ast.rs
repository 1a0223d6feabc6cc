//! Abstract syntax for event selectors
//!
//! This module defines the types produced by the selector parser. Consumers
//! (the selection compiler) treat gesture selectors as an opaque
//! start/middle/end triple and reassemble them through [`std::fmt::Display`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an event stage listens for its events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTarget {
    /// Events bubbling from anywhere in the view
    View,

    /// Events from a named source (e.g. `window`)
    Source(String),

    /// Events originating inside a named group mark (`@name`)
    Scoped(String),
}

/// A single stage of an event selector: one event type plus optional
/// target and filter predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStage {
    /// Where the stage listens
    pub target: EventTarget,

    /// Event type (e.g. `mousedown`, `click`, `wheel`)
    pub event: String,

    /// Opaque bracketed filter expressions, in source order
    pub filters: Vec<String>,
}

impl EventStage {
    /// Create a stage listening on the whole view
    pub fn view(event: impl Into<String>) -> Self {
        Self {
            target: EventTarget::View,
            event: event.into(),
            filters: Vec::new(),
        }
    }

    /// Create a stage listening on a named source (e.g. `window`)
    pub fn source(source: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            target: EventTarget::Source(source.into()),
            event: event.into(),
            filters: Vec::new(),
        }
    }

    /// Create a stage scoped to a named group mark (`@name:event`)
    pub fn scoped(group: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            target: EventTarget::Scoped(group.into()),
            event: event.into(),
            filters: Vec::new(),
        }
    }

    /// Append a filter predicate, consuming and returning the stage
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Check whether any filter predicate equals the given expression
    pub fn has_filter(&self, filter: &str) -> bool {
        self.filters.iter().any(|f| f == filter)
    }

    /// Append a filter predicate in place
    pub fn add_filter(&mut self, filter: impl Into<String>) {
        self.filters.push(filter.into());
    }
}

impl fmt::Display for EventStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            EventTarget::View => {}
            EventTarget::Source(s) => write!(f, "{}:", s)?,
            EventTarget::Scoped(g) => write!(f, "@{}:", g)?,
        }
        write!(f, "{}", self.event)?;
        for filter in &self.filters {
            write!(f, "[{}]", filter)?;
        }
        Ok(())
    }
}

/// A parsed event selector: either a single event stage or a three-stage
/// drag gesture `[start, end] > middle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSelector {
    /// A single event stage
    Single(EventStage),

    /// A drag gesture: `middle` events fire between `start` and `end`
    Gesture {
        start: EventStage,
        end: EventStage,
        middle: EventStage,
    },
}

impl EventSelector {
    /// Create a gesture selector
    pub fn gesture(start: EventStage, end: EventStage, middle: EventStage) -> Self {
        Self::Gesture { start, end, middle }
    }

    /// The start stage, if this selector is a gesture
    pub fn start(&self) -> Option<&EventStage> {
        match self {
            Self::Single(_) => None,
            Self::Gesture { start, .. } => Some(start),
        }
    }

    /// Check whether this selector is a multi-stage gesture
    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::Gesture { .. })
    }
}

impl fmt::Display for EventSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(stage) => write!(f, "{}", stage),
            Self::Gesture { start, end, middle } => {
                write!(f, "[{}, {}] > {}", start, end, middle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(EventStage::view("click").to_string(), "click");
        assert_eq!(
            EventStage::source("window", "mouseup").to_string(),
            "window:mouseup"
        );
        assert_eq!(
            EventStage::scoped("cell", "mousedown")
                .with_filter("!eventItem().isBrush")
                .to_string(),
            "@cell:mousedown[!eventItem().isBrush]"
        );
    }

    #[test]
    fn test_gesture_display() {
        let sel = EventSelector::gesture(
            EventStage::scoped("cell", "mousedown"),
            EventStage::source("window", "mouseup"),
            EventStage::source("window", "mousemove"),
        );
        assert_eq!(
            sel.to_string(),
            "[@cell:mousedown, window:mouseup] > window:mousemove"
        );
    }

    #[test]
    fn test_has_filter() {
        let stage = EventStage::view("mousedown").with_filter("event.shiftKey");
        assert!(stage.has_filter("event.shiftKey"));
        assert!(!stage.has_filter("!eventItem().isBrush"));
    }
}
