//! Emitted artifacts: signals, stores, and marks
//!
//! These are the three output collections the reactive runtime consumes.
//! They are plain serializable data; all reactive behavior is encoded in
//! the event-selector strings and opaque expressions they carry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One event binding of a signal: re-evaluate `expr` whenever the
/// selector in `on` fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStream {
    /// Event selector (or comma-separated signal names for derived
    /// signals)
    #[serde(rename = "type")]
    pub on: String,

    /// Expression evaluated when the stream fires
    pub expr: String,
}

impl EventStream {
    pub fn new(on: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            on: on.into(),
            expr: expr.into(),
        }
    }
}

/// A reactive signal definition.
///
/// During assembly the name is an `Option`: transform hooks suppress a
/// pending signal by clearing it, and only named signals are emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub init: Value,
    pub streams: Vec<EventStream>,
}

impl Signal {
    pub fn new(name: impl Into<String>, init: Value) -> Self {
        Self {
            name: Some(name.into()),
            init,
            streams: Vec::new(),
        }
    }

    pub fn with_stream(mut self, stream: EventStream) -> Self {
        self.streams.push(stream);
        self
    }

    /// Suppress this signal: it will not be emitted
    pub fn suppress(&mut self) {
        self.name = None;
    }
}

/// How a store mutates when a signal fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifyKind {
    /// Wipe all records
    Clear,

    /// Insert or update the record matching the key field
    Upsert,

    /// Append a record
    Insert,
}

/// One mutation rule on a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyOp {
    pub kind: ModifyKind,

    /// Signal whose updates trigger this mutation
    pub signal: String,

    /// Key field for upserts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ModifyOp {
    pub fn clear(signal: impl Into<String>) -> Self {
        Self {
            kind: ModifyKind::Clear,
            signal: signal.into(),
            field: None,
        }
    }

    pub fn upsert(signal: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: ModifyKind::Upsert,
            signal: signal.into(),
            field: Some(field.into()),
        }
    }

    pub fn insert(signal: impl Into<String>) -> Self {
        Self {
            kind: ModifyKind::Insert,
            signal: signal.into(),
            field: None,
        }
    }
}

/// A named store of currently-selected records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,

    /// Transform pipeline applied to the store; empty by default
    pub transform: Vec<Value>,

    /// Mutation rules, in evaluation order
    pub modify: Vec<ModifyOp>,
}

impl Store {
    /// Create a store with the default rule set: wipe whenever the named
    /// clear signal fires
    pub fn with_clear(name: impl Into<String>, clear_signal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Vec::new(),
            modify: vec![ModifyOp::clear(clear_signal)],
        }
    }
}

/// Geometric mark types emitted by the selection compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Rect,
}

/// Data source of a mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkSource {
    /// Name of the backing store
    pub data: String,
}

/// A single mark property binding: a literal value, a scale-mapped field,
/// or a group field reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyRef {
    /// Scale-mapped data field: `{"scale": ..., "field": ...}`
    Scale { scale: String, field: String },

    /// Reference to a field on the enclosing group: `{"field": {"group": ...}}`
    Group { field: GroupField },

    /// Literal value: `{"value": ...}`
    Value { value: Value },
}

/// The `{"group": ...}` half of a group field reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupField {
    pub group: String,
}

/// A mark property, optionally gated by a test expression.
///
/// Update properties are lists of these: the first branch whose test
/// passes wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    #[serde(flatten)]
    pub value: PropertyRef,
}

impl MarkProperty {
    pub fn value(value: Value) -> Self {
        Self {
            test: None,
            value: PropertyRef::Value { value },
        }
    }

    pub fn scaled(scale: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            test: None,
            value: PropertyRef::Scale {
                scale: scale.into(),
                field: field.into(),
            },
        }
    }

    pub fn group(field: impl Into<String>) -> Self {
        Self {
            test: None,
            value: PropertyRef::Group {
                field: GroupField {
                    group: field.into(),
                },
            },
        }
    }

    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }
}

/// Enter/update property maps of a mark
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkProperties {
    pub enter: BTreeMap<String, MarkProperty>,
    pub update: BTreeMap<String, Vec<MarkProperty>>,
}

/// A supplementary mark visualizing a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub name: String,

    #[serde(rename = "type")]
    pub mark_type: MarkType,

    pub from: MarkSource,
    pub properties: MarkProperties,
}

/// Baseline signal tracking the event group under the pointer; interval
/// math samples panel-local coordinates against it.
pub fn unit_signal() -> Signal {
    Signal::new("unit", json!({"_id": -1, "width": 1, "height": 1}))
        .with_stream(EventStream::new("mousemove", "eventGroup()"))
}

/// Baseline signal tracking the root event group, used for inverse-scale
/// lookups that must stay robust under nested groups.
pub fn root_signal() -> Signal {
    Signal::new("vlRoot", json!({"_id": -1, "width": 1, "height": 1}))
        .with_stream(EventStream::new("mousemove", "eventGroup('root')"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_suppression() {
        let mut signal = Signal::new("brush_clear", json!(true));
        assert!(signal.name.is_some());
        signal.suppress();
        assert!(signal.name.is_none());
    }

    #[test]
    fn test_store_default_rules() {
        let store = Store::with_clear("brush_db", "brush_clear");
        assert_eq!(store.modify, vec![ModifyOp::clear("brush_clear")]);
        assert!(store.transform.is_empty());
    }

    #[test]
    fn test_property_serialization() {
        let prop = MarkProperty::scaled("x", "min_mass").with_test("datum.unitName == 'cell'");
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            json,
            json!({"test": "datum.unitName == 'cell'", "scale": "x", "field": "min_mass"})
        );

        let prop = MarkProperty::group("height");
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json, json!({"field": {"group": "height"}}));

        let prop = MarkProperty::value(json!(0));
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json, json!({"value": 0}));
    }

    #[test]
    fn test_baseline_signals() {
        let unit = unit_signal();
        assert_eq!(unit.name.as_deref(), Some("unit"));
        assert_eq!(unit.streams[0].on, "mousemove");

        let root = root_signal();
        assert_eq!(root.name.as_deref(), Some("vlRoot"));
        assert_eq!(root.streams[0].expr, "eventGroup('root')");
    }
}
