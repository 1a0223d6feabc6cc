//! Selection data model
//!
//! This module defines:
//! - The raw selection spec schema as authored by users ([`RawSelection`],
//!   [`SelectionMap`])
//! - The normalized [`Selection`] produced by the parse pass, which is
//!   read-only input to all three assemble passes
//! - The closed enumerations (kind, level, resolve strategy, channel) used
//!   at every branch point

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoding channel a selection can project over
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
}

impl Channel {
    /// Get the channel's name as used in specs and scale lookups
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection kind: a single picked value vs. an accumulated set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    /// A single point pick; backed directly by the trigger signal
    #[default]
    Point,

    /// A set of records; backed by a named data store
    Set,
}

/// Whether a selection captures backing data values or visual values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Data,
    Visual,
}

/// Strategy for combining one selection's state across multiple panels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolve {
    /// Each panel owns its own state
    #[default]
    Single,

    /// Union of all panels' states
    Union,

    /// Intersection of all panels' states
    Intersect,

    /// Union of every panel's state except the one being tested
    UnionOthers,

    /// Intersection of every panel's state except the one being tested
    IntersectOthers,
}

impl Resolve {
    /// Spelling used in generated predicate expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolve::Single => "single",
            Resolve::Union => "union",
            Resolve::Intersect => "intersect",
            Resolve::UnionOthers => "union_others",
            Resolve::IntersectOthers => "intersect_others",
        }
    }
}

/// One projected channel/field pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntry {
    /// The encoding channel, when the projection came from a channel list
    pub channel: Option<Channel>,

    /// The data field captured by the selection
    pub field: String,
}

/// What a selection captures: channels (resolved to fields during parse),
/// a plain field list, or already-resolved entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    /// Channel list form, e.g. `{"channels": ["x", "y"]}`
    Channels { channels: Vec<Channel> },

    /// Field list form, e.g. `{"fields": ["_id"]}`
    Fields { fields: Vec<String> },

    /// Resolved entries (post-parse canonical form)
    Entries(Vec<ProjectionEntry>),
}

impl Projection {
    /// Resolved entries; empty until the project transform has run
    pub fn entries(&self) -> &[ProjectionEntry] {
        match self {
            Projection::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// Field bound to the given channel, if projected
    pub fn channel_field(&self, channel: Channel) -> Option<&str> {
        self.entries()
            .iter()
            .find(|e| e.channel == Some(channel))
            .map(|e| e.field.as_str())
    }

    /// All projected field names, in projection order
    pub fn fields(&self) -> Vec<String> {
        match self {
            Projection::Channels { .. } => Vec::new(),
            Projection::Fields { fields } => fields.clone(),
            Projection::Entries(entries) => entries.iter().map(|e| e.field.clone()).collect(),
        }
    }
}

/// A transform configuration position: absent, a bare boolean, or a
/// configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigFlag<T> {
    Flag(bool),
    Config(T),
}

impl<T: Default> ConfigFlag<T> {
    /// Collapse to a config: `true` enables with defaults, `false` disables
    pub fn into_config(self) -> Option<T> {
        match self {
            ConfigFlag::Flag(true) => Some(T::default()),
            ConfigFlag::Flag(false) => None,
            ConfigFlag::Config(config) => Some(config),
        }
    }
}

/// Toggle transform configuration (multi-click accumulation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {}

/// Scales transform configuration (selection bound to scale domains)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalesConfig {
    /// Scale names resolved per projected channel during parse
    #[serde(skip)]
    pub bound: BTreeMap<Channel, String>,
}

/// Interval transform configuration (brush selection)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {}

/// Translate transform configuration (draggable brush body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Explicitly disabled with `"translate": false`
    #[serde(skip, default = "translate_enabled_default")]
    pub enabled: bool,
}

fn translate_enabled_default() -> bool {
    true
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Zoom transform configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {}

/// Nearest transform configuration (snap picks to the nearest datum)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestConfig {}

/// A raw selection definition as authored in the spec.
///
/// Unknown keys are ignored so future transform names pass through as
/// no-ops rather than failing the compile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSelection {
    #[serde(rename = "type")]
    pub kind: SelectionKind,
    pub level: Option<Level>,
    pub on: Option<String>,
    pub resolve: Option<Resolve>,
    pub project: Option<Projection>,
    pub toggle: Option<ConfigFlag<ToggleConfig>>,
    pub scales: Option<ConfigFlag<ScalesConfig>>,
    pub interval: Option<ConfigFlag<IntervalConfig>>,
    pub translate: Option<ConfigFlag<TranslateConfig>>,
    pub zoom: Option<ConfigFlag<ZoomConfig>>,
    pub nearest: Option<ConfigFlag<NearestConfig>>,
}

/// Raw selection map keyed by selection name.
///
/// A `BTreeMap` so the compile order (and therefore the output) is
/// deterministic regardless of authoring order.
pub type SelectionMap = BTreeMap<String, RawSelection>;

/// A fully-normalized selection: the read-only input to every assemble
/// pass. Produced fresh by the parse pass; the caller's raw spec is never
/// aliased or mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Scoped selection name, unique within the owning scope
    pub name: String,
    pub kind: SelectionKind,
    pub level: Level,

    /// Event-selector expression the selection triggers on
    pub on: String,

    /// Boolean expression the runtime filter evaluates per datum
    pub predicate: Option<String>,
    pub resolve: Resolve,
    pub project: Projection,
    pub toggle: Option<ToggleConfig>,
    pub scales: Option<ScalesConfig>,
    pub interval: Option<IntervalConfig>,
    pub translate: Option<TranslateConfig>,
    pub zoom: Option<ZoomConfig>,
    pub nearest: Option<NearestConfig>,
}

/// Name of the data store backing a selection.
///
/// Point selections are backed directly by their trigger signal and reuse
/// the selection name; set selections get a `_db` suffix.
pub fn store_name(sel: &Selection) -> String {
    match sel.kind {
        SelectionKind::Point => sel.name.clone(),
        SelectionKind::Set => format!("{}_db", sel.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(name: &str, kind: SelectionKind) -> Selection {
        Selection {
            name: name.to_string(),
            kind,
            level: Level::Data,
            on: "@cell:click".to_string(),
            predicate: None,
            resolve: Resolve::Single,
            project: Projection::Fields {
                fields: vec!["_id".to_string()],
            },
            toggle: None,
            scales: None,
            interval: None,
            translate: None,
            zoom: None,
            nearest: None,
        }
    }

    #[test]
    fn test_store_name() {
        let point = selection("pts", SelectionKind::Point);
        assert_eq!(store_name(&point), "pts");

        let set = selection("brush", SelectionKind::Set);
        assert_eq!(store_name(&set), "brush_db");
    }

    #[test]
    fn test_store_name_idempotent() {
        let set = selection("brush", SelectionKind::Set);
        assert_eq!(store_name(&set), store_name(&set));
    }

    #[test]
    fn test_raw_selection_from_json() {
        let raw: RawSelection =
            serde_json::from_str(r#"{"type": "set", "interval": {}, "resolve": "union_others"}"#)
                .unwrap();
        assert_eq!(raw.kind, SelectionKind::Set);
        assert_eq!(raw.resolve, Some(Resolve::UnionOthers));
        assert!(matches!(raw.interval, Some(ConfigFlag::Config(_))));
    }

    #[test]
    fn test_config_flag_forms() {
        let raw: RawSelection = serde_json::from_str(r#"{"type": "set", "toggle": true}"#).unwrap();
        assert_eq!(
            raw.toggle.unwrap().into_config(),
            Some(ToggleConfig::default())
        );

        let raw: RawSelection =
            serde_json::from_str(r#"{"type": "set", "toggle": false}"#).unwrap();
        assert_eq!(raw.toggle.unwrap().into_config(), None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw: Result<RawSelection, _> =
            serde_json::from_str(r#"{"type": "point", "lasso": {"granularity": 3}}"#);
        assert!(raw.is_ok());
    }

    #[test]
    fn test_projection_forms() {
        let p: Projection = serde_json::from_str(r#"{"channels": ["x", "y"]}"#).unwrap();
        assert!(matches!(p, Projection::Channels { .. }));

        let p: Projection = serde_json::from_str(r#"{"fields": ["_id"]}"#).unwrap();
        assert_eq!(p.fields(), vec!["_id".to_string()]);
    }

    #[test]
    fn test_projection_channel_field() {
        let p = Projection::Entries(vec![
            ProjectionEntry {
                channel: Some(Channel::X),
                field: "mass".to_string(),
            },
            ProjectionEntry {
                channel: Some(Channel::Y),
                field: "density".to_string(),
            },
        ]);
        assert_eq!(p.channel_field(Channel::X), Some("mass"));
        assert_eq!(p.channel_field(Channel::Y), Some("density"));
    }
}
