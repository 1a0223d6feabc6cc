//! Owning-scope boundary
//!
//! The broader chart compiler owns the panel/model hierarchy; this module
//! defines the narrow contract the selection compiler needs from it:
//! scoped naming, channel/scale lookups, and leaf-vs-composite shape.

use std::collections::BTreeMap;

use crate::selection::Channel;

/// Contract exposed by the owning scope (a plot panel or a composition
/// of panels).
pub trait Scope {
    /// Build a scoped name from a suffix. The empty suffix yields the
    /// scope's own name.
    fn name(&self, suffix: &str) -> String;

    /// Name of the scale bound to a channel
    fn scale_name(&self, channel: Channel) -> String;

    /// Data field encoded on a channel, if any
    fn field(&self, channel: Channel) -> Option<String>;

    /// Whether this scope is a single non-composable leaf panel
    fn is_leaf(&self) -> bool;

    /// Group field holding the panel's plot width
    fn plot_width_field(&self) -> &str {
        "width"
    }

    /// Group field holding the panel's plot height
    fn plot_height_field(&self) -> &str {
        "height"
    }
}

/// Event-selector fragment scoped to the panel's cell group:
/// `@<panel>_cell:<fragment>`.
pub fn event_name(scope: &dyn Scope, fragment: &str) -> String {
    format!("@{}:{}", scope.name("cell"), fragment)
}

/// A straightforward [`Scope`] implementation describing one panel (or a
/// composite scope) by its name prefix and channel bindings.
#[derive(Debug, Clone, Default)]
pub struct PanelScope {
    prefix: String,
    fields: BTreeMap<Channel, String>,
    scales: BTreeMap<Channel, String>,
    leaf: bool,
}

impl PanelScope {
    /// Create a leaf panel scope with the given name prefix (may be empty
    /// for a root-level panel)
    pub fn leaf(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            leaf: true,
            ..Self::default()
        }
    }

    /// Create a composite (multi-panel) scope
    pub fn composite(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            leaf: false,
            ..Self::default()
        }
    }

    /// Bind a channel to a data field; the scale name defaults to the
    /// scoped channel name
    pub fn bind(mut self, channel: Channel, field: impl Into<String>) -> Self {
        self.fields.insert(channel, field.into());
        self
    }

    /// Bind a channel to a data field with an explicit scale name
    pub fn bind_scaled(
        mut self,
        channel: Channel,
        field: impl Into<String>,
        scale: impl Into<String>,
    ) -> Self {
        self.fields.insert(channel, field.into());
        self.scales.insert(channel, scale.into());
        self
    }
}

impl Scope for PanelScope {
    fn name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else if suffix.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }

    fn scale_name(&self, channel: Channel) -> String {
        self.scales
            .get(&channel)
            .cloned()
            .unwrap_or_else(|| self.name(channel.as_str()))
    }

    fn field(&self, channel: Channel) -> Option<String> {
        self.fields.get(&channel).cloned()
    }

    fn is_leaf(&self) -> bool {
        self.leaf
    }
}
