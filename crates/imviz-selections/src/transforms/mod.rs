//! Selection transform plugins
//!
//! Each transform independently contributes behavior to a selection
//! through up to four capability hooks, dispatched in fixed registration
//! order by the parse and assemble passes:
//!
//! - [`SelectionTransform::parse`]: enrich the normalized definition
//!   (rewrite the event binding, derive the predicate, ...)
//! - [`SelectionTransform::assemble_signals`]: reshape the trigger/clear
//!   pair or add helper signals
//! - [`SelectionTransform::assemble_data`]: replace or extend the store's
//!   mutation rules
//! - [`SelectionTransform::assemble_marks`]: append supplementary marks
//!
//! The default implementations are no-ops, so a transform implements only
//! the capabilities it has. A hook runs only when the selection carries
//! the transform's configuration key.

pub mod interval;
pub mod nearest;
pub mod project;
pub mod scales;
pub mod toggle;
pub mod translate;
pub mod zoom;

use crate::artifact::{Mark, Signal, Store};
use crate::error::CompileResult;
use crate::scope::Scope;
use crate::selection::Selection;

/// Identifies a transform and the configuration key that enables it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKey {
    Project,
    Toggle,
    Scales,
    Interval,
    Translate,
    Zoom,
    Nearest,
}

impl TransformKey {
    /// The configuration key on the selection definition
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKey::Project => "project",
            TransformKey::Toggle => "toggle",
            TransformKey::Scales => "scales",
            TransformKey::Interval => "interval",
            TransformKey::Translate => "translate",
            TransformKey::Zoom => "zoom",
            TransformKey::Nearest => "nearest",
        }
    }
}

/// Check whether a selection carries a transform's configuration.
///
/// Projections are always carried: the normalizer guarantees a default.
pub fn carries(sel: &Selection, key: TransformKey) -> bool {
    match key {
        TransformKey::Project => true,
        TransformKey::Toggle => sel.toggle.is_some(),
        TransformKey::Scales => sel.scales.is_some(),
        TransformKey::Interval => sel.interval.is_some(),
        TransformKey::Translate => sel.translate.as_ref().is_some_and(|t| t.enabled),
        TransformKey::Zoom => sel.zoom.is_some(),
        TransformKey::Nearest => sel.nearest.is_some(),
    }
}

/// A selection transform plugin. All hooks default to no-ops.
pub trait SelectionTransform {
    /// The configuration key this transform is enabled by
    fn key(&self) -> TransformKey;

    /// Enrich a freshly-normalized selection in place
    fn parse(&self, _scope: &dyn Scope, _sel: &mut Selection) -> CompileResult<()> {
        Ok(())
    }

    /// Contribute to the selection's trigger/clear signal pair, or push
    /// additional signals
    fn assemble_signals(
        &self,
        _scope: &dyn Scope,
        _sel: &Selection,
        _trigger: &mut Signal,
        _clear: &mut Signal,
        _signals: &mut Vec<Signal>,
    ) -> CompileResult<()> {
        Ok(())
    }

    /// Contribute to the selection's store definition
    fn assemble_data(
        &self,
        _scope: &dyn Scope,
        _sel: &Selection,
        _store: &mut Store,
        _stores: &mut Vec<Store>,
    ) {
    }

    /// Append supplementary marks to the children accumulator. The
    /// top-level mark collection is read-only.
    fn assemble_marks(
        &self,
        _scope: &dyn Scope,
        _sel: &Selection,
        _top: &[Mark],
        children: Vec<Mark>,
    ) -> Vec<Mark> {
        children
    }
}

/// Ordered registry of selection transforms.
///
/// The registration order is part of the compile contract: hooks always
/// run project, toggle, scales, interval, translate, zoom, nearest.
pub struct TransformRegistry {
    transforms: Vec<Box<dyn SelectionTransform>>,
}

impl TransformRegistry {
    /// Create a registry with all built-in transforms in contract order
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(project::Project));
        registry.register(Box::new(toggle::Toggle));
        registry.register(Box::new(scales::Scales));
        registry.register(Box::new(interval::Interval));
        registry.register(Box::new(translate::Translate));
        registry.register(Box::new(zoom::Zoom));
        registry.register(Box::new(nearest::Nearest));
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a transform; later registrations run after earlier ones
    pub fn register(&mut self, transform: Box<dyn SelectionTransform>) {
        self.transforms.push(transform);
    }

    /// Iterate all transforms in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn SelectionTransform> {
        self.transforms.iter().map(|t| t.as_ref())
    }

    /// Iterate the transforms whose configuration the selection carries
    pub fn enabled<'a>(
        &'a self,
        sel: &'a Selection,
    ) -> impl Iterator<Item = &'a dyn SelectionTransform> {
        self.iter().filter(|t| carries(sel, t.key()))
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
