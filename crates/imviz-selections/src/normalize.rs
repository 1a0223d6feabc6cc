//! Normalizer: the parse pass
//!
//! Turns the raw selection map into fully-defaulted [`Selection`] values
//! and dispatches the enabled transforms' parse hooks. The caller's raw
//! spec is never aliased or mutated; every selection is built fresh.
//!
//! On a composite scope, entries resolving across panels are not
//! processed here: they are returned as deferred entries for the owning
//! leaf panels to pick up.

use imviz_events::parse_event_selector;

use crate::error::{CompileResult, Diagnostic};
use crate::scope::{event_name, Scope};
use crate::selection::{
    ConfigFlag, Level, Projection, RawSelection, Resolve, Selection, SelectionKind, SelectionMap,
    ToggleConfig, TranslateConfig,
};
use crate::transforms::{carries, TransformRegistry};

/// Result of the parse pass
#[derive(Debug, Default)]
pub struct ParseOutput {
    /// Fully-normalized selections, ready for assembly
    pub selections: Vec<Selection>,

    /// Entries this composite scope left for its leaf panels
    pub deferred: Vec<DeferredSelection>,

    /// Recoverable configuration diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

/// A selection entry a composite scope propagates to its leaves
#[derive(Debug, Clone)]
pub struct DeferredSelection {
    /// Spec key of the entry
    pub key: String,

    /// The cross-panel resolve strategy that deferred it
    pub resolve: Resolve,

    /// The raw definition, untouched
    pub raw: RawSelection,
}

/// Parse every entry of the raw selection map against the owning scope.
pub fn parse_selections(
    scope: &dyn Scope,
    select: &SelectionMap,
    registry: &TransformRegistry,
) -> CompileResult<ParseOutput> {
    let mut output = ParseOutput::default();

    for (key, raw) in select {
        let mut resolve = raw.resolve.unwrap_or_default();

        // Scale-bound selections are panel-global: they cannot resolve
        // across panels. The requested strategy is overridden, with a
        // diagnostic rather than silently.
        let scales_enabled = raw
            .scales
            .clone()
            .and_then(ConfigFlag::into_config)
            .is_some();
        if scales_enabled {
            if resolve != Resolve::Single {
                output
                    .diagnostics
                    .push(Diagnostic::resolve_overridden(scope.name(key), resolve));
            }
            resolve = Resolve::Single;
        }

        if scope.is_leaf() {
            resolve = Resolve::Single;
        } else if resolve != Resolve::Single {
            output.deferred.push(DeferredSelection {
                key: key.clone(),
                resolve,
                raw: raw.clone(),
            });
            continue;
        }

        output
            .selections
            .push(normalize_one(scope, key, raw, resolve, registry)?);
    }

    Ok(output)
}

/// Build one fully-defaulted selection and run the enabled parse hooks.
fn normalize_one(
    scope: &dyn Scope,
    key: &str,
    raw: &RawSelection,
    resolve: Resolve,
    registry: &TransformRegistry,
) -> CompileResult<Selection> {
    let kind = raw.kind;
    let scales = raw.scales.clone().and_then(ConfigFlag::into_config);
    let interval = raw.interval.clone().and_then(ConfigFlag::into_config);

    let on = match &raw.on {
        // Already a compound selector: scoping the whole string would
        // corrupt it, so it passes through verbatim.
        Some(fragment) if fragment.trim_start().starts_with('[') => fragment.clone(),
        Some(fragment) => event_name(scope, fragment),
        None => event_name(scope, "click"),
    };
    parse_event_selector(&on)?;

    let toggle = match &raw.toggle {
        Some(flag) => flag.clone().into_config(),
        None if kind == SelectionKind::Set && scales.is_none() && interval.is_none() => {
            Some(ToggleConfig::default())
        }
        None => None,
    };

    let project = raw.project.clone().unwrap_or_else(|| {
        if scales.is_some() || interval.is_some() {
            Projection::Channels {
                channels: vec![crate::selection::Channel::X, crate::selection::Channel::Y],
            }
        } else {
            Projection::Fields {
                fields: vec!["_id".to_string()],
            }
        }
    });

    // Explicit `"translate": false` survives as a disabled config so the
    // interval transform does not re-default it.
    let translate = raw.translate.clone().map(|flag| match flag {
        ConfigFlag::Flag(enabled) => TranslateConfig { enabled },
        ConfigFlag::Config(config) => config,
    });

    let mut sel = Selection {
        name: scope.name(key),
        kind,
        level: raw.level.unwrap_or(Level::Data),
        on,
        predicate: None,
        resolve,
        project,
        toggle,
        scales,
        interval,
        translate,
        zoom: raw.zoom.clone().and_then(ConfigFlag::into_config),
        nearest: raw.nearest.clone().and_then(ConfigFlag::into_config),
    };

    for transform in registry.iter() {
        if carries(&sel, transform.key()) {
            transform.parse(scope, &mut sel)?;
        }
    }

    Ok(sel)
}
