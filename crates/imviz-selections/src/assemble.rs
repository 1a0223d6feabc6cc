//! Assembly passes and the compile orchestrator
//!
//! Assembly reads the parsed selection set and produces the three output
//! collections. Signals and stores are independent of each other; marks
//! run last because brush marks reference store names.
//!
//! Cross-panel bookkeeping (which selections already emitted signals or
//! stores when a composite propagates one logical selection to several
//! leaves) lives in an explicit [`EmittedSet`] threaded by the caller,
//! never on the selections themselves.

use std::collections::BTreeSet;

use serde_json::json;

use crate::artifact::{root_signal, unit_signal, EventStream, Mark, Signal, Store};
use crate::error::{CompileResult, Diagnostic};
use crate::normalize::{parse_selections, ParseOutput};
use crate::scope::Scope;
use crate::selection::{store_name, Selection, SelectionKind, SelectionMap};
use crate::transforms::TransformRegistry;

/// Names of selections that already emitted signals/stores during this
/// compile invocation.
#[derive(Debug, Default)]
pub struct EmittedSet {
    signals: BTreeSet<String>,
    stores: BTreeSet<String>,
}

impl EmittedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal emission; false if this selection already emitted
    fn mark_signals(&mut self, name: &str) -> bool {
        self.signals.insert(name.to_string())
    }

    /// Record a store emission; false if this selection already emitted
    fn mark_store(&mut self, name: &str) -> bool {
        self.stores.insert(name.to_string())
    }
}

/// Build the trigger/clear signal pair for every selection and fold in
/// the enabled transforms' signal hooks.
///
/// An empty incoming `signals` collection marks the outermost compile
/// call: the baseline `vlRoot`/`unit` panel-context signals are prepended
/// so interval math can do inverse-scale lookups through nested groups.
pub fn assemble_signals(
    scope: &dyn Scope,
    selections: &[Selection],
    registry: &TransformRegistry,
    emitted: &mut EmittedSet,
    signals: &mut Vec<Signal>,
) -> CompileResult<()> {
    let root = signals.is_empty();

    for sel in selections {
        if !emitted.mark_signals(&sel.name) {
            continue;
        }

        let mut trigger = Signal::new(&sel.name, json!({}))
            .with_stream(EventStream::new(sel.on.clone(), ""));
        let mut clear = Signal::new(format!("{}_clear", sel.name), json!(true))
            .with_stream(EventStream::new(sel.on.clone(), "true"));

        for transform in registry.enabled(sel) {
            transform.assemble_signals(scope, sel, &mut trigger, &mut clear, signals)?;
        }

        if trigger.name.is_some() {
            signals.push(trigger);
        }

        // The clear signal only matters when a store backs the selection;
        // transforms suppress it when they upsert instead.
        if sel.kind == SelectionKind::Set && clear.name.is_some() {
            signals.push(clear);
        }
    }

    if root {
        signals.insert(0, unit_signal());
        signals.insert(0, root_signal());
    }

    Ok(())
}

/// Build the store definition for every set-kind selection and fold in
/// the enabled transforms' data hooks. Stores are prepended; relative
/// order among them is stable.
pub fn assemble_data(
    scope: &dyn Scope,
    selections: &[Selection],
    registry: &TransformRegistry,
    emitted: &mut EmittedSet,
    stores: &mut Vec<Store>,
) {
    for sel in selections {
        if sel.kind != SelectionKind::Set {
            continue;
        }
        if !emitted.mark_store(&sel.name) {
            continue;
        }

        let mut store = Store::with_clear(store_name(sel), format!("{}_clear", sel.name));
        for transform in registry.enabled(sel) {
            transform.assemble_data(scope, sel, &mut store, stores);
        }
        stores.insert(0, store);
    }
}

/// Thread the children accumulator through every enabled mark hook.
///
/// The accumulator starts as a copy of the top-level mark collection and
/// receives the supplementary marks; the top-level collection itself is
/// read-only and never modified.
pub fn assemble_marks(
    scope: &dyn Scope,
    selections: &[Selection],
    registry: &TransformRegistry,
    marks: &[Mark],
) -> Vec<Mark> {
    let mut children: Vec<Mark> = marks.to_vec();
    for sel in selections {
        for transform in registry.enabled(sel) {
            children = transform.assemble_marks(scope, sel, marks, children);
        }
    }
    children
}

/// Everything one compile invocation produces
#[derive(Debug, Default)]
pub struct CompileOutput {
    pub signals: Vec<Signal>,
    pub stores: Vec<Store>,

    /// The mark children list: the input top-level marks plus the
    /// supplementary selection marks
    pub marks: Vec<Mark>,

    /// Recoverable configuration diagnostics from the parse pass
    pub diagnostics: Vec<Diagnostic>,
}

/// The selection compiler: a transform registry plus the pass order.
///
/// Stateless across invocations; every compile builds its outputs fresh.
pub struct Compiler {
    registry: TransformRegistry,
}

impl Compiler {
    /// Compiler with the built-in transform registry
    pub fn new() -> Self {
        Self {
            registry: TransformRegistry::new(),
        }
    }

    /// Compiler with a custom registry (for testing)
    pub fn with_registry(registry: TransformRegistry) -> Self {
        Self { registry }
    }

    /// Run the parse pass only
    pub fn parse(&self, scope: &dyn Scope, select: &SelectionMap) -> CompileResult<ParseOutput> {
        parse_selections(scope, select, &self.registry)
    }

    /// Run all passes for one scope: parse, then signals and data, then
    /// marks.
    pub fn compile(
        &self,
        scope: &dyn Scope,
        select: &SelectionMap,
        marks: &[Mark],
    ) -> CompileResult<CompileOutput> {
        let parsed = self.parse(scope, select)?;
        let mut emitted = EmittedSet::new();

        let mut signals = Vec::new();
        assemble_signals(
            scope,
            &parsed.selections,
            &self.registry,
            &mut emitted,
            &mut signals,
        )?;

        let mut stores = Vec::new();
        assemble_data(
            scope,
            &parsed.selections,
            &self.registry,
            &mut emitted,
            &mut stores,
        );

        let children = assemble_marks(scope, &parsed.selections, &self.registry, marks);

        Ok(CompileOutput {
            signals,
            stores,
            marks: children,
            diagnostics: parsed.diagnostics,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
