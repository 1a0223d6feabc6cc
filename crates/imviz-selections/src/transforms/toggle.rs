//! Toggle transform (multi-click accumulation)
//!
//! Captures the projected fields of each picked datum and accumulates the
//! records in the selection's store: the default clear rule wipes the
//! store on a plain click, then the insert rule adds the new pick. The
//! runtime's toggle evaluation removes a record that is picked twice.

use crate::artifact::{ModifyOp, Signal, Store};
use crate::error::CompileResult;
use crate::expr::{field_list, object, quote};
use crate::scope::Scope;
use crate::selection::{store_name, Selection};
use crate::transforms::{SelectionTransform, TransformKey};

pub struct Toggle;

impl SelectionTransform for Toggle {
    fn key(&self) -> TransformKey {
        TransformKey::Toggle
    }

    fn parse(&self, _scope: &dyn Scope, sel: &mut Selection) -> CompileResult<()> {
        let fields = sel.project.fields();
        sel.predicate = Some(format!(
            "indata({}, datum, {})",
            quote(&store_name(sel)),
            field_list(&fields)
        ));
        Ok(())
    }

    fn assemble_signals(
        &self,
        _scope: &dyn Scope,
        sel: &Selection,
        trigger: &mut Signal,
        _clear: &mut Signal,
        _signals: &mut Vec<Signal>,
    ) -> CompileResult<()> {
        // The trigger carries the projected fields of the picked datum.
        let pairs: Vec<String> = sel
            .project
            .fields()
            .iter()
            .map(|f| format!("{f}: eventItem().datum.{f}"))
            .collect();
        trigger.streams[0].expr = object(&pairs);
        Ok(())
    }

    fn assemble_data(
        &self,
        _scope: &dyn Scope,
        sel: &Selection,
        store: &mut Store,
        _stores: &mut Vec<Store>,
    ) {
        store.modify.push(ModifyOp::insert(sel.name.clone()));
    }
}
