//! Scales transform (selection bound to scale domains)
//!
//! Records the scale names backing each projected channel so the runtime
//! can rebind scale domains from the selection's state. Forcing the
//! resolve strategy to `single` (scale domains are panel-global) is the
//! normalizer's job and happens before this hook runs.

use crate::error::CompileResult;
use crate::scope::Scope;
use crate::selection::Selection;
use crate::transforms::{SelectionTransform, TransformKey};

pub struct Scales;

impl SelectionTransform for Scales {
    fn key(&self) -> TransformKey {
        TransformKey::Scales
    }

    fn parse(&self, scope: &dyn Scope, sel: &mut Selection) -> CompileResult<()> {
        let bound = sel
            .project
            .entries()
            .iter()
            .filter_map(|e| e.channel)
            .map(|channel| (channel, scope.scale_name(channel)))
            .collect();

        if let Some(scales) = sel.scales.as_mut() {
            scales.bound = bound;
        }
        Ok(())
    }
}
