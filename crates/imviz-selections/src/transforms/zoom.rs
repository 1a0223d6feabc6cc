//! Zoom transform
//!
//! Emits a helper signal sampling wheel events over the panel: anchor
//! position plus wheel delta. The runtime rescales the selection (or its
//! bound scale domains) around the anchor.

use serde_json::json;

use crate::artifact::{EventStream, Signal};
use crate::error::CompileResult;
use crate::scope::{event_name, Scope};
use crate::selection::Selection;
use crate::transforms::{SelectionTransform, TransformKey};

/// Name of the wheel-sampling helper signal
pub fn zoom_name(sel: &Selection) -> String {
    format!("{}_zoom", sel.name)
}

pub struct Zoom;

impl SelectionTransform for Zoom {
    fn key(&self) -> TransformKey {
        TransformKey::Zoom
    }

    fn assemble_signals(
        &self,
        scope: &dyn Scope,
        sel: &Selection,
        _trigger: &mut Signal,
        _clear: &mut Signal,
        signals: &mut Vec<Signal>,
    ) -> CompileResult<()> {
        signals.push(Signal::new(zoom_name(sel), json!({})).with_stream(
            EventStream::new(
                event_name(scope, "wheel"),
                "{x: eventX(unit), y: eventY(unit), delta: event.deltaY, unit: unit}",
            ),
        ));
        Ok(())
    }
}
