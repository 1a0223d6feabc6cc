//! Translate transform (draggable brush body)
//!
//! Emits a helper signal sampling drag positions that start on the brush
//! rectangle itself; the runtime uses consecutive samples to move the
//! stored interval. Only meaningful alongside an interval selection.

use serde_json::json;

use imviz_events::{EventSelector, EventStage};

use crate::artifact::{EventStream, Signal};
use crate::error::CompileResult;
use crate::scope::Scope;
use crate::selection::Selection;
use crate::transforms::interval::brush_name;
use crate::transforms::{SelectionTransform, TransformKey};

/// Name of the drag-sampling helper signal
pub fn translate_name(sel: &Selection) -> String {
    format!("{}_translate", sel.name)
}

pub struct Translate;

impl SelectionTransform for Translate {
    fn key(&self) -> TransformKey {
        TransformKey::Translate
    }

    fn assemble_signals(
        &self,
        _scope: &dyn Scope,
        sel: &Selection,
        _trigger: &mut Signal,
        _clear: &mut Signal,
        signals: &mut Vec<Signal>,
    ) -> CompileResult<()> {
        if sel.interval.is_none() {
            return Ok(());
        }

        // Drags starting on the brush body, sampled until mouseup.
        let gesture = EventSelector::gesture(
            EventStage::scoped(brush_name(sel), "mousedown"),
            EventStage::source("window", "mouseup"),
            EventStage::source("window", "mousemove"),
        );

        signals.push(Signal::new(translate_name(sel), json!({})).with_stream(
            EventStream::new(
                gesture.to_string(),
                "{x: eventX(unit), y: eventY(unit), unit: unit}",
            ),
        ));

        Ok(())
    }
}
