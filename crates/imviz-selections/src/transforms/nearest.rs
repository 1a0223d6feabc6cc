//! Nearest transform (snap picks to the nearest datum)
//!
//! Tags the selection's event binding with a `nearest` filter marker; the
//! runtime resolves the tagged event's datum to the nearest point instead
//! of requiring a direct hit. Multi-stage gestures are left alone: their
//! datum resolution is positional, not pick-based.

use imviz_events::{parse_event_selector, EventSelector};

use crate::error::CompileResult;
use crate::scope::Scope;
use crate::selection::Selection;
use crate::transforms::{SelectionTransform, TransformKey};

const NEAREST_FILTER: &str = "nearest";

pub struct Nearest;

impl SelectionTransform for Nearest {
    fn key(&self) -> TransformKey {
        TransformKey::Nearest
    }

    fn parse(&self, _scope: &dyn Scope, sel: &mut Selection) -> CompileResult<()> {
        if let EventSelector::Single(mut stage) = parse_event_selector(&sel.on)? {
            if !stage.has_filter(NEAREST_FILTER) {
                stage.add_filter(NEAREST_FILTER);
                sel.on = stage.to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::PanelScope;
    use crate::selection::{Level, NearestConfig, Projection, Resolve, SelectionKind};

    fn selection(on: &str) -> Selection {
        Selection {
            name: "pts".to_string(),
            kind: SelectionKind::Point,
            level: Level::Data,
            on: on.to_string(),
            predicate: None,
            resolve: Resolve::Single,
            project: Projection::Entries(Vec::new()),
            toggle: None,
            scales: None,
            interval: None,
            translate: None,
            zoom: None,
            nearest: Some(NearestConfig::default()),
        }
    }

    #[test]
    fn test_tags_single_event() {
        let scope = PanelScope::leaf("");
        let mut sel = selection("@cell:mousemove");
        Nearest.parse(&scope, &mut sel).unwrap();
        assert_eq!(sel.on, "@cell:mousemove[nearest]");

        // Idempotent on a second parse.
        Nearest.parse(&scope, &mut sel).unwrap();
        assert_eq!(sel.on, "@cell:mousemove[nearest]");
    }

    #[test]
    fn test_leaves_gestures_alone() {
        let scope = PanelScope::leaf("");
        let on = "[@cell:mousedown, window:mouseup] > window:mousemove";
        let mut sel = selection(on);
        Nearest.parse(&scope, &mut sel).unwrap();
        assert_eq!(sel.on, on);
    }
}
