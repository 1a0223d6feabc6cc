//! Interval (brush) selection transform
//!
//! Synthesizes the three-stage drag gesture, derives inverse-scale data
//! extents for each projected channel, upserts one interval record per
//! panel, and renders the brush rectangle.

use serde_json::json;

use imviz_events::{parse_event_selector, EventSelector, EventStage};

use crate::artifact::{
    EventStream, Mark, MarkProperties, MarkProperty, MarkSource, MarkType, ModifyOp, Signal, Store,
};
use crate::error::CompileResult;
use crate::expr::quote;
use crate::scope::Scope;
use crate::selection::{store_name, Channel, Selection, TranslateConfig};
use crate::transforms::{SelectionTransform, TransformKey};

const MIN: &str = "min_";
const MAX: &str = "max_";
const SIZE: &str = "size_";

/// Filter predicate excluding events that originate on a brush body, so
/// dragging an existing brush does not start a new one.
pub const BRUSH_FILTER: &str = "!eventItem().isBrush";

/// Name of the rectangle mark visualizing a selection's brush
pub fn brush_name(sel: &Selection) -> String {
    format!("{}_brush", sel.name)
}

fn start_name(sel: &Selection) -> String {
    format!("{}_start", sel.name)
}

fn end_name(sel: &Selection) -> String {
    format!("{}_end", sel.name)
}

/// The canonical drag gesture: panel-scoped mousedown (excluding brush
/// bodies) through windowed mousemove until windowed mouseup.
fn canonical_gesture(scope: &dyn Scope) -> EventSelector {
    EventSelector::gesture(
        EventStage::scoped(scope.name("cell"), "mousedown").with_filter(BRUSH_FILTER),
        EventStage::source("window", "mouseup"),
        EventStage::source("window", "mousemove"),
    )
}

/// Scale/field pair for one projected channel
fn channel_binding(scope: &dyn Scope, sel: &Selection, channel: Channel) -> Option<(String, String)> {
    sel.project
        .channel_field(channel)
        .map(|field| (scope.scale_name(channel), field.to_string()))
}

pub struct Interval;

impl SelectionTransform for Interval {
    fn key(&self) -> TransformKey {
        TransformKey::Interval
    }

    fn parse(&self, scope: &dyn Scope, sel: &mut Selection) -> CompileResult<()> {
        match parse_event_selector(&sel.on)? {
            // No explicit drag-start stage: use the canonical gesture.
            EventSelector::Single(_) => {
                sel.on = canonical_gesture(scope).to_string();
            }
            // Custom gesture: make sure the start stage excludes events
            // originating on an existing brush body.
            EventSelector::Gesture { mut start, end, middle } => {
                if !start.has_filter(BRUSH_FILTER) {
                    start.add_filter(BRUSH_FILTER);
                }
                sel.on = EventSelector::gesture(start, end, middle).to_string();
            }
        }

        sel.predicate = Some(format!(
            "inrangeselection({}, datum, {}, {})",
            quote(&store_name(sel)),
            quote(sel.resolve.as_str()),
            quote(&scope.name(""))
        ));

        if sel.translate.is_none() {
            sel.translate = Some(TranslateConfig::default());
        }

        Ok(())
    }

    fn assemble_signals(
        &self,
        scope: &dyn Scope,
        sel: &Selection,
        trigger: &mut Signal,
        clear: &mut Signal,
        signals: &mut Vec<Signal>,
    ) -> CompileResult<()> {
        let unit_name = quote(&scope.name(""));
        let selector = parse_event_selector(&sel.on)?;
        let start_stream = selector
            .start()
            .map(|s| s.to_string())
            .unwrap_or_else(|| sel.on.clone());
        let (start, end) = (start_name(sel), end_name(sel));

        // Pointer position clamped to the plot bounds, plus the panel the
        // gesture originated in.
        let sample = format!(
            "{{x: clamp(eventX(unit), 0, unit.width), \
             y: clamp(eventY(unit), 0, unit.height), unit: unit, \
             unitName: {}}}",
            unit_name
        );

        let x = channel_binding(scope, sel, Channel::X);
        let y = channel_binding(scope, sel, Channel::Y);

        signals.push(
            Signal::new(&start, json!({"expr": "{unit: unit}"}))
                .with_stream(EventStream::new(start_stream, sample.clone())),
        );

        signals.push(
            Signal::new(&end, json!({}))
                .with_stream(EventStream::new(start.clone(), start.clone()))
                .with_stream(EventStream::new(sel.on.clone(), sample)),
        );

        // The trigger now carries the data extents of the brush: per
        // projected channel, start/end pixels inverse-mapped through the
        // channel's scale against the root group context.
        let mut parts = Vec::new();
        if let Some((scale, field)) = &x {
            parts.push(format!(
                "{MIN}{field}: iscale({}, {start}.x, vlRoot)",
                quote(scale)
            ));
        }
        if let Some((scale, field)) = &y {
            parts.push(format!(
                "{MIN}{field}: iscale({}, {start}.y, vlRoot)",
                quote(scale)
            ));
        }
        if let Some((scale, field)) = &x {
            parts.push(format!(
                "{MAX}{field}: iscale({}, {end}.x, vlRoot)",
                quote(scale)
            ));
        }
        if let Some((scale, field)) = &y {
            parts.push(format!(
                "{MAX}{field}: iscale({}, {end}.y, vlRoot)",
                quote(scale)
            ));
        }
        if let Some((_, field)) = &x {
            parts.push(format!("{SIZE}{field}: abs({start}.x - {end}.x)"));
        }
        if let Some((_, field)) = &y {
            parts.push(format!("{SIZE}{field}: abs({start}.y - {end}.y)"));
        }
        if let Some((_, field)) = &x {
            parts.push(format!("x: {}", quote(field)));
        }
        if let Some((_, field)) = &y {
            parts.push(format!("y: {}", quote(field)));
        }
        parts.push(format!("_unitID: {start}.unit._id"));
        parts.push(format!("unitName: {unit_name}"));

        trigger.streams[0] = EventStream::new(
            format!("{start}, {end}"),
            format!("{{{}}}", parts.join(", ")),
        );

        // Intervals are upserted, never discretely cleared: an idle brush
        // is the absence of a matching record, which preserves other
        // panels' rectangles under cross-panel resolution.
        clear.suppress();

        Ok(())
    }

    fn assemble_data(
        &self,
        _scope: &dyn Scope,
        sel: &Selection,
        store: &mut Store,
        _stores: &mut Vec<Store>,
    ) {
        // One live interval record per panel, updated in place.
        store.modify = vec![ModifyOp::upsert(sel.name.clone(), "_unitID")];
    }

    fn assemble_marks(
        &self,
        scope: &dyn Scope,
        sel: &Selection,
        _top: &[Mark],
        mut children: Vec<Mark>,
    ) -> Vec<Mark> {
        let x = sel.project.channel_field(Channel::X).map(str::to_string);
        let y = sel.project.channel_field(Channel::Y).map(str::to_string);
        let owns = format!("datum.unitName == {}", quote(&scope.name("")));

        let mut properties = MarkProperties::default();
        properties
            .enter
            .insert("fill".to_string(), MarkProperty::value(json!("grey")));
        properties
            .enter
            .insert("fillOpacity".to_string(), MarkProperty::value(json!(0.2)));
        // Lets the gesture's start filter recognize brush bodies.
        properties
            .enter
            .insert("isBrush".to_string(), MarkProperty::value(json!(true)));

        // Branch 1 renders the real geometry when the record belongs to
        // this panel; branch 2 collapses foreign records to zero size.
        // Unprojected axes span the full plot extent.
        let gated = |real: MarkProperty| vec![real.with_test(owns.clone()), MarkProperty::value(json!(0))];

        properties.update.insert(
            "x".to_string(),
            gated(match &x {
                Some(field) => {
                    MarkProperty::scaled(scope.scale_name(Channel::X), format!("{MIN}{field}"))
                }
                None => MarkProperty::value(json!(0)),
            }),
        );
        properties.update.insert(
            "x2".to_string(),
            gated(match &x {
                Some(field) => {
                    MarkProperty::scaled(scope.scale_name(Channel::X), format!("{MAX}{field}"))
                }
                None => MarkProperty::group(scope.plot_width_field()),
            }),
        );
        properties.update.insert(
            "y".to_string(),
            gated(match &y {
                Some(field) => {
                    MarkProperty::scaled(scope.scale_name(Channel::Y), format!("{MIN}{field}"))
                }
                None => MarkProperty::value(json!(0)),
            }),
        );
        properties.update.insert(
            "y2".to_string(),
            gated(match &y {
                Some(field) => {
                    MarkProperty::scaled(scope.scale_name(Channel::Y), format!("{MAX}{field}"))
                }
                None => MarkProperty::group(scope.plot_height_field()),
            }),
        );

        children.push(Mark {
            name: brush_name(sel),
            mark_type: MarkType::Rect,
            from: MarkSource {
                data: store_name(sel),
            },
            properties,
        });

        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::PropertyRef;
    use crate::scope::PanelScope;
    use crate::selection::{
        IntervalConfig, Level, Projection, ProjectionEntry, Resolve, SelectionKind,
    };

    fn scope() -> PanelScope {
        PanelScope::leaf("")
            .bind(Channel::X, "mass")
            .bind(Channel::Y, "density")
    }

    fn interval_selection() -> Selection {
        Selection {
            name: "brush".to_string(),
            kind: SelectionKind::Set,
            level: Level::Data,
            on: "@cell:click".to_string(),
            predicate: None,
            resolve: Resolve::Single,
            project: Projection::Entries(vec![
                ProjectionEntry {
                    channel: Some(Channel::X),
                    field: "mass".to_string(),
                },
                ProjectionEntry {
                    channel: Some(Channel::Y),
                    field: "density".to_string(),
                },
            ]),
            toggle: None,
            scales: None,
            interval: Some(IntervalConfig::default()),
            translate: None,
            zoom: None,
            nearest: None,
        }
    }

    #[test]
    fn test_parse_synthesizes_gesture() {
        let scope = scope();
        let mut sel = interval_selection();
        Interval.parse(&scope, &mut sel).unwrap();
        assert_eq!(
            sel.on,
            "[@cell:mousedown[!eventItem().isBrush], window:mouseup] > window:mousemove"
        );
    }

    #[test]
    fn test_parse_injects_brush_filter() {
        let scope = scope();
        let mut sel = interval_selection();
        sel.on = "[@cell:mousedown[event.shiftKey], window:mouseup] > window:mousemove".to_string();
        Interval.parse(&scope, &mut sel).unwrap();
        assert_eq!(
            sel.on,
            "[@cell:mousedown[event.shiftKey][!eventItem().isBrush], window:mouseup] > window:mousemove"
        );
    }

    #[test]
    fn test_parse_keeps_existing_filter() {
        let scope = scope();
        let mut sel = interval_selection();
        let on = "[@cell:mousedown[!eventItem().isBrush], window:mouseup] > window:mousemove";
        sel.on = on.to_string();
        Interval.parse(&scope, &mut sel).unwrap();
        assert_eq!(sel.on, on);
    }

    #[test]
    fn test_parse_predicate_and_translate() {
        let scope = scope();
        let mut sel = interval_selection();
        sel.resolve = Resolve::Union;
        Interval.parse(&scope, &mut sel).unwrap();
        assert_eq!(
            sel.predicate.as_deref(),
            Some("inrangeselection('brush_db', datum, 'union', '')")
        );
        assert_eq!(sel.translate, Some(TranslateConfig { enabled: true }));
    }

    #[test]
    fn test_parse_keeps_disabled_translate() {
        let scope = scope();
        let mut sel = interval_selection();
        sel.translate = Some(TranslateConfig { enabled: false });
        Interval.parse(&scope, &mut sel).unwrap();
        assert_eq!(sel.translate, Some(TranslateConfig { enabled: false }));
    }

    #[test]
    fn test_signals_rewrite_trigger_and_suppress_clear() {
        let scope = scope();
        let mut sel = interval_selection();
        Interval.parse(&scope, &mut sel).unwrap();

        let mut trigger = Signal::new("brush", json!({}))
            .with_stream(EventStream::new(sel.on.clone(), ""));
        let mut clear = Signal::new("brush_clear", json!(true));
        let mut signals = Vec::new();
        Interval
            .assemble_signals(&scope, &sel, &mut trigger, &mut clear, &mut signals)
            .unwrap();

        assert!(clear.name.is_none());
        let names: Vec<&str> = signals.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["brush_start", "brush_end"]);

        assert_eq!(trigger.streams[0].on, "brush_start, brush_end");
        let expr = &trigger.streams[0].expr;
        assert!(expr.contains("min_mass: iscale('x', brush_start.x, vlRoot)"));
        assert!(expr.contains("max_density: iscale('y', brush_end.y, vlRoot)"));
        assert!(expr.contains("size_mass: abs(brush_start.x - brush_end.x)"));
        assert!(expr.contains("_unitID: brush_start.unit._id"));
    }

    #[test]
    fn test_x_only_interval_never_references_y() {
        let scope = PanelScope::leaf("").bind(Channel::X, "mass");
        let mut sel = interval_selection();
        sel.project = Projection::Entries(vec![ProjectionEntry {
            channel: Some(Channel::X),
            field: "mass".to_string(),
        }]);
        Interval.parse(&scope, &mut sel).unwrap();

        let mut trigger = Signal::new("brush", json!({}))
            .with_stream(EventStream::new(sel.on.clone(), ""));
        let mut clear = Signal::new("brush_clear", json!(true));
        let mut signals = Vec::new();
        Interval
            .assemble_signals(&scope, &sel, &mut trigger, &mut clear, &mut signals)
            .unwrap();

        let expr = &trigger.streams[0].expr;
        assert!(!expr.contains("density"));
        assert!(!expr.contains("min_density"));
        assert!(expr.contains("min_mass"));

        let children = Interval.assemble_marks(&scope, &sel, &[], Vec::new());
        let mark = &children[0];
        // The unprojected axis spans the full plot height.
        let y2 = &mark.properties.update["y2"][0];
        assert_eq!(
            y2.value,
            PropertyRef::Group {
                field: crate::artifact::GroupField {
                    group: "height".to_string()
                }
            }
        );
        let y = &mark.properties.update["y"][0];
        assert_eq!(y.value, PropertyRef::Value { value: json!(0) });
    }

    #[test]
    fn test_upsert_by_panel_identity() {
        let scope = scope();
        let sel = interval_selection();
        let mut store = Store::with_clear("brush_db", "brush_clear");
        let mut stores = Vec::new();
        Interval.assemble_data(&scope, &sel, &mut store, &mut stores);
        assert_eq!(store.modify, vec![ModifyOp::upsert("brush", "_unitID")]);
    }

    #[test]
    fn test_brush_mark_geometry() {
        let scope = scope();
        let sel = interval_selection();
        let children = Interval.assemble_marks(&scope, &sel, &[], Vec::new());
        assert_eq!(children.len(), 1);

        let mark = &children[0];
        assert_eq!(mark.name, "brush_brush");
        assert_eq!(mark.from.data, "brush_db");
        assert_eq!(
            mark.properties.enter["fill"],
            MarkProperty::value(json!("grey"))
        );
        assert_eq!(
            mark.properties.enter["fillOpacity"],
            MarkProperty::value(json!(0.2))
        );

        for prop in ["x", "x2", "y", "y2"] {
            let branches = &mark.properties.update[prop];
            assert_eq!(branches.len(), 2);
            assert_eq!(branches[0].test.as_deref(), Some("datum.unitName == ''"));
            // Foreign-panel records collapse to zero.
            assert_eq!(branches[1], MarkProperty::value(json!(0)));
        }
        assert_eq!(
            mark.properties.update["x"][0].value,
            PropertyRef::Scale {
                scale: "x".to_string(),
                field: "min_mass".to_string()
            }
        );
        assert_eq!(
            mark.properties.update["y2"][0].value,
            PropertyRef::Scale {
                scale: "y".to_string(),
                field: "max_density".to_string()
            }
        );
    }
}
