//! End-to-end tests for the sentiscope engine.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use sentiscope::{
    records_from_json, ColorBy, DisplayOptions, ElementId, Engine, Overlay, Scene, TickMode, View,
};
use sentiscope_core::{
    Canvas, DrawCommand, Event, MouseButton, Point, Record, RecordId, RecordingCanvas,
};
use sentiscope_layout::FrameStatus;

fn six_records() -> Vec<Record> {
    let rows = [
        (1, "March", -0.6),
        (2, "March", -0.2),
        (3, "March", 0.4),
        (4, "May", 0.1),
        (5, "May", 0.7),
        (6, "May", -0.9),
    ];
    rows.iter()
        .map(|&(id, month, sentiment)| {
            Record::new(id)
                .month(month)
                .sentiment(sentiment)
                .raw_text(format!("tweet {id}"))
        })
        .collect()
}

fn node_center(engine: &Engine, id: u64) -> Point {
    match engine.scene() {
        Some(Scene::Scatter(scene)) => scene.node(RecordId(id)).unwrap().center,
        other => panic!("Expected scatter scene, got {other:?}"),
    }
}

fn click(engine: &mut Engine, id: u64) {
    let position = node_center(engine, id);
    assert!(engine.handle_event(&Event::MouseDown {
        position,
        button: MouseButton::Left,
    }));
}

// =============================================================================
// Scatter
// =============================================================================

#[test]
fn test_six_records_end_to_end() {
    let records = six_records();
    let mut engine = Engine::new(DisplayOptions::default());
    engine.set_records(records.clone());
    let mut canvas = RecordingCanvas::new();
    engine.render(&mut canvas).unwrap();

    let nodes: Vec<(Point, sentiscope_core::Color)> = canvas
        .circles()
        .filter_map(|(center, _, style)| style.fill.map(|fill| (center, fill)))
        .collect();
    assert_eq!(nodes.len(), 6);

    // Two vertical clusters, one per month.
    let (march, may): (Vec<_>, Vec<_>) = records
        .iter()
        .map(|r| (r, node_center(&engine, r.index.0)))
        .partition(|(r, _)| r.month == "March");
    for (_, center) in &march {
        assert!((center.y - 150.0).abs() < 25.0, "March node at {center:?}");
    }
    for (_, center) in &may {
        assert!((center.y - 600.0).abs() < 25.0, "May node at {center:?}");
    }

    // Fill is partitioned by the sign of the sentiment.
    for record in &records {
        let center = node_center(&engine, record.index.0);
        let (_, fill) = nodes.iter().find(|(c, _)| *c == center).unwrap();
        if record.sentiment < 0.0 {
            assert!(fill.r > fill.g, "negative record {} not red-ish", record.index);
        } else {
            assert!(fill.g > fill.r, "positive record {} not green-ish", record.index);
        }
    }

    // Month labels sit left of their clusters.
    let texts: Vec<&str> = canvas.texts().collect();
    assert!(texts.contains(&"March") && texts.contains(&"May"));
}

#[test]
fn test_selection_most_recent_first() {
    let mut engine = Engine::new(DisplayOptions::default());
    engine.set_records(six_records());
    engine.render(&mut RecordingCanvas::new()).unwrap();

    let last: Rc<RefCell<Vec<RecordId>>> = Rc::default();
    let sink = Rc::clone(&last);
    engine.subscribe(move |ids| *sink.borrow_mut() = ids.to_vec());

    for id in [3, 1, 2] {
        click(&mut engine, id);
    }
    let expected = vec![RecordId(2), RecordId(1), RecordId(3)];
    assert_eq!(engine.selection(), expected.as_slice());
    assert_eq!(*last.borrow(), expected);

    // Clicking twice restores the previous selection.
    click(&mut engine, 5);
    click(&mut engine, 5);
    assert_eq!(*last.borrow(), expected);

    // Selected nodes get outlines and appear in the panel in order.
    let mut canvas = RecordingCanvas::new();
    engine.render(&mut canvas).unwrap();
    let outlines = canvas.circles().filter(|(_, _, s)| s.stroke.is_some()).count();
    assert_eq!(outlines, 3);
    let texts: Vec<&str> = canvas.texts().collect();
    let order: Vec<usize> = ["tweet 2", "tweet 1", "tweet 3"]
        .iter()
        .map(|t| texts.iter().position(|x| x == t).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_recolor_changes_fill_only() {
    let mut engine = Engine::new(DisplayOptions::default());
    engine.set_records(six_records());
    let mut before = RecordingCanvas::new();
    engine.render(&mut before).unwrap();

    engine.set_options(DisplayOptions {
        color_by: ColorBy::Subjectivity,
        ..DisplayOptions::default()
    });
    let mut after = RecordingCanvas::new();
    engine.render(&mut after).unwrap();

    let geometry = |canvas: &RecordingCanvas| -> Vec<(Point, f32)> {
        canvas.circles().map(|(c, r, _)| (c, r)).collect()
    };
    assert_eq!(geometry(&before), geometry(&after));
    assert!(after.texts().any(|t| t == "Subjectivity"));
    assert!(!after.texts().any(|t| t == "Sentiment"));
}

#[test]
fn test_empty_records_render_clear_only() {
    let mut engine = Engine::new(DisplayOptions::default());
    engine.set_records(Vec::new());
    let mut canvas = RecordingCanvas::new();
    canvas.fill_rect(sentiscope_core::Rect::new(0.0, 0.0, 5.0, 5.0), sentiscope_core::Color::RED);
    engine.render(&mut canvas).unwrap();
    assert!(canvas.is_empty());
    assert_eq!(canvas.clear_count(), 1);
}

#[test]
fn test_animated_layout_then_teardown() {
    let mut engine = Engine::new(DisplayOptions {
        tick_mode: TickMode::Animated { ticks_per_frame: 10 },
        ..DisplayOptions::default()
    });
    engine.set_records(six_records());

    let mut frames = 0;
    while engine.on_frame().unwrap().wants_frame() {
        frames += 1;
        assert!(frames < 100, "animation never settled");
    }
    // 120 ticks at 10 per frame.
    assert_eq!(frames, 11);

    let center = node_center(&engine, 1);
    assert!((center.y - 150.0).abs() < 25.0);

    engine.teardown();
    assert_eq!(engine.on_frame().unwrap(), FrameStatus::Stopped);
    assert!(engine.hover().overlay().is_none());
}

// =============================================================================
// Streamgraph
// =============================================================================

fn stream_engine() -> Engine {
    let json = r#"[
        {"Date": "2024-03-01", "GPT-4": 0.8, "Claude": "0.7"},
        {"Date": "2024-04-01", "GPT-4": 0.5, "Claude": 0.9},
        {"Date": "2024-05-01", "GPT-4": 0.6, "Claude": 0.4}
    ]"#;
    let options = DisplayOptions {
        view: View::Streamgraph,
        group_key_set: vec!["GPT-4".to_string(), "Claude".to_string()],
        height: 400.0,
        ..DisplayOptions::default()
    };
    let records = records_from_json(json, &options.group_key_set).unwrap();
    assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2024, 5, 1));
    let mut engine = Engine::new(options);
    engine.set_records(records);
    engine
}

fn layer_probe(engine: &Engine, index: usize) -> Point {
    match engine.scene() {
        Some(Scene::Streamgraph(scene)) => {
            let outline = &scene.layer(index).unwrap().outline;
            let top = outline[8];
            let bottom = outline[outline.len() - 9];
            Point::new(top.x, (top.y + bottom.y) / 2.0)
        }
        other => panic!("Expected streamgraph scene, got {other:?}"),
    }
}

#[test]
fn test_streamgraph_render() {
    let mut engine = stream_engine();
    let mut canvas = RecordingCanvas::new();
    engine.render(&mut canvas).unwrap();
    let polygons = canvas
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
        .count();
    assert_eq!(polygons, 2);
    let texts: Vec<&str> = canvas.texts().collect();
    for label in ["Mar", "Apr", "May", "GPT-4", "Claude"] {
        assert!(texts.contains(&label), "missing {label}");
    }
}

#[test]
fn test_hover_teardown_between_layers() {
    let mut engine = stream_engine();
    engine.render(&mut RecordingCanvas::new()).unwrap();

    let first = layer_probe(&engine, 0);
    assert!(engine.handle_event(&Event::MouseMove { position: first }));
    assert_eq!(engine.hover().target(), Some(ElementId::Layer(0)));
    match engine.hover().overlay() {
        Some(Overlay::BarChart(chart)) => {
            assert_eq!(chart.key(), "GPT-4");
            assert_eq!(chart.bars().len(), 3);
        }
        other => panic!("Expected bar chart, got {other:?}"),
    }

    assert!(engine.handle_event(&Event::MouseLeave));
    assert!(engine.hover().overlay().is_none());

    let second = layer_probe(&engine, 1);
    engine.handle_event(&Event::MouseMove { position: second });
    match engine.hover().overlay() {
        Some(Overlay::BarChart(chart)) => assert_eq!(chart.key(), "Claude"),
        other => panic!("Expected bar chart, got {other:?}"),
    }

    // The painted overlay holds exactly one chart.
    let mut canvas = RecordingCanvas::new();
    engine.render(&mut canvas).unwrap();
    let mar_labels = canvas.texts().filter(|t| *t == "Mar").count();
    assert_eq!(mar_labels, 2, "one on the month axis, one in the chart");
}

#[test]
fn test_streamgraph_clicks_do_not_select() {
    let mut engine = stream_engine();
    engine.render(&mut RecordingCanvas::new()).unwrap();
    let probe = layer_probe(&engine, 0);
    assert!(!engine.handle_event(&Event::MouseDown {
        position: probe,
        button: MouseButton::Left,
    }));
    assert!(engine.selection().is_empty());
}
