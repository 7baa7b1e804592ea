//! Undo and redo across batches

use graybox::{CommandBatch, Engine, EngineConfig, Label};
use serde_json::{json, Value};

fn batch(commands: Value) -> CommandBatch {
    serde_json::from_value(json!({ "commands": commands })).unwrap()
}

fn export(engine: &mut Engine) -> String {
    engine
        .execute(&batch(json!([{ "tool": "export_state" }])))
        .unwrap()
        .state
        .unwrap()
}

fn seeded() -> Engine {
    let mut engine = Engine::default();
    engine
        .execute(&batch(json!([{
            "tool": "create_scene",
            "arguments": { "labels": ["A", "B", "C"], "placement": "grid", "size": 2 }
        }])))
        .unwrap();
    engine
}

#[test]
fn test_undo_restores_exact_snapshot() {
    let mut engine = seeded();
    let original = export(&mut engine);

    engine
        .execute(&batch(json!([
            { "tool": "move", "arguments": { "target": "A", "dx": 3.2, "dy": -1 } },
            { "tool": "scale", "arguments": { "target": "B", "factor": 1.7 } },
            { "tool": "rename_object", "arguments": { "target": "C", "new_label": "D" } }
        ])))
        .unwrap();
    let edited = export(&mut engine);
    assert_ne!(edited, original);

    engine.execute(&batch(json!([{ "tool": "undo" }]))).unwrap();
    assert_eq!(export(&mut engine), original);

    engine.execute(&batch(json!([{ "tool": "redo" }]))).unwrap();
    assert_eq!(export(&mut engine), edited);
}

#[test]
fn test_empty_stacks_report_errors() {
    let mut engine = Engine::default();
    let err = engine.execute(&batch(json!([{ "tool": "undo" }]))).unwrap_err();
    assert_eq!(err.code, "E_UNDO_EMPTY");
    let err = engine.execute(&batch(json!([{ "tool": "redo" }]))).unwrap_err();
    assert_eq!(err.code, "E_REDO_EMPTY");
}

#[test]
fn test_new_edit_clears_redo() {
    let mut engine = seeded();
    engine
        .execute(&batch(json!([{ "tool": "move", "arguments": { "target": "A", "dx": 1 } }])))
        .unwrap();
    engine.execute(&batch(json!([{ "tool": "undo" }]))).unwrap();
    assert!(engine.history().can_redo());

    engine
        .execute(&batch(json!([{ "tool": "move", "arguments": { "target": "B", "dy": 1 } }])))
        .unwrap();
    assert!(!engine.history().can_redo());
    let err = engine.execute(&batch(json!([{ "tool": "redo" }]))).unwrap_err();
    assert_eq!(err.code, "E_REDO_EMPTY");
}

#[test]
fn test_undo_inside_batch_then_edit() {
    let mut engine = seeded();
    let b_x = engine.scene().get(&Label::new("B").unwrap()).unwrap().x;

    // The move records the batch's entry and the undo consumes it; the
    // second move reuses the batch's entry and drops the pending redo
    engine
        .execute(&batch(json!([
            { "tool": "move", "arguments": { "target": "A", "dx": 1 } },
            { "tool": "undo" },
            { "tool": "move", "arguments": { "target": "B", "dx": 2 } }
        ])))
        .unwrap();
    assert_eq!(engine.history().undo_depth(), 1);
    assert!(!engine.history().can_redo());
    assert_eq!(engine.scene().get(&Label::new("B").unwrap()).unwrap().x, b_x + 2.0);

    engine.execute(&batch(json!([{ "tool": "undo" }]))).unwrap();
    assert!(engine.scene().is_empty());
}

#[test]
fn test_batch_pushes_at_most_one_entry() {
    let mut engine = seeded();
    engine
        .execute(&batch(json!([
            { "tool": "move", "arguments": { "target": "A", "dx": 1 } },
            { "tool": "undo" },
            { "tool": "move", "arguments": { "target": "A", "dx": 1 } },
            { "tool": "redo" },
            { "tool": "add_object", "arguments": { "label": "D", "x": 20, "y": 20 } }
        ])))
        .unwrap_err();
    assert_eq!(engine.history().undo_depth(), 1);

    engine
        .execute(&batch(json!([
            { "tool": "move", "arguments": { "target": "A", "dx": 1 } },
            { "tool": "undo" },
            { "tool": "move", "arguments": { "target": "A", "dx": 1 } },
            { "tool": "undo" },
            { "tool": "add_object", "arguments": { "label": "D", "x": 20, "y": 20 } }
        ])))
        .unwrap();
    assert_eq!(engine.history().undo_depth(), 0);
    assert_eq!(engine.scene().len(), 1);
}

#[test]
fn test_failed_undo_keeps_state() {
    let mut engine = seeded();
    let original = export(&mut engine);
    let err = engine
        .execute(&batch(json!([
            { "tool": "undo" },
            { "tool": "undo" }
        ])))
        .unwrap_err();
    assert_eq!(err.code, "E_UNDO_EMPTY");
    assert_eq!(export(&mut engine), original);
    assert_eq!(engine.history().undo_depth(), 1);
}

#[test]
fn test_history_limit_drops_oldest() {
    let config = EngineConfig {
        history_limit: Some(2),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);
    for index in 0..4 {
        let label = format!("B{}", index);
        engine
            .execute(&batch(json!([
                { "tool": "add_object", "arguments": { "label": label, "x": 5 } }
            ])))
            .unwrap();
    }
    assert_eq!(engine.scene().len(), 4);
    assert_eq!(engine.history().undo_depth(), 2);

    engine
        .execute(&batch(json!([{ "tool": "undo" }, { "tool": "undo" }])))
        .unwrap();
    assert_eq!(engine.scene().len(), 2);
}
