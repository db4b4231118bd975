// Run with `wasm-pack test --node board_sync_wasm`.
#![cfg(target_arch = "wasm32")]

use board_sync_wasm::WebBoard;
use board_sync_wasm::web_error_handling::{
    RustError, last_panic, make_rust_error_report, set_panic_hook,
};
use wasm_bindgen::convert::TryFromJsValue;
use wasm_bindgen_test::*;


const SNAPSHOT: &str = r#"{
    "type": "State",
    "board": {"width": 2, "height": 2},
    "pieces": [{"id": "k", "owner": 0, "x": 0, "y": 1, "piece_type": "k"}],
    "to_move": 0
}"#;

fn ops(json: &str) -> Vec<serde_json::Value> { serde_json::from_str(json).unwrap() }

#[wasm_bindgen_test]
fn snapshot_produces_ops() {
    let mut board = WebBoard::new_board(Some(0), 200., 200., None).unwrap();
    let ops = ops(&board.process_server_event(SNAPSHOT).unwrap());
    let count = |op: &str| ops.iter().filter(|o| o["op"] == op).count();
    assert_eq!(count("AddTile"), 4);
    assert_eq!(count("AddPiece"), 1);
    assert_eq!(count("SetPieceLock"), 1);
}

#[wasm_bindgen_test]
fn drop_queues_move_request() {
    let mut board = WebBoard::new_board(Some(0), 200., 200., None).unwrap();
    board.process_server_event(SNAPSHOT).unwrap();
    board.start_drag_piece("k").unwrap();
    assert_eq!(board.drag_state(), Some("k".to_owned()));
    board.drag_piece_drop(150., 150.).unwrap();
    let request: serde_json::Value =
        serde_json::from_str(&board.next_outgoing_event().unwrap().unwrap()).unwrap();
    assert_eq!(request, serde_json::json!({"x": 1, "y": 1, "id": "k"}));
    assert_eq!(board.next_outgoing_event().unwrap(), None);
}

#[wasm_bindgen_test]
fn inverted_hit_testing() {
    let mut board = WebBoard::new_board(None, 200., 200., None).unwrap();
    board.set_orientation(true).unwrap();
    board.process_server_event(SNAPSHOT).unwrap();
    assert_eq!(board.tile_at(10., 10.), Some("1,1".to_owned()));
    assert_eq!(board.tile_at(250., 10.), None);
}

#[wasm_bindgen_test]
fn bad_event_is_an_error() {
    let mut board = WebBoard::new_board(None, 200., 200., None).unwrap();
    assert!(board.process_server_event("{\"type\": \"Nope\"}").is_err());
    assert!(board.process_server_event("{\"type\": \"TurnChanged\", \"to_move\": 1}").is_err());
}

#[wasm_bindgen_test]
fn invalid_config_reaches_js_as_rust_error() {
    let err = WebBoard::new_board(None, 200., 200., Some("{\"check_color\": 7}".to_owned()))
        .err()
        .unwrap();
    let err = RustError::try_from_js_value(err).unwrap();
    assert!(err.message.starts_with("Invalid engine config: "), "{}", err.message);
    let report: serde_json::Value =
        serde_json::from_str(&make_rust_error_report(err.clone()).unwrap()).unwrap();
    assert_eq!(report, serde_json::json!({"RustError": {"message": err.message}}));
}

#[wasm_bindgen_test]
fn no_panic_report_without_panic() {
    set_panic_hook();
    set_panic_hook();
    assert_eq!(last_panic().unwrap(), None);
}
