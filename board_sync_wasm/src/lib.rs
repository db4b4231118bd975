// Improvement potential: Pass visual ops as JS objects (e.g. via `serde-wasm-bindgen`)
//   instead of JSON strings.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

#[macro_use]
pub mod web_error_handling;

use std::sync::mpsc;

use board_sync::{
    CanvasSize, ClientState, Color, Coord, DragError, EngineConfig, GameUpdate, MoveRequest,
    PieceId, PlayerNum, ScreenPoint, VisualOp,
};
use wasm_bindgen::prelude::*;

use crate::web_error_handling::JsResult;


fn ops_to_json(ops: &[VisualOp]) -> JsResult<String> {
    serde_json::to_string(ops).map_err(|err| rust_error!("Cannot serialize visual ops: {err}"))
}

// Board of the current game as seen by one browser tab. Every mutating call returns the
// visual ops to execute as a JSON array; move requests are collected separately and
// should be drained via `next_outgoing_event` after each call.
#[wasm_bindgen]
pub struct WebBoard {
    state: ClientState,
    requests_rx: mpsc::Receiver<MoveRequest>,
}

#[wasm_bindgen]
impl WebBoard {
    // `my_player` is `undefined` for observers. `config` is a JSON-serialized
    // `EngineConfig`; defaults are used when it is missing.
    pub fn new_board(
        my_player: Option<u8>, canvas_width: f64, canvas_height: f64, config: Option<String>,
    ) -> JsResult<WebBoard> {
        let config = match config {
            Some(config) => serde_json::from_str::<EngineConfig>(&config)
                .map_err(|err| rust_error!("Invalid engine config: {err}"))?,
            None => EngineConfig::default(),
        };
        let canvas = CanvasSize { width: canvas_width, height: canvas_height };
        let (requests_tx, requests_rx) = mpsc::channel();
        Ok(WebBoard {
            state: ClientState::new(my_player.map(PlayerNum), canvas, config, requests_tx),
            requests_rx,
        })
    }

    pub fn process_server_event(&mut self, event: &str) -> JsResult<String> {
        let update: GameUpdate = serde_json::from_str(event)
            .map_err(|err| rust_error!("Cannot parse server event: {err}"))?;
        let ops = self.state.process_update(update).map_err(|err| rust_error!("{err}"))?;
        ops_to_json(&ops)
    }

    pub fn set_orientation(&mut self, inverted: bool) -> JsResult<String> {
        let ops = self.state.set_orientation(inverted).map_err(|err| rust_error!("{err}"))?;
        ops_to_json(&ops)
    }

    // `color` is a JSON-serialized `Color`, or `undefined` to remove the highlight.
    pub fn set_tile_highlight(&mut self, x: u8, y: u8, color: Option<String>) -> JsResult<String> {
        let color = color
            .map(|color| serde_json::from_str::<Color>(&color))
            .transpose()
            .map_err(|err| rust_error!("Invalid color: {err}"))?;
        ops_to_json(&self.state.set_tile_highlight(Coord::new(x, y), color))
    }
    pub fn clear_tile_highlights(&mut self) -> JsResult<String> {
        ops_to_json(&self.state.clear_tile_highlights())
    }

    pub fn start_drag_piece(&mut self, id: &str) -> JsResult<()> {
        match self.state.start_drag_piece(&PieceId::from(id)) {
            Ok(()) => Ok(()),
            // Ignore: the UI may offer a piece that was locked a moment ago.
            Err(DragError::PieceLocked(_)) => Ok(()),
            Err(err) => Err(rust_error!("Drag&drop error: {err}")),
        }
    }
    pub fn drag_piece_drop(&mut self, left: f64, top: f64) -> JsResult<()> {
        match self.state.drag_piece_drop(ScreenPoint::new(left, top)) {
            Ok(_) => Ok(()),
            // Ignore: the drag was superseded by a board rebuild or a lock.
            Err(DragError::NoDragInProgress | DragError::UnknownPiece(_)) => Ok(()),
            Err(err) => Err(rust_error!("Drag&drop error: {err}")),
        }
    }
    pub fn abort_drag_piece(&mut self) { self.state.abort_drag_piece(); }
    pub fn drag_state(&self) -> Option<String> {
        self.state.dragged_piece().map(|id| id.to_string())
    }

    // Returns "x,y" of the tile under the point, if any. Useful for drag-over effects.
    pub fn tile_at(&self, left: f64, top: f64) -> Option<String> {
        let coord = self.state.engine().to_logical(ScreenPoint::new(left, top))?;
        Some(format!("{},{}", coord.x, coord.y))
    }

    // Serialized `MoveRequest` for `requestMove`, or `undefined` when there are none left.
    pub fn next_outgoing_event(&mut self) -> JsResult<Option<String>> {
        match self.requests_rx.try_recv() {
            Ok(request) => serde_json::to_string(&request)
                .map(Some)
                .map_err(|err| rust_error!("Cannot serialize move request: {err}")),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => panic!("Request channel disconnected"),
        }
    }
}
