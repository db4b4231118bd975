use std::fmt;
use std::sync::mpsc;

use log::{debug, warn};

use crate::coord::{Coord, TileKey};
use crate::display::{BoardOrientation, CanvasSize, ScreenPoint};
use crate::engine::{BoardSyncEngine, EngineConfig};
use crate::error::SyncError;
use crate::event::{GameState, GameUpdate, MoveRequest, PieceState};
use crate::highlight::{Color, HighlightLayer, PREVIEW_COLOR};
use crate::piece::{PieceId, PlayerNum};
use crate::visual::VisualOp;


#[derive(Clone, PartialEq, Debug)]
pub enum EventError {
    CannotApplyEvent(SyncError),
    // A partial update arrived before any full snapshot.
    NoGameInProgress,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::CannotApplyEvent(err) => write!(f, "Cannot apply event: {err}"),
            EventError::NoGameInProgress => write!(f, "No game in progress"),
        }
    }
}

impl std::error::Error for EventError {}

impl From<SyncError> for EventError {
    fn from(err: SyncError) -> Self { EventError::CannotApplyEvent(err) }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DragError {
    UnknownPiece(PieceId),
    PieceLocked(PieceId),
    DragAlreadyInProgress,
    NoDragInProgress,
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragError::UnknownPiece(id) => write!(f, "Piece {id} is not on the board"),
            DragError::PieceLocked(id) => write!(f, "Piece {id} cannot be moved now"),
            DragError::DragAlreadyInProgress => write!(f, "Another piece is being dragged"),
            DragError::NoDragInProgress => write!(f, "No piece is being dragged"),
        }
    }
}

impl std::error::Error for DragError {}


// Glue between the external state store, the engine and the outbound `requestMove`.
// Updates are applied strictly in the order they are passed in.
pub struct ClientState {
    // `None` for observers.
    my_player: Option<PlayerNum>,
    canvas: CanvasSize,
    engine: BoardSyncEngine,
    requests_tx: mpsc::Sender<MoveRequest>,
    // Latest authoritative state with partial updates folded in. Needed to rebuild the
    // board on orientation change.
    game_state: Option<GameState>,
    drag: Option<PieceId>,
}

impl ClientState {
    pub fn new(
        my_player: Option<PlayerNum>, canvas: CanvasSize, config: EngineConfig,
        requests_tx: mpsc::Sender<MoveRequest>,
    ) -> Self {
        ClientState {
            my_player,
            canvas,
            engine: BoardSyncEngine::new(config),
            requests_tx,
            game_state: None,
            drag: None,
        }
    }

    pub fn my_player(&self) -> Option<PlayerNum> { self.my_player }
    pub fn engine(&self) -> &BoardSyncEngine { &self.engine }
    pub fn game_state(&self) -> Option<&GameState> { self.game_state.as_ref() }
    pub fn dragged_piece(&self) -> Option<&PieceId> { self.drag.as_ref() }

    pub fn process_update(&mut self, update: GameUpdate) -> Result<Vec<VisualOp>, EventError> {
        match update {
            GameUpdate::State(state) => self.process_snapshot(state),
            update => self.process_partial_update(update),
        }
    }

    fn process_partial_update(&mut self, update: GameUpdate) -> Result<Vec<VisualOp>, EventError> {
        let state = self.game_state.as_mut().ok_or(EventError::NoGameInProgress)?;
        let mut ops = vec![];
        match update {
            GameUpdate::State(_) => unreachable!("Snapshots are handled by `process_snapshot`"),
            GameUpdate::PieceMoved { piece } => {
                state.pieces.retain(|p| p.id != piece.id && p.location() != piece.location);
                state.pieces.push(PieceState::from_update(&piece));
                ops.extend(self.engine.apply_move(&piece));
                // Keep the folded state in step with the engine, so that a later rebuild
                // does not resurrect a stale last move or check.
                state.last_turn = self.engine.last_turn();
                let checks = self.engine.highlights().layer(HighlightLayer::Check);
                state.in_check_kings.retain(|&coord| checks.contains_key(&TileKey::from(coord)));
            }
            GameUpdate::PieceRemoved { id } => {
                state.pieces.retain(|p| p.id != id);
                ops.extend(self.engine.delete_piece(&id));
            }
            GameUpdate::TurnChanged { to_move } => {
                state.to_move = Some(to_move);
                ops.extend(self.update_locks());
            }
            GameUpdate::GameOver { winner } => {
                state.winner = Some(winner);
                ops.extend(self.update_locks());
            }
            GameUpdate::LegalMoves { from, to } => {
                ops.extend(self.engine.clear_tile_highlights());
                if !to.is_empty() {
                    ops.extend(self.engine.set_tile_highlight(from, Some(PREVIEW_COLOR)));
                }
                for coord in to {
                    ops.extend(self.engine.set_tile_highlight(coord, Some(PREVIEW_COLOR)));
                }
            }
        }
        self.drop_stale_drag();
        Ok(ops)
    }

    fn process_snapshot(&mut self, state: GameState) -> Result<Vec<VisualOp>, EventError> {
        let mut ops = if self.engine.is_initialized() {
            self.engine.sync_snapshot(&state)?
        } else {
            self.engine.initialize(self.engine.orientation(), self.canvas, &state)?
        };
        self.game_state = Some(state);
        ops.extend(self.update_locks());
        self.drop_stale_drag();
        Ok(ops)
    }

    // Game over locks everything; otherwise only the viewer's own pieces are draggable
    // and only on their turn.
    fn update_locks(&mut self) -> Vec<VisualOp> {
        let Some(state) = &self.game_state else {
            return vec![];
        };
        let (winner, to_move) = (state.winner, state.to_move);
        let mut ops = vec![];
        match (winner, to_move, self.my_player) {
            (Some(winner), _, _) => {
                ops.extend(self.engine.lock_all_pieces());
                ops.extend(self.engine.display_winner(winner));
            }
            (None, Some(to_move), Some(me)) if to_move == me => {
                ops.extend(self.engine.unlock_pieces(me));
            }
            _ => ops.extend(self.engine.lock_all_pieces()),
        }
        ops
    }

    pub fn set_orientation(&mut self, inverted: bool) -> Result<Vec<VisualOp>, EventError> {
        let orientation = BoardOrientation::from_inverted(inverted);
        let mut ops = match &self.game_state {
            Some(state) => self.engine.set_orientation(orientation, state)?,
            // Nothing on the canvas yet, so the engine only records the orientation.
            None => self.engine.set_orientation(orientation, &GameState::default())?,
        };
        if !ops.is_empty() {
            // The rebuild supersedes any drag in progress and hides the winner overlay.
            self.drag = None;
            ops.extend(self.update_locks());
        }
        Ok(ops)
    }

    pub fn set_tile_highlight(&mut self, coord: Coord, color: Option<Color>) -> Vec<VisualOp> {
        self.engine.set_tile_highlight(coord, color)
    }
    pub fn clear_tile_highlights(&mut self) -> Vec<VisualOp> { self.engine.clear_tile_highlights() }

    pub fn start_drag_piece(&mut self, id: &PieceId) -> Result<(), DragError> {
        if self.drag.is_some() {
            return Err(DragError::DragAlreadyInProgress);
        }
        let record = self.engine.piece(id).ok_or_else(|| DragError::UnknownPiece(id.clone()))?;
        if record.locked {
            return Err(DragError::PieceLocked(id.clone()));
        }
        self.drag = Some(id.clone());
        Ok(())
    }

    pub fn abort_drag_piece(&mut self) { self.drag = None; }

    // Translates the drop point into a move request and hands it to `requestMove`.
    // Dropping outside the board or back onto the origin tile cancels the drag. The
    // engine is not touched: the server-confirmed update will move the piece.
    pub fn drag_piece_drop(
        &mut self, point: ScreenPoint,
    ) -> Result<Option<MoveRequest>, DragError> {
        let id = self.drag.take().ok_or(DragError::NoDragInProgress)?;
        let record = self.engine.piece(&id).ok_or_else(|| DragError::UnknownPiece(id.clone()))?;
        let Some(dest) = self.engine.to_logical(point) else {
            debug!("{id} dropped outside the board");
            return Ok(None);
        };
        if dest == record.location {
            return Ok(None);
        }
        let request = MoveRequest { x: dest.x, y: dest.y, id };
        if self.requests_tx.send(request.clone()).is_err() {
            warn!("Move request {request:?} dropped: nobody is listening");
        }
        Ok(Some(request))
    }

    fn drop_stale_drag(&mut self) {
        if let Some(id) = &self.drag {
            if self.engine.piece(id).is_none_or(|record| record.locked) {
                self.drag = None;
            }
        }
    }
}
