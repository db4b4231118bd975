// Client-side board state: which tiles and pieces are on the canvas, where, and how they
// are highlighted. Every mutating method returns the visual ops a renderer has to execute
// to catch up; the renderer never reads logical state directly.
//
// Lifecycle: `initialize` (and `set_orientation` with a new value) rebuilds everything
// from a snapshot. Between rebuilds all updates are incremental and keyed by piece id.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, TileKey, TileKind};
use crate::display::{BoardLayout, BoardOrientation, CanvasSize, ScreenPoint};
use crate::error::SyncError;
use crate::event::{GameState, LastTurn};
use crate::highlight::{
    CHECK_COLOR, Color, DARK_TILE_COLOR, DISABLED_TILE_COLOR, HighlightLayer, HighlightState,
    LAST_MOVE_COLOR, LIGHT_TILE_COLOR,
};
use crate::piece::{LockPolicy, PieceId, PieceRecord, PieceUpdate, PlayerNum};
use crate::visual::VisualOp;


#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub light_tile_color: Color,
    pub dark_tile_color: Color,
    pub disabled_tile_color: Color,
    pub last_move_color: Color,
    pub check_color: Color,
    // Whether a rebuild highlights `last_turn` from the snapshot. Off by default: after
    // a reload the user has not seen that move happen.
    pub highlight_last_turn_on_load: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            light_tile_color: LIGHT_TILE_COLOR,
            dark_tile_color: DARK_TILE_COLOR,
            disabled_tile_color: DISABLED_TILE_COLOR,
            last_move_color: LAST_MOVE_COLOR,
            check_color: CHECK_COLOR,
            highlight_last_turn_on_load: false,
        }
    }
}

impl EngineConfig {
    pub fn tile_color(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Light => self.light_tile_color,
            TileKind::Dark => self.dark_tile_color,
            TileKind::Disabled => self.disabled_tile_color,
        }
    }
}


pub struct BoardSyncEngine {
    config: EngineConfig,
    orientation: BoardOrientation,
    // Both set by `initialize`; `None` before that.
    canvas: Option<CanvasSize>,
    layout: Option<BoardLayout>,
    tiles: BTreeMap<TileKey, TileKind>,
    pieces: BTreeMap<PieceId, PieceRecord>,
    // Where each piece visual currently is. Always has the same keys as `pieces`.
    piece_positions: BTreeMap<PieceId, ScreenPoint>,
    highlights: HighlightState,
    // Last move known to the engine, whether or not it is highlighted.
    last_turn: Option<LastTurn>,
    lock_policy: LockPolicy,
    winner: Option<PlayerNum>,
}

impl BoardSyncEngine {
    pub fn new(config: EngineConfig) -> Self {
        BoardSyncEngine {
            config,
            orientation: BoardOrientation::Normal,
            canvas: None,
            layout: None,
            tiles: BTreeMap::new(),
            pieces: BTreeMap::new(),
            piece_positions: BTreeMap::new(),
            highlights: HighlightState::new(),
            last_turn: None,
            lock_policy: LockPolicy::default(),
            winner: None,
        }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn orientation(&self) -> BoardOrientation { self.orientation }
    pub fn layout(&self) -> Option<&BoardLayout> { self.layout.as_ref() }
    pub fn is_initialized(&self) -> bool { self.layout.is_some() }
    pub fn tiles(&self) -> impl Iterator<Item = (TileKey, TileKind)> + '_ {
        self.tiles.iter().map(|(&key, &kind)| (key, kind))
    }
    pub fn pieces(&self) -> impl Iterator<Item = &PieceRecord> + '_ { self.pieces.values() }
    pub fn piece(&self, id: &PieceId) -> Option<&PieceRecord> { self.pieces.get(id) }
    pub fn piece_position(&self, id: &PieceId) -> Option<ScreenPoint> {
        self.piece_positions.get(id).copied()
    }
    pub fn piece_at(&self, coord: Coord) -> Option<&PieceRecord> {
        self.pieces.values().find(|record| record.location == coord)
    }
    pub fn highlights(&self) -> &HighlightState { &self.highlights }
    pub fn lock_policy(&self) -> LockPolicy { self.lock_policy }
    pub fn winner(&self) -> Option<PlayerNum> { self.winner }
    pub fn last_turn(&self) -> Option<LastTurn> { self.last_turn }

    pub fn to_screen(&self, coord: Coord) -> Option<ScreenPoint> {
        let layout = self.layout?;
        layout.shape().contains(coord).then(|| layout.to_screen(self.orientation, coord))
    }

    pub fn to_logical(&self, point: ScreenPoint) -> Option<Coord> {
        self.layout?.to_logical(self.orientation, point)
    }

    // Rebuilds the board from scratch. Calling it again with the same arguments yields
    // the same records: everything from the previous session is torn down first.
    pub fn initialize(
        &mut self, orientation: BoardOrientation, canvas: CanvasSize, state: &GameState,
    ) -> Result<Vec<VisualOp>, SyncError> {
        let mut ops = self.rebuild(orientation, canvas, state)?;
        self.last_turn = state.last_turn;
        if self.config.highlight_last_turn_on_load {
            ops.extend(self.highlight_last_turn(state.last_turn));
        }
        ops.extend(self.highlight_checks(&state.in_check_kings));
        Ok(ops)
    }

    // Tiles and pieces only; leaves every highlight layer empty.
    fn rebuild(
        &mut self, orientation: BoardOrientation, canvas: CanvasSize, state: &GameState,
    ) -> Result<Vec<VisualOp>, SyncError> {
        let shape = state.board.shape()?;
        let layout = BoardLayout::new(shape, canvas)?;
        let mut ops = self.teardown();
        self.orientation = orientation;
        self.canvas = Some(canvas);
        self.layout = Some(layout);
        info!(
            "Building {}x{} board, orientation {:?}, tile size {:?}",
            shape.width,
            shape.height,
            orientation,
            layout.tile_size()
        );

        for coord in shape.coords() {
            let key = TileKey::from(coord);
            let kind = state.tile_kind(coord);
            self.tiles.insert(key, kind);
            ops.push(VisualOp::AddTile {
                key,
                position: layout.to_screen(orientation, coord),
                size: layout.tile_size(),
                kind,
                color: self.config.tile_color(kind),
            });
        }

        for update in dedup_pieces(state, layout) {
            let (_, piece_ops) = self.place_piece(layout, &update, true);
            ops.extend(piece_ops);
        }
        Ok(ops)
    }

    // A no-op unless the orientation actually changes. Flipping rebuilds everything:
    // every screen position changes anyway, and a full rebuild cannot leave half-flipped
    // visuals behind (e.g. from a drag in progress). Last-move and check highlights are
    // carried over as they were; the preview is dropped.
    pub fn set_orientation(
        &mut self, orientation: BoardOrientation, state: &GameState,
    ) -> Result<Vec<VisualOp>, SyncError> {
        if orientation == self.orientation {
            return Ok(vec![]);
        }
        match self.canvas {
            Some(canvas) => {
                let last_turn = self.last_turn;
                let mut last_move = self.highlights.layer(HighlightLayer::LastMove).clone();
                let mut check = self.highlights.layer(HighlightLayer::Check).clone();
                let mut ops = self.rebuild(orientation, canvas, state)?;
                last_move.retain(|key, _| self.tiles.contains_key(key));
                check.retain(|key, _| self.tiles.contains_key(key));
                self.last_turn = last_turn;
                ops.extend(self.highlights.replace(HighlightLayer::LastMove, last_move));
                ops.extend(self.highlights.replace(HighlightLayer::Check, check));
                Ok(ops)
            }
            None => {
                self.orientation = orientation;
                Ok(vec![])
            }
        }
    }

    // Applies a server-confirmed move (or insertion) of a single piece and moves the
    // last-move highlight to it. The highlight never accumulates: afterwards it covers
    // exactly this move's origin (if the piece was known) and destination.
    pub fn apply_move(&mut self, update: &PieceUpdate) -> Vec<VisualOp> {
        let Some(layout) = self.layout else {
            warn!("Ignoring move of {} before the board is initialized", update.id);
            return vec![];
        };
        if !layout.shape().contains(update.location) {
            warn!("Ignoring move of {} to {:?}: outside the board", update.id, update.location);
            return vec![];
        }
        let (origin, mut ops) = self.place_piece(layout, update, true);
        let turn = LastTurn {
            from: origin.unwrap_or(update.location),
            to: update.location,
        };
        self.last_turn = Some(turn);
        let mut highlight = BTreeMap::new();
        if let Some(origin) = origin {
            highlight.insert(TileKey::from(origin), self.config.last_move_color);
        }
        highlight.insert(TileKey::from(update.location), self.config.last_move_color);
        ops.extend(self.highlights.replace(HighlightLayer::LastMove, highlight));
        // A king that moved is no longer known to be in check; the next snapshot says
        // whether it still is.
        if let Some(origin) = origin {
            ops.extend(self.highlights.set(HighlightLayer::Check, origin.into(), None));
        }
        ops
    }

    // Removing a piece that is not there is fine: captures may race with animations.
    pub fn delete_piece(&mut self, id: &PieceId) -> Vec<VisualOp> {
        match self.pieces.remove(id) {
            Some(_) => {
                self.piece_positions.remove(id);
                vec![VisualOp::RemovePiece { id: id.clone() }]
            }
            None => {
                debug!("Piece {id} is already gone");
                vec![]
            }
        }
    }

    pub fn lock_all_pieces(&mut self) -> Vec<VisualOp> {
        self.set_lock_policy(LockPolicy::AllLocked)
    }

    // Only `player`'s own pieces become draggable; everything else is locked.
    pub fn unlock_pieces(&mut self, player: PlayerNum) -> Vec<VisualOp> {
        self.set_lock_policy(LockPolicy::OnlyPlayer(player))
    }

    fn set_lock_policy(&mut self, policy: LockPolicy) -> Vec<VisualOp> {
        self.lock_policy = policy;
        let mut ops = vec![];
        for record in self.pieces.values_mut() {
            let locked = policy.is_locked(record.owner);
            if record.locked != locked {
                record.locked = locked;
                ops.push(VisualOp::SetPieceLock { id: record.id.clone(), locked });
            }
        }
        ops
    }

    // Preview highlight (e.g. legal moves). Lives in its own layer: last-move updates do
    // not clear it and clearing it does not touch the last move.
    pub fn set_tile_highlight(&mut self, coord: Coord, color: Option<Color>) -> Vec<VisualOp> {
        match self.layout {
            Some(layout) if layout.shape().contains(coord) => self
                .highlights
                .set(HighlightLayer::Preview, coord.into(), color)
                .into_iter()
                .collect(),
            _ => {
                debug!("No tile at {coord:?} to highlight");
                vec![]
            }
        }
    }

    pub fn clear_tile_highlights(&mut self) -> Vec<VisualOp> {
        self.highlights.clear(HighlightLayer::Preview)
    }

    // The first winner announced in a session sticks; repeated calls are no-ops.
    pub fn display_winner(&mut self, player: PlayerNum) -> Vec<VisualOp> {
        match self.winner {
            Some(winner) => {
                if winner != player {
                    warn!("Winner already announced as {winner}, ignoring {player}");
                }
                vec![]
            }
            None => {
                self.winner = Some(player);
                vec![VisualOp::ShowWinner { player }]
            }
        }
    }

    // Reconciles the engine with an authoritative snapshot. Falls back to a full rebuild
    // if the board itself changed or a new game started; otherwise diffs pieces by id.
    pub fn sync_snapshot(&mut self, state: &GameState) -> Result<Vec<VisualOp>, SyncError> {
        let shape = state.board.shape()?;
        // A finished game never becomes unfinished, so this is the next game.
        let new_session = self.winner.is_some() && state.winner.is_none();
        if new_session {
            info!("Game over state cleared by the server, starting a new session");
        }
        let layout = match self.layout {
            Some(layout)
                if layout.shape() == shape && self.tiles_match(state) && !new_session =>
            {
                layout
            }
            _ => {
                let canvas = self.canvas.ok_or(SyncError::NotInitialized)?;
                return self.initialize(self.orientation, canvas, state);
            }
        };

        let wanted = dedup_pieces(state, layout);
        let mut ops = vec![];
        let vanished = self
            .pieces
            .keys()
            .filter(|id| !wanted.iter().any(|update| update.id == **id))
            .cloned()
            .collect::<Vec<_>>();
        for id in vanished {
            ops.extend(self.delete_piece(&id));
        }
        // A snapshot is consistent as a whole, so pieces are not evicted one by one:
        // two pieces swapping places must not remove each other.
        for update in &wanted {
            let (_, piece_ops) = self.place_piece(layout, update, false);
            ops.extend(piece_ops);
        }

        if state.last_turn != self.last_turn {
            self.last_turn = state.last_turn;
            ops.extend(self.highlight_last_turn(state.last_turn));
        }
        ops.extend(self.highlight_checks(&state.in_check_kings));
        Ok(ops)
    }

    fn tiles_match(&self, state: &GameState) -> bool {
        self.tiles.iter().all(|(key, &kind)| state.tile_kind(key.coord()) == kind)
    }

    fn teardown(&mut self) -> Vec<VisualOp> {
        let mut ops = vec![];
        if self.winner.take().is_some() {
            ops.push(VisualOp::HideWinner);
        }
        ops.extend(self.pieces.keys().map(|id| VisualOp::RemovePiece { id: id.clone() }));
        ops.extend(self.tiles.keys().map(|&key| VisualOp::RemoveTile { key }));
        self.pieces.clear();
        self.piece_positions.clear();
        self.tiles.clear();
        self.highlights.forget_all();
        self.last_turn = None;
        self.layout = None;
        ops
    }

    // Inserts or moves a piece without touching highlights. Returns the logical location
    // the piece visual occupied before, if the piece was known.
    fn place_piece(
        &mut self, layout: BoardLayout, update: &PieceUpdate, evict_occupant: bool,
    ) -> (Option<Coord>, Vec<VisualOp>) {
        let mut ops = vec![];
        if evict_occupant {
            let occupant = self
                .piece_at(update.location)
                .filter(|record| record.id != update.id)
                .map(|record| record.id.clone());
            if let Some(occupant) = occupant {
                debug!("{} lands on {:?}, removing {}", update.id, update.location, occupant);
                ops.extend(self.delete_piece(&occupant));
            }
        }

        let to = layout.to_screen(self.orientation, update.location);
        let origin = match self.pieces.get_mut(&update.id) {
            Some(record) => {
                let from = self
                    .piece_positions
                    .get(&update.id)
                    .copied()
                    .unwrap_or_else(|| layout.to_screen(self.orientation, record.location));
                if from != to {
                    ops.push(VisualOp::MovePiece { id: update.id.clone(), from, to });
                }
                if record.kind != update.kind || record.owner != update.owner {
                    record.kind = update.kind;
                    record.owner = update.owner;
                    ops.push(VisualOp::RestylePiece {
                        id: update.id.clone(),
                        kind: update.kind,
                        owner: update.owner,
                    });
                    let locked = self.lock_policy.is_locked(update.owner);
                    if record.locked != locked {
                        record.locked = locked;
                        ops.push(VisualOp::SetPieceLock { id: update.id.clone(), locked });
                    }
                }
                record.location = update.location;
                layout.to_logical(self.orientation, from)
            }
            None => {
                let locked = self.lock_policy.is_locked(update.owner);
                self.pieces.insert(
                    update.id.clone(),
                    PieceRecord::new(
                        update.id.clone(),
                        update.location,
                        update.owner,
                        update.kind,
                        locked,
                    ),
                );
                ops.push(VisualOp::AddPiece {
                    id: update.id.clone(),
                    kind: update.kind,
                    owner: update.owner,
                    position: to,
                    locked,
                });
                None
            }
        };
        self.piece_positions.insert(update.id.clone(), to);
        (origin, ops)
    }

    fn highlight_last_turn(&mut self, turn: Option<LastTurn>) -> Vec<VisualOp> {
        let shape = self.layout.map(|layout| layout.shape());
        let color = self.config.last_move_color;
        let highlight = turn
            .into_iter()
            .flat_map(|turn| [turn.from, turn.to])
            .filter(|&coord| shape.is_some_and(|shape| shape.contains(coord)))
            .map(|coord| (TileKey::from(coord), color))
            .collect();
        self.highlights.replace(HighlightLayer::LastMove, highlight)
    }

    fn highlight_checks(&mut self, kings: &[Coord]) -> Vec<VisualOp> {
        let shape = self.layout.map(|layout| layout.shape());
        let color = self.config.check_color;
        let highlight = kings
            .iter()
            .filter(|&&coord| shape.is_some_and(|shape| shape.contains(coord)))
            .map(|&coord| (TileKey::from(coord), color))
            .collect();
        self.highlights.replace(HighlightLayer::Check, highlight)
    }
}

// Snapshot pieces that fit on the board, one per id (the last one wins), ordered by id.
fn dedup_pieces(state: &GameState, layout: BoardLayout) -> Vec<PieceUpdate> {
    let mut by_id = BTreeMap::new();
    for piece in &state.pieces {
        if layout.shape().contains(piece.location()) {
            by_id.insert(piece.id.clone(), piece.to_update());
        } else {
            warn!("Piece {} at {:?} is outside the board, skipping", piece.id, piece.location());
        }
    }
    let pieces = by_id.into_values().collect_vec();
    for (a, b) in pieces.iter().tuple_combinations() {
        if a.location == b.location {
            warn!("Pieces {} and {} are both at {:?}", a.id, b.id, a.location);
        }
    }
    pieces
}
