// Test utilities that cannot be moved to the "tests" folder, because stress_test uses them.

use itertools::Itertools;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

use crate::coord::{BoardShape, Coord};
use crate::event::{BoardDims, GameState, GameUpdate, PieceState};
use crate::highlight::HighlightLayer;
use crate::piece::{PieceId, PieceUpdate, PlayerNum};
use crate::scene::Scene;


// In theory random tests verify statistical properties that should always hold, but let's fix
// the seed to avoid sporadic failures.
pub fn deterministic_rng() -> impl Rng { rand::rngs::StdRng::from_seed([0; 32]) }

pub fn piece(id: &str, owner: u8, x: u8, y: u8, piece_type: char) -> PieceState {
    PieceState {
        id: PieceId::from(id),
        owner: PlayerNum(owner),
        x,
        y,
        piece_type,
    }
}

pub fn empty_state(width: u8, height: u8) -> GameState {
    GameState {
        board: BoardDims::new(width, height),
        ..GameState::default()
    }
}

pub fn state_with_pieces(width: u8, height: u8, pieces: Vec<PieceState>) -> GameState {
    GameState { pieces, ..empty_state(width, height) }
}

// Standard chess setup with player 0 on ranks 0-1 and player 1 on ranks 6-7. Piece ids
// are "<player>-<x>-<y>" of the starting square.
pub fn classic_state() -> GameState {
    const BACK_RANK: [char; 8] = ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r'];
    let mut pieces = vec![];
    for (owner, back_y, pawn_y) in [(0, 0, 1), (1, 7, 6)] {
        for x in 0..8 {
            let back_kind = BACK_RANK[usize::from(x)];
            pieces.push(piece(&format!("{owner}-{x}-{back_y}"), owner, x, back_y, back_kind));
            pieces.push(piece(&format!("{owner}-{x}-{pawn_y}"), owner, x, pawn_y, 'p'));
        }
    }
    GameState {
        to_move: Some(PlayerNum(0)),
        ..state_with_pieces(8, 8, pieces)
    }
}

// Random server update consistent with `state`, applied to `state` as well. Never sends
// snapshots with a different board shape; the stress test covers those separately.
pub fn random_update(rng: &mut impl Rng, state: &mut GameState) -> GameUpdate {
    let shape = state.board.shape().unwrap_or(BoardShape { width: 8, height: 8 });
    let random_coord = |rng: &mut dyn rand::RngCore| Coord {
        x: rng.random_range(0..shape.width),
        y: rng.random_range(0..shape.height),
    };
    match rng.random_range(0..100) {
        0..45 if !state.pieces.is_empty() => {
            let moved = state.pieces.choose(rng).unwrap().clone();
            let location = random_coord(&mut *rng);
            state.pieces.retain(|p| p.id != moved.id && p.location() != location);
            let piece = PieceUpdate::new(moved.id, location, moved.owner, moved.piece_type);
            state.pieces.push(PieceState::from_update(&piece));
            GameUpdate::PieceMoved { piece }
        }
        45..55 if !state.pieces.is_empty() => {
            let id = state.pieces.choose(rng).unwrap().id.clone();
            state.pieces.retain(|p| p.id != id);
            GameUpdate::PieceRemoved { id }
        }
        55..65 => {
            // Also covers ids that were never on the board.
            let id = PieceId(format!("ghost-{}", rng.random_range(0..1000)));
            let location = random_coord(&mut *rng);
            let piece = PieceUpdate::new(id, location, PlayerNum(rng.random_range(0..2)), 'g');
            state.pieces.retain(|p| p.id != piece.id && p.location() != location);
            state.pieces.push(PieceState::from_update(&piece));
            GameUpdate::PieceMoved { piece }
        }
        65..75 => {
            let to_move = PlayerNum(rng.random_range(0..2));
            state.to_move = Some(to_move);
            GameUpdate::TurnChanged { to_move }
        }
        75..85 => {
            let from = random_coord(&mut *rng);
            let to = (0..rng.random_range(0..4)).map(|_| random_coord(&mut *rng)).collect_vec();
            GameUpdate::LegalMoves { from, to }
        }
        _ => {
            // Shuffle a few pieces around and resend the whole state.
            for p in state.pieces.iter_mut() {
                if rng.random_bool(0.1) {
                    p.x = rng.random_range(0..shape.width);
                    p.y = rng.random_range(0..shape.height);
                }
            }
            let mut seen = vec![];
            state.pieces.retain(|p| {
                let fresh = !seen.contains(&p.location());
                seen.push(p.location());
                fresh
            });
            GameUpdate::State(state.clone())
        }
    }
}

// Checks that the scene shows exactly what the state describes. Returns a description of
// the first mismatch.
pub fn verify_scene(scene: &Scene, state: &GameState) -> Result<(), String> {
    let shape = state.board.shape().map_err(|err| err.to_string())?;
    if scene.tiles().len() != shape.num_tiles() {
        return Err(format!("{} tiles for a board of {}", scene.tiles().len(), shape.num_tiles()));
    }
    let scene_ids = scene.pieces().keys().sorted().collect_vec();
    let state_ids = state.pieces.iter().map(|p| &p.id).sorted().collect_vec();
    if scene_ids != state_ids {
        return Err(format!("Scene pieces {scene_ids:?} != state pieces {state_ids:?}"));
    }
    for layer in HighlightLayer::iter() {
        let highlighted = scene.highlighted(layer);
        if let Some(key) = highlighted.keys().find(|key| !shape.contains(key.coord())) {
            return Err(format!("{layer:?} highlight at {key:?} is outside the board"));
        }
    }
    let last_move = scene.highlighted(HighlightLayer::LastMove);
    if last_move.len() > 2 {
        return Err(format!("Too many last-move highlights: {last_move:?}"));
    }
    Ok(())
}
