// Shapes of data exchanged with the external state layer. The engine does not own
// these: they arrive from a subscription (full snapshots or partial events) and leave
// as move requests.

use serde::{Deserialize, Serialize};

use crate::coord::{BoardShape, Coord, TileKind};
use crate::error::SyncError;
use crate::piece::{PieceId, PieceUpdate, PlayerNum};


// Dimensions are optional on the wire so that a malformed snapshot can be reported
// as such instead of failing somewhere in deserialization.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct BoardDims {
    #[serde(default)]
    pub width: Option<u8>,
    #[serde(default)]
    pub height: Option<u8>,
}

impl BoardDims {
    pub fn new(width: u8, height: u8) -> Self {
        BoardDims { width: Some(width), height: Some(height) }
    }

    pub fn shape(self) -> Result<BoardShape, SyncError> {
        Ok(BoardShape {
            width: self.width.ok_or(SyncError::MissingBoardDimension("width"))?,
            height: self.height.ok_or(SyncError::MissingBoardDimension("height"))?,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PieceState {
    pub id: PieceId,
    pub owner: PlayerNum,
    pub x: u8,
    pub y: u8,
    pub piece_type: char,
}

impl PieceState {
    pub fn location(&self) -> Coord { Coord::new(self.x, self.y) }

    pub fn from_update(update: &PieceUpdate) -> Self {
        PieceState {
            id: update.id.clone(),
            owner: update.owner,
            x: update.location.x,
            y: update.location.y,
            piece_type: update.kind,
        }
    }

    pub fn to_update(&self) -> PieceUpdate {
        PieceUpdate::new(self.id.clone(), self.location(), self.owner, self.piece_type)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TileState {
    pub x: u8,
    pub y: u8,
    pub tile_type: char,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LastTurn {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub board: BoardDims,
    #[serde(default)]
    pub pieces: Vec<PieceState>,
    // Empty means a plain checkerboard.
    #[serde(default)]
    pub tiles: Vec<TileState>,
    // Opaque here: consumed by the movement pattern legend, which is not our business.
    #[serde(default)]
    pub movement_patterns: serde_json::Value,
    #[serde(default)]
    pub in_check_kings: Vec<Coord>,
    #[serde(default)]
    pub last_turn: Option<LastTurn>,
    #[serde(default)]
    pub to_move: Option<PlayerNum>,
    #[serde(default)]
    pub winner: Option<PlayerNum>,
}

impl GameState {
    // Tile kinds for every coord of the board. Tiles not listed (or listed with an
    // unknown type) fall back to the checkerboard pattern.
    pub fn tile_kind(&self, coord: Coord) -> TileKind {
        self.tiles
            .iter()
            .rev()
            .find(|t| t.x == coord.x && t.y == coord.y)
            .and_then(|t| TileKind::from_tile_type(t.tile_type))
            .unwrap_or_else(|| TileKind::checkerboard(coord))
    }
}

// Something the server told us. Applied strictly in arrival order.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameUpdate {
    State(GameState),
    PieceMoved { piece: PieceUpdate },
    PieceRemoved { id: PieceId },
    TurnChanged { to_move: PlayerNum },
    GameOver { winner: PlayerNum },
    // Where the piece on `from` may go. Empty `to` clears the preview.
    LegalMoves { from: Coord, to: Vec<Coord> },
}

// Outbound `requestMove`. Fire-and-forget: the engine waits for the authoritative
// update instead of predicting the result.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub x: u8,
    pub y: u8,
    pub id: PieceId,
}
