use serde::{Deserialize, Serialize};

use crate::coord::{TileKey, TileKind};
use crate::display::{ScreenPoint, TileSize};
use crate::highlight::{Color, HighlightLayer};
use crate::piece::{PieceId, PlayerNum};


// A single mutation of the rendering surface. The engine emits these in the order
// they must be executed; a renderer never needs to look at the logical state.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum VisualOp {
    AddTile {
        key: TileKey,
        position: ScreenPoint,
        size: TileSize,
        kind: TileKind,
        color: Color,
    },
    RemoveTile {
        key: TileKey,
    },
    AddPiece {
        id: PieceId,
        kind: char,
        owner: PlayerNum,
        position: ScreenPoint,
        locked: bool,
    },
    MovePiece {
        id: PieceId,
        from: ScreenPoint,
        to: ScreenPoint,
    },
    // Piece changed type (e.g. promotion) or owner without leaving the board.
    RestylePiece {
        id: PieceId,
        kind: char,
        owner: PlayerNum,
    },
    RemovePiece {
        id: PieceId,
    },
    // `None` removes the highlight of the given layer from the tile.
    SetTileHighlight {
        key: TileKey,
        layer: HighlightLayer,
        color: Option<Color>,
    },
    SetPieceLock {
        id: PieceId,
        locked: bool,
    },
    ShowWinner {
        player: PlayerNum,
    },
    HideWinner,
}
