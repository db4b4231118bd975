// Retained model of what a renderer shows after executing visual ops. Rejects ops that
// break the rendering contract, which makes it handy for checking the engine output and
// as the state behind simple renderers (see the console app).

use std::collections::BTreeMap;
use std::fmt;

use enum_map::EnumMap;

use crate::coord::{TileKey, TileKind};
use crate::display::{ScreenPoint, TileSize};
use crate::highlight::{Color, HighlightLayer};
use crate::piece::{PieceId, PlayerNum};
use crate::visual::VisualOp;


#[derive(Clone, PartialEq, Debug)]
pub struct SceneTile {
    pub position: ScreenPoint,
    pub size: TileSize,
    pub kind: TileKind,
    pub color: Color,
    pub highlights: EnumMap<HighlightLayer, Option<Color>>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ScenePiece {
    pub kind: char,
    pub owner: PlayerNum,
    pub position: ScreenPoint,
    pub locked: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SceneError {
    DuplicateTile(TileKey),
    UnknownTile(TileKey),
    DuplicatePiece(PieceId),
    UnknownPiece(PieceId),
    // `MovePiece` claims the piece was somewhere it was not.
    StalePosition { id: PieceId, expected: ScreenPoint, actual: ScreenPoint },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::DuplicateTile(key) => write!(f, "Tile {key} already exists"),
            SceneError::UnknownTile(key) => write!(f, "Tile {key} does not exist"),
            SceneError::DuplicatePiece(id) => write!(f, "Piece {id} already exists"),
            SceneError::UnknownPiece(id) => write!(f, "Piece {id} does not exist"),
            SceneError::StalePosition { id, expected, actual } => write!(
                f,
                "Piece {id} expected at ({}, {}), but is at ({}, {})",
                expected.left, expected.top, actual.left, actual.top
            ),
        }
    }
}

impl std::error::Error for SceneError {}


#[derive(Clone, Debug, Default)]
pub struct Scene {
    tiles: BTreeMap<TileKey, SceneTile>,
    pieces: BTreeMap<PieceId, ScenePiece>,
    winner: Option<PlayerNum>,
}

impl Scene {
    pub fn new() -> Self { Self::default() }

    pub fn tiles(&self) -> &BTreeMap<TileKey, SceneTile> { &self.tiles }
    pub fn tile(&self, key: TileKey) -> Option<&SceneTile> { self.tiles.get(&key) }
    pub fn pieces(&self) -> &BTreeMap<PieceId, ScenePiece> { &self.pieces }
    pub fn piece(&self, id: &PieceId) -> Option<&ScenePiece> { self.pieces.get(id) }
    pub fn winner(&self) -> Option<PlayerNum> { self.winner }

    pub fn highlighted(&self, layer: HighlightLayer) -> BTreeMap<TileKey, Color> {
        self.tiles
            .iter()
            .filter_map(|(&key, tile)| tile.highlights[layer].map(|color| (key, color)))
            .collect()
    }

    pub fn apply_all<'a>(
        &mut self, ops: impl IntoIterator<Item = &'a VisualOp>,
    ) -> Result<(), SceneError> {
        ops.into_iter().try_for_each(|op| self.apply(op))
    }

    pub fn apply(&mut self, op: &VisualOp) -> Result<(), SceneError> {
        match op {
            VisualOp::AddTile { key, position, size, kind, color } => {
                if self.tiles.contains_key(key) {
                    return Err(SceneError::DuplicateTile(*key));
                }
                self.tiles.insert(*key, SceneTile {
                    position: *position,
                    size: *size,
                    kind: *kind,
                    color: *color,
                    highlights: EnumMap::default(),
                });
            }
            VisualOp::RemoveTile { key } => {
                self.tiles.remove(key).ok_or(SceneError::UnknownTile(*key))?;
            }
            VisualOp::AddPiece { id, kind, owner, position, locked } => {
                if self.pieces.contains_key(id) {
                    return Err(SceneError::DuplicatePiece(id.clone()));
                }
                self.pieces.insert(id.clone(), ScenePiece {
                    kind: *kind,
                    owner: *owner,
                    position: *position,
                    locked: *locked,
                });
            }
            VisualOp::MovePiece { id, from, to } => {
                let piece = self.piece_mut(id)?;
                if piece.position != *from {
                    return Err(SceneError::StalePosition {
                        id: id.clone(),
                        expected: *from,
                        actual: piece.position,
                    });
                }
                piece.position = *to;
            }
            VisualOp::RestylePiece { id, kind, owner } => {
                let piece = self.piece_mut(id)?;
                piece.kind = *kind;
                piece.owner = *owner;
            }
            VisualOp::RemovePiece { id } => {
                self.pieces.remove(id).ok_or_else(|| SceneError::UnknownPiece(id.clone()))?;
            }
            VisualOp::SetTileHighlight { key, layer, color } => {
                let tile = self.tiles.get_mut(key).ok_or(SceneError::UnknownTile(*key))?;
                tile.highlights[*layer] = *color;
            }
            VisualOp::SetPieceLock { id, locked } => {
                self.piece_mut(id)?.locked = *locked;
            }
            VisualOp::ShowWinner { player } => self.winner = Some(*player),
            VisualOp::HideWinner => self.winner = None,
        }
        Ok(())
    }

    fn piece_mut(&mut self, id: &PieceId) -> Result<&mut ScenePiece, SceneError> {
        self.pieces.get_mut(id).ok_or_else(|| SceneError::UnknownPiece(id.clone()))
    }
}
