// Mapping between logical board coordinates and screen space.
//
// Screen space has its origin in the top left corner of the canvas. With `Normal`
// orientation tile (0, 0) is drawn in the top left corner; with `Inverted` orientation
// both rows and columns run in reverse, so tile (0, 0) ends up in the bottom right.

use serde::{Deserialize, Serialize};

use crate::coord::{BoardShape, Coord};
use crate::error::SyncError;


// Screen coords are computed by division, so a tile corner may come back as 2.9999999
// tiles instead of 3. Nudge by this much (in tiles) before flooring.
const SNAP_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BoardOrientation {
    #[default]
    Normal,
    Inverted,
}

impl BoardOrientation {
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted { BoardOrientation::Inverted } else { BoardOrientation::Normal }
    }
    pub fn is_inverted(self) -> bool { self == BoardOrientation::Inverted }
    pub fn flipped(self) -> Self { Self::from_inverted(!self.is_inverted()) }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

// Top left corner of a tile (or any other point) in canvas pixels.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub left: f64,
    pub top: f64,
}

impl ScreenPoint {
    pub fn new(left: f64, top: f64) -> Self { Self { left, top } }
}

// Everything needed to convert coordinates for one board. Conversions are pure functions
// of the layout and the orientation passed in.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoardLayout {
    shape: BoardShape,
    tile_size: TileSize,
}

impl BoardLayout {
    pub fn new(shape: BoardShape, canvas: CanvasSize) -> Result<Self, SyncError> {
        if shape.width == 0 || shape.height == 0 {
            return Err(SyncError::EmptyBoard(shape));
        }
        // Written this way to reject NaN as well.
        if !(canvas.width > 0. && canvas.height > 0.) {
            return Err(SyncError::InvalidCanvas { width: canvas.width, height: canvas.height });
        }
        let tile_size = TileSize {
            width: canvas.width / f64::from(shape.width),
            height: canvas.height / f64::from(shape.height),
        };
        Ok(BoardLayout { shape, tile_size })
    }

    pub fn shape(&self) -> BoardShape { self.shape }
    pub fn tile_size(&self) -> TileSize { self.tile_size }

    // Position of the tile in display order: column and row counted from the top left.
    fn display_cell(&self, orientation: BoardOrientation, coord: Coord) -> (u8, u8) {
        match orientation {
            BoardOrientation::Normal => (coord.x, coord.y),
            BoardOrientation::Inverted => {
                (self.shape.width - coord.x - 1, self.shape.height - coord.y - 1)
            }
        }
    }

    pub fn to_screen(&self, orientation: BoardOrientation, coord: Coord) -> ScreenPoint {
        debug_assert!(self.shape.contains(coord), "{coord:?} is outside {:?}", self.shape);
        let (col, row) = self.display_cell(orientation, coord);
        ScreenPoint {
            left: f64::from(col) * self.tile_size.width,
            top: f64::from(row) * self.tile_size.height,
        }
    }

    pub fn tile_center(&self, orientation: BoardOrientation, coord: Coord) -> ScreenPoint {
        let corner = self.to_screen(orientation, coord);
        ScreenPoint {
            left: corner.left + self.tile_size.width / 2.,
            top: corner.top + self.tile_size.height / 2.,
        }
    }

    // Returns the tile containing the point, or `None` if the point is outside the board.
    pub fn to_logical(&self, orientation: BoardOrientation, point: ScreenPoint) -> Option<Coord> {
        let col = snap_to_cell(point.left / self.tile_size.width, self.shape.width)?;
        let row = snap_to_cell(point.top / self.tile_size.height, self.shape.height)?;
        let coord = match orientation {
            BoardOrientation::Normal => Coord { x: col, y: row },
            BoardOrientation::Inverted => Coord {
                x: self.shape.width - col - 1,
                y: self.shape.height - row - 1,
            },
        };
        Some(coord)
    }
}

fn snap_to_cell(tiles: f64, num_cells: u8) -> Option<u8> {
    let cell = (tiles + SNAP_EPSILON).floor();
    if cell >= 0. && cell < f64::from(num_cells) { Some(cell as u8) } else { None }
}
