use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


// Logical board coordinates. `x` is the file (column), `y` is the rank (row), both 0-based.
// The board is not necessarily 8x8: chess variants may use anything up to 255x255.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self { Self { x, y } }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.x, self.y)
    }
}

impl From<(u8, u8)> for Coord {
    fn from((x, y): (u8, u8)) -> Self { Self { x, y } }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BoardShape {
    pub width: u8,
    pub height: u8,
}

impl BoardShape {
    pub fn contains(self, coord: Coord) -> bool { coord.x < self.width && coord.y < self.height }

    pub fn num_tiles(self) -> usize { usize::from(self.width) * usize::from(self.height) }

    // Row-major: (0, 0), (1, 0), ..., (0, 1), ...
    pub fn coords(self) -> impl Iterator<Item = Coord> + Clone {
        (0..self.height)
            .cartesian_product(0..self.width)
            .map(|(y, x)| Coord { x, y })
    }
}


// Index of a tile visual. There is exactly one tile visual per key, so the key is
// derived from logical coordinates only and never from screen position.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct TileKey(Coord);

impl TileKey {
    pub fn coord(self) -> Coord { self.0 }
}

impl From<Coord> for TileKey {
    fn from(coord: Coord) -> Self { TileKey(coord) }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.x, self.0.y)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TileKind {
    Light,
    Dark,
    Disabled,
}

impl TileKind {
    pub fn checkerboard(coord: Coord) -> Self {
        let parity = (u16::from(coord.x) + u16::from(coord.y)) % 2;
        if parity == 0 { TileKind::Dark } else { TileKind::Light }
    }

    pub fn from_tile_type(tile_type: char) -> Option<Self> {
        match tile_type {
            'w' => Some(TileKind::Light),
            'b' => Some(TileKind::Dark),
            'x' => Some(TileKind::Disabled),
            _ => None,
        }
    }

    pub fn to_tile_type(self) -> char {
        match self {
            TileKind::Light => 'w',
            TileKind::Dark => 'b',
            TileKind::Disabled => 'x',
        }
    }
}
