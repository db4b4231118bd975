use std::fmt;

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::coord::Coord;


#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub String);

impl PieceId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self { PieceId(id.to_owned()) }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerNum(pub u8);

impl fmt::Display for PlayerNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}


// Logical state of one live piece. `kind` is the variant-specific piece type letter
// (e.g. 'k', 'q', or anything a custom variant defines); it only matters for rendering.
#[derive(Clone, PartialEq, Eq, Debug, new, Serialize, Deserialize)]
pub struct PieceRecord {
    pub id: PieceId,
    pub location: Coord,
    pub owner: PlayerNum,
    pub kind: char,
    pub locked: bool,
}

// Authoritative piece position as pushed by the server.
#[derive(Clone, PartialEq, Eq, Debug, new, Serialize, Deserialize)]
pub struct PieceUpdate {
    pub id: PieceId,
    pub location: Coord,
    pub owner: PlayerNum,
    pub kind: char,
}

// Which pieces accept drag input. Records created while a policy is in effect follow it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum LockPolicy {
    #[default]
    AllLocked,
    OnlyPlayer(PlayerNum),
}

impl LockPolicy {
    pub fn is_locked(self, owner: PlayerNum) -> bool {
        match self {
            LockPolicy::AllLocked => true,
            LockPolicy::OnlyPlayer(player) => player != owner,
        }
    }
}
