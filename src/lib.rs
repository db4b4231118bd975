#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod client;
pub mod coord;
pub mod display;
pub mod engine;
pub mod error;
pub mod event;
pub mod highlight;
pub mod piece;
pub mod scene;
pub mod test_util;
pub mod visual;

pub use client::{ClientState, DragError, EventError};
pub use coord::{BoardShape, Coord, TileKey, TileKind};
pub use display::{BoardLayout, BoardOrientation, CanvasSize, ScreenPoint, TileSize};
pub use engine::{BoardSyncEngine, EngineConfig};
pub use error::SyncError;
pub use event::{BoardDims, GameState, GameUpdate, LastTurn, MoveRequest, PieceState, TileState};
pub use highlight::{Color, HighlightLayer, HighlightState, LAST_MOVE_COLOR};
pub use piece::{LockPolicy, PieceId, PieceRecord, PieceUpdate, PlayerNum};
pub use scene::{Scene, SceneError, ScenePiece, SceneTile};
pub use visual::VisualOp;
