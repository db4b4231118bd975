use std::fmt;

use crate::coord::BoardShape;


// Configuration errors: the engine refuses to build a board it cannot size.
#[derive(Clone, PartialEq, Debug)]
pub enum SyncError {
    MissingBoardDimension(&'static str),
    EmptyBoard(BoardShape),
    InvalidCanvas { width: f64, height: f64 },
    // Incremental updates need a canvas size, which only `initialize` provides.
    NotInitialized,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::MissingBoardDimension(field) => {
                write!(f, "Game state has no board.{field}")
            }
            SyncError::EmptyBoard(shape) => {
                write!(f, "Board must not be empty, got {}x{}", shape.width, shape.height)
            }
            SyncError::InvalidCanvas { width, height } => {
                write!(f, "Canvas must have positive size, got {width}x{height}")
            }
            SyncError::NotInitialized => write!(f, "Board has not been initialized"),
        }
    }
}

impl std::error::Error for SyncError {}
