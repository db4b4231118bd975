// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use board_sync::test_util::empty_state;
use board_sync::{
    BoardOrientation, BoardSyncEngine, CanvasSize, Coord, EngineConfig, GameState, PieceId,
    PieceUpdate, PlayerNum, Scene, VisualOp,
};


pub const CANVAS_800: CanvasSize = CanvasSize { width: 800., height: 800. };

#[macro_export]
macro_rules! coord {
    ($x:expr, $y:expr) => {
        board_sync::Coord::new($x, $y)
    };
}

#[macro_export]
macro_rules! key {
    ($x:expr, $y:expr) => {
        board_sync::TileKey::from(board_sync::Coord::new($x, $y))
    };
}

// Engine paired with a scene that executes every op it emits. Any op that breaks the
// rendering contract fails the test right away.
pub struct Harness {
    pub engine: BoardSyncEngine,
    pub scene: Scene,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self { Self::with_config(EngineConfig::default()) }

    pub fn with_config(config: EngineConfig) -> Self {
        Harness {
            engine: BoardSyncEngine::new(config),
            scene: Scene::new(),
        }
    }

    pub fn initialized(orientation: BoardOrientation, state: &GameState) -> Self {
        let mut harness = Self::new();
        harness.run(|engine| engine.initialize(orientation, CANVAS_800, state).unwrap());
        harness
    }

    pub fn run(&mut self, f: impl FnOnce(&mut BoardSyncEngine) -> Vec<VisualOp>) -> Vec<VisualOp> {
        let ops = f(&mut self.engine);
        self.scene.apply_all(&ops).unwrap();
        ops
    }
}

#[allow(dead_code)]
pub fn empty_8x8() -> GameState { empty_state(8, 8) }

#[allow(dead_code)]
pub fn move_piece(id: &str, owner: u8, x: u8, y: u8) -> PieceUpdate {
    PieceUpdate::new(PieceId::from(id), Coord::new(x, y), PlayerNum(owner), 'p')
}
