// Improvement potential. Draw coordinate labels around the board.

use std::collections::HashMap;

use board_sync::{HighlightLayer, PlayerNum, Scene, ScenePiece, SceneTile, ScreenPoint, TileKind};
use console::Style;
use itertools::Itertools;


// Row and column on the canvas. Everything here works in screen space, so the picture
// shows exactly what a browser executing the same ops would show.
type Cell = (usize, usize);

fn tile_style(tile: &SceneTile) -> Style {
    let style = Style::new().color256(233);
    // Check beats preview beats last move.
    if tile.highlights[HighlightLayer::Check].is_some() {
        style.on_red()
    } else if tile.highlights[HighlightLayer::Preview].is_some() {
        style.on_color256(108)
    } else if tile.highlights[HighlightLayer::LastMove].is_some() {
        style.on_color256(149)
    } else {
        match tile.kind {
            TileKind::Light => style.on_color256(230),
            TileKind::Dark => style.on_color256(222),
            TileKind::Disabled => style.on_color256(240),
        }
    }
}

// Uppercase for the first player, like white in FEN.
fn piece_char(piece: &ScenePiece) -> char {
    if piece.owner == PlayerNum(0) {
        piece.kind.to_ascii_uppercase()
    } else {
        piece.kind.to_ascii_lowercase()
    }
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

pub fn render_scene(scene: &Scene) -> String {
    let Some(size) = scene.tiles().values().next().map(|tile| tile.size) else {
        return "(no board)\n".to_owned();
    };
    let cell = |p: ScreenPoint| -> Cell {
        ((p.top / size.height).round() as usize, (p.left / size.width).round() as usize)
    };
    let pieces: HashMap<Cell, &ScenePiece> =
        scene.pieces().values().map(|piece| (cell(piece.position), piece)).collect();
    let tiles = scene
        .tiles()
        .values()
        .map(|tile| (cell(tile.position), tile))
        .sorted_by_key(|&(cell, _)| cell);
    let mut ret = String::new();
    for (_, row) in &tiles.chunk_by(|&((row, _), _)| row) {
        for (cell, tile) in row {
            let mut style = tile_style(tile);
            let ch = match pieces.get(&cell) {
                Some(piece) => {
                    if !piece.locked {
                        style = style.bold().underlined();
                    }
                    piece_char(piece)
                }
                None => ' ',
            };
            ret.push_str(&style.apply_to(format_square(ch)).to_string());
        }
        ret.push('\n');
    }
    if let Some(winner) = scene.winner() {
        ret.push_str(&format!("Winner: player {}\n", winner.0));
    }
    ret
}


#[cfg(test)]
mod tests {
    use board_sync::test_util::{classic_state, piece, state_with_pieces};
    use board_sync::{BoardOrientation, BoardSyncEngine, CanvasSize, EngineConfig, GameState};
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(orientation: BoardOrientation, state: &GameState) -> String {
        let mut engine = BoardSyncEngine::new(EngineConfig::default());
        let canvas = CanvasSize { width: 400., height: 300. };
        let ops = engine.initialize(orientation, canvas, state).unwrap();
        let mut scene = Scene::new();
        scene.apply_all(&ops).unwrap();
        console::strip_ansi_codes(&render_scene(&scene)).into_owned()
    }

    #[test]
    fn classic_normal() {
        let board = render(BoardOrientation::Normal, &classic_state());
        let lines = board.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], " R  N  B  Q  K  B  N  R ");
        assert_eq!(lines[1], " P  P  P  P  P  P  P  P ");
        assert_eq!(lines[7], " r  n  b  q  k  b  n  r ");
    }

    #[test]
    fn inverted_is_rotated() {
        let pieces = vec![piece("a", 0, 0, 0, 'a'), piece("b", 1, 2, 0, 'b')];
        let state = state_with_pieces(3, 2, pieces);
        assert_eq!(render(BoardOrientation::Normal, &state), " A     b \n         \n");
        assert_eq!(render(BoardOrientation::Inverted, &state), "         \n b     A \n");
    }

    #[test]
    fn empty_scene() {
        assert_eq!(render_scene(&Scene::new()), "(no board)\n");
    }
}
