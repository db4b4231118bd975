use std::path::{Path, PathBuf};

use anyhow::Context;
use board_sync::{CanvasSize, Color, Coord, EngineConfig, GameUpdate, PieceId, PlayerNum};
use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub canvas: CanvasSize,
    #[serde(default)]
    pub inverted: bool,
    // Observer if missing.
    #[serde(default)]
    pub my_player: Option<PlayerNum>,
    #[serde(default)]
    pub engine: EngineConfig,
    // Relative to the directory of the config file.
    pub script: PathBuf,
}

// One line of a replay script. Server updates are applied as is; local actions emulate
// what the UI would do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptStep {
    Server(GameUpdate),
    Flip { inverted: bool },
    // Drag the piece and release it over the center of `to` as currently drawn.
    Drop { id: PieceId, to: Coord },
    Highlight { at: Coord, color: Option<Color> },
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ReplayConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read config file '{filename}'."))?;
    let mut config: ReplayConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file '{filename}'."))?;
    if config.script.is_relative() {
        if let Some(dir) = Path::new(filename).parent() {
            config.script = dir.join(&config.script);
        }
    }
    Ok(config)
}

// Empty lines and lines starting with "//" are skipped.
pub fn parse_script(contents: &str) -> anyhow::Result<Vec<ScriptStep>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with("//"))
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid step on line {}", idx + 1))
        })
        .collect()
}

pub fn read_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script '{}'.", path.display()))?;
    parse_script(&contents)
}


#[cfg(test)]
mod tests {
    use board_sync::BoardDims;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_config() {
        let config: ReplayConfig = serde_yaml::from_str(
            "
canvas: { width: 640, height: 640 }
inverted: true
my_player: 1
engine:
  highlight_last_turn_on_load: true
script: session.jsonl
",
        )
        .unwrap();
        assert!(config.inverted);
        assert_eq!(config.my_player, Some(PlayerNum(1)));
        assert!(config.engine.highlight_last_turn_on_load);
        assert_eq!(config.engine.check_color, EngineConfig::default().check_color);
    }

    #[test]
    fn parse_steps() {
        let steps = parse_script(
            r#"
// Opening
{"Server": {"type": "State", "board": {"width": 3, "height": 2}}}
{"Flip": {"inverted": true}}
{"Drop": {"id": "p", "to": {"x": 1, "y": 0}}}

{"Server": {"type": "TurnChanged", "to_move": 1}}
"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 4);
        let ScriptStep::Server(GameUpdate::State(state)) = &steps[0] else {
            panic!("{:?}", steps[0]);
        };
        assert_eq!(state.board, BoardDims::new(3, 2));
        assert_eq!(steps[2], ScriptStep::Drop {
            id: PieceId::from("p"),
            to: Coord::new(1, 0)
        });
    }

    #[test]
    fn report_bad_line() {
        let err = parse_script("{\"Flip\": {\"inverted\": true}}\n{\"Jump\": {}}").unwrap_err();
        assert_eq!(err.to_string(), "Invalid step on line 2");
    }
}
