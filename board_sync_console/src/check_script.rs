use std::path::Path;
use std::sync::mpsc;

use anyhow::Context;
use board_sync::{CanvasSize, ClientState, EngineConfig, PlayerNum, Scene};

use crate::replay::execute_step;
use crate::replay_config::{ScriptStep, read_script};


const CHECK_CANVAS: CanvasSize = CanvasSize { width: 800., height: 800. };

// Runs the steps for `my_player`, verifying that every step produces visual ops a
// renderer can execute.
fn check_steps(my_player: Option<PlayerNum>, steps: Vec<ScriptStep>) -> anyhow::Result<Scene> {
    let (requests_tx, _requests_rx) = mpsc::channel();
    let mut client =
        ClientState::new(my_player, CHECK_CANVAS, EngineConfig::default(), requests_tx);
    let mut scene = Scene::new();
    for (idx, step) in steps.into_iter().enumerate() {
        let ops = execute_step(&mut client, step).with_context(|| format!("Step {}", idx + 1))?;
        scene.apply_all(&ops).with_context(|| format!("Step {}", idx + 1))?;
    }
    Ok(scene)
}

pub fn run(script_file: &str) -> anyhow::Result<()> {
    let steps = read_script(Path::new(script_file))?;
    let num_steps = steps.len();
    // Check both as a player and as an observer: locks differ.
    check_steps(Some(PlayerNum(0)), steps.clone())?;
    check_steps(None, steps)?;
    println!("OK: {num_steps} steps");
    Ok(())
}
