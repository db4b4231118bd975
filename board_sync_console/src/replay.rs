use std::sync::mpsc;

use anyhow::Context;
use board_sync::{ClientState, Scene, VisualOp};
use log::{info, warn};

use crate::replay_config::{ReplayConfig, ScriptStep, read_script};
use crate::tui::render_scene;


pub struct ReplayOptions {
    pub config: ReplayConfig,
    pub final_only: bool,
}

pub fn execute_step(client: &mut ClientState, step: ScriptStep) -> anyhow::Result<Vec<VisualOp>> {
    Ok(match step {
        ScriptStep::Server(update) => client.process_update(update)?,
        ScriptStep::Flip { inverted } => client.set_orientation(inverted)?,
        ScriptStep::Drop { id, to } => {
            let engine = client.engine();
            let layout = engine.layout().context("Cannot drop before the board is shown")?;
            if !layout.shape().contains(to) {
                anyhow::bail!("Cannot drop onto {to:?}: outside {:?}", layout.shape());
            }
            let point = layout.tile_center(engine.orientation(), to);
            // Rejected drags are part of normal play, so they don't stop the replay.
            if let Err(err) = client.start_drag_piece(&id) {
                warn!("{err}");
                return Ok(vec![]);
            }
            // Dropping only sends a request; the board changes once the server replies.
            client.drag_piece_drop(point)?;
            vec![]
        }
        ScriptStep::Highlight { at, color } => client.set_tile_highlight(at, color),
    })
}

pub fn run(options: ReplayOptions) -> anyhow::Result<()> {
    let ReplayOptions { config, final_only } = options;
    let steps = read_script(&config.script)?;
    info!("Replaying {} steps from {}", steps.len(), config.script.display());

    let (requests_tx, requests_rx) = mpsc::channel();
    let mut client = ClientState::new(config.my_player, config.canvas, config.engine, requests_tx);
    let mut scene = Scene::new();
    if config.inverted {
        scene.apply_all(&client.set_orientation(true)?)?;
    }
    for (idx, step) in steps.into_iter().enumerate() {
        let step_num = idx + 1;
        let ops = execute_step(&mut client, step).with_context(|| format!("Step {step_num}"))?;
        scene
            .apply_all(&ops)
            .with_context(|| format!("Step {step_num} produced inconsistent visual ops"))?;
        for request in requests_rx.try_iter() {
            info!("requestMove: {} to ({}, {})", request.id, request.x, request.y);
        }
        if !final_only {
            println!("Step {step_num}: {} visual ops", ops.len());
            println!("{}", render_scene(&scene));
        }
    }
    if final_only {
        print!("{}", render_scene(&scene));
    }
    Ok(())
}
