//! Spool Wire entry point
//!
//! Native builds run a scripted, headless drag on one level and print the
//! result. The web build starts from `web::wasm_start` instead.

#[cfg(not(target_arch = "wasm32"))]
use spool_wire::{Campaign, LevelError, LevelPack, Progress};

/// Pointer steps between grabbing the handle and reaching the finish
#[cfg(not(target_arch = "wasm32"))]
const DRAG_STEPS: usize = 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spool Wire (native) starting...");

    let level = match std::env::args().nth(1) {
        None => 1,
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => {
                eprintln!("usage: spool-wire [LEVEL]  (LEVEL is 1-based)");
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = run(level - 1) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Drag the end handle straight onto the finish and report what happened
#[cfg(not(target_arch = "wasm32"))]
fn run(index: usize) -> Result<(), LevelError> {
    use glam::Vec2;
    use spool_wire::sim::{FrameView, LevelEvent, TickInput, tick};

    let mut campaign = Campaign::new(LevelPack::builtin()?, Progress::load())?;
    campaign.select(index)?;
    let mut state = campaign.start_level();

    let from = state.end_pos();
    let to = state.finish.pos;
    let mut completed = false;

    for step in 0..=DRAG_STEPS {
        let pointer = from.lerp(to, step as f32 / DRAG_STEPS as f32);
        for event in tick(&mut state, &TickInput { pointer, pointer_down: true }) {
            match event {
                LevelEvent::PoweredChanged { powered, total } => {
                    log::info!("Powered {} / {}", powered, total);
                }
                LevelEvent::Completed => completed = true,
            }
        }
    }
    // Let go of the handle
    tick(
        &mut state,
        &TickInput {
            pointer: Vec2::ZERO,
            pointer_down: false,
        },
    );

    println!(
        "Level {} of {}: {} powered, {}",
        campaign.current() + 1,
        campaign.len(),
        state.progress_text(),
        if completed { "complete" } else { "not complete" }
    );
    if completed {
        campaign.advance();
        campaign.progress().save();
    }

    let view = FrameView::capture(&state);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
