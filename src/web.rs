//! Browser bindings
//!
//! The page owns the canvas and the input listeners; it feeds one pointer
//! sample per animation frame into [`WebLevel::tick`] and draws the JSON
//! snapshot from [`WebLevel::view_json`].

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::level::{Campaign, LevelPack};
use crate::progress::Progress;
use crate::sim::{FrameView, LevelEvent, LevelState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Spool Wire starting...");
}

/// The running campaign and its current level
#[wasm_bindgen]
pub struct WebLevel {
    campaign: Campaign,
    state: LevelState,
}

impl WebLevel {
    fn open(campaign: Campaign) -> Self {
        let state = campaign.start_level();
        Self { campaign, state }
    }

    fn restart(&mut self) {
        self.state = self.campaign.start_level();
        self.campaign.progress().save();
    }
}

#[wasm_bindgen]
impl WebLevel {
    /// Open the built-in pack at `index`
    #[wasm_bindgen(constructor)]
    pub fn new(index: usize) -> Result<WebLevel, JsError> {
        let mut campaign = Campaign::new(LevelPack::builtin()?, Progress::default())?;
        campaign.select(index)?;
        Ok(Self::open(campaign))
    }

    /// Open the built-in pack at the saved level
    pub fn resume() -> Result<WebLevel, JsError> {
        let campaign = Campaign::new(LevelPack::builtin()?, Progress::load())?;
        Ok(Self::open(campaign))
    }

    /// Advance one frame; `true` on the tick the level is completed
    pub fn tick(&mut self, x: f32, y: f32, down: bool) -> bool {
        let input = TickInput {
            pointer: Vec2::new(x, y),
            pointer_down: down,
        };
        tick(&mut self.state, &input).contains(&LevelEvent::Completed)
    }

    /// Snapshot of the current frame for the page to draw
    pub fn view_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&FrameView::capture(&self.state))?)
    }

    /// Counter text, e.g. `"2 / 5"`
    pub fn progress_text(&self) -> String {
        self.state.progress_text()
    }

    pub fn level_count(&self) -> usize {
        self.campaign.len()
    }

    pub fn current_level(&self) -> usize {
        self.campaign.current()
    }

    /// Next level after a win; `false` once the whole pack is done
    pub fn advance(&mut self) -> bool {
        let more = self.campaign.advance();
        self.restart();
        more
    }

    pub fn skip(&mut self) -> bool {
        let moved = self.campaign.skip();
        if moved {
            self.restart();
        }
        moved
    }

    pub fn back(&mut self) -> bool {
        let moved = self.campaign.back();
        if moved {
            self.restart();
        }
        moved
    }

    /// Rebuild the current level from scratch
    pub fn reset(&mut self) {
        self.state = self.campaign.start_level();
    }
}
