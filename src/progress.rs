//! Saved campaign progress
//!
//! Persisted in LocalStorage on the web; native builds always start fresh.

use serde::{Deserialize, Serialize};

/// Index of the level the player is on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: usize,
}

impl Progress {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "spool_wire_level";

    /// Keep the saved level inside a pack of `level_count` levels
    pub fn clamped(self, level_count: usize) -> Self {
        Self {
            level: self.level.min(level_count.saturating_sub(1)),
        }
    }

    /// Decode a stored entry; anything unreadable means level 0
    fn parse(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_default()
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let progress = Self::parse(&json);
                log::info!("Loaded progress: level {}", progress.level + 1);
                return progress;
            }
        }

        log::info!("No saved progress");
        Self::default()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Progress saved: level {}", self.level + 1);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Progress not persisted on native (level {})", self.level + 1);
    }
}
