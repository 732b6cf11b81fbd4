//! Level data, the built-in level pack and campaign order
//!
//! Levels are plain JSON: obstacles as `[x, y, radius]` triples, markers as
//! `[x, y]`. The built-in pack is embedded at compile time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH};
use crate::progress::Progress;
use crate::sim::state::{LevelState, SpoolKind};

const BUILTIN_LEVELS: &str = include_str!("../levels/levels.json");

/// Errors at the level-data boundary
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} {index} has invalid radius {radius}")]
    InvalidRadius {
        kind: &'static str,
        index: usize,
        radius: f32,
    },
    #[error("{kind} {index} at ({x}, {y}) is outside the level")]
    OutOfBounds {
        kind: &'static str,
        index: usize,
        x: f32,
        y: f32,
    },
    #[error("no level {0} in this pack")]
    NoSuchLevel(usize),
    #[error("level pack contains no levels")]
    EmptyPack,
}

/// One level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Normal spools, `[x, y, radius]`
    pub spools: Vec<[f32; 3]>,
    #[serde(default)]
    pub isolators: Vec<[f32; 3]>,
    #[serde(default)]
    pub blocks: Vec<[f32; 3]>,
    pub start: [f32; 2],
    pub finish: [f32; 2],
    /// Initial position of the draggable end
    pub end: [f32; 2],
}

fn check_point(kind: &'static str, index: usize, [x, y]: [f32; 2]) -> Result<(), LevelError> {
    let inside = x.is_finite()
        && y.is_finite()
        && (0.0..=LEVEL_WIDTH).contains(&x)
        && (0.0..=LEVEL_HEIGHT).contains(&y);
    if inside {
        Ok(())
    } else {
        Err(LevelError::OutOfBounds { kind, index, x, y })
    }
}

fn check_circles(kind: &'static str, circles: &[[f32; 3]]) -> Result<(), LevelError> {
    for (index, &[x, y, radius]) in circles.iter().enumerate() {
        check_point(kind, index, [x, y])?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(LevelError::InvalidRadius {
                kind,
                index,
                radius,
            });
        }
    }
    Ok(())
}

impl LevelData {
    /// Parse and validate a single level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Reject non-positive radii and positions outside the level
    pub fn validate(&self) -> Result<(), LevelError> {
        check_circles("spool", &self.spools)?;
        check_circles("isolator", &self.isolators)?;
        check_circles("block", &self.blocks)?;
        check_point("start", 0, self.start)?;
        check_point("finish", 0, self.finish)?;
        check_point("end", 0, self.end)?;
        Ok(())
    }

    /// Export the layout of a running level (the end at its initial position)
    pub fn from_state(state: &LevelState) -> Self {
        let circles = |kind: SpoolKind| {
            state
                .spools
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| [s.pos.x, s.pos.y, s.radius])
                .collect()
        };
        let start = state.spool(state.start).pos;

        Self {
            spools: circles(SpoolKind::Normal),
            isolators: circles(SpoolKind::Isolator),
            blocks: state
                .blocks
                .iter()
                .map(|b| [b.pos.x, b.pos.y, b.radius])
                .collect(),
            start: start.to_array(),
            finish: state.finish.pos.to_array(),
            end: state.end_home.to_array(),
        }
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An ordered list of levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<LevelData>,
}

impl LevelPack {
    /// Parse a `{ "levels": [...] }` document, validating every level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let pack: Self = serde_json::from_str(json)?;
        if pack.levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        for level in &pack.levels {
            level.validate()?;
        }
        Ok(pack)
    }

    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&LevelData, LevelError> {
        self.levels.get(index).ok_or(LevelError::NoSuchLevel(index))
    }
}

/// Position in a level pack
#[derive(Debug, Clone)]
pub struct Campaign {
    pack: LevelPack,
    current: usize,
}

impl Campaign {
    /// Resume a pack at saved progress (clamped to the last level)
    pub fn new(pack: LevelPack, progress: Progress) -> Result<Self, LevelError> {
        if pack.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        let current = progress.clamped(pack.len()).level;
        log::info!("Campaign at level {} of {}", current + 1, pack.len());
        Ok(Self { pack, current })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.pack.len()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.pack.len()
    }

    /// Progress to persist for the current position
    pub fn progress(&self) -> Progress {
        Progress {
            level: self.current,
        }
    }

    /// Jump to a specific level
    pub fn select(&mut self, index: usize) -> Result<(), LevelError> {
        self.pack.get(index)?;
        self.current = index;
        log::info!("Selected level {}", index + 1);
        Ok(())
    }

    /// Move on after completing the current level
    ///
    /// Returns `false` when the pack is finished; the campaign then starts
    /// over at the first level.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            log::info!("All {} levels complete", self.pack.len());
            self.current = 0;
            false
        } else {
            self.current += 1;
            log::info!("Advanced to level {}", self.current + 1);
            true
        }
    }

    /// Skip ahead without completing (not past the last level)
    pub fn skip(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        log::info!("Skipped to level {}", self.current + 1);
        true
    }

    /// Go back one level (not before the first)
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        log::info!("Back to level {}", self.current + 1);
        true
    }

    /// Fresh state for the current level (also used to reset it)
    pub fn start_level(&self) -> LevelState {
        LevelState::new(&self.pack.levels[self.current])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "spools": [[460, 207, 70], [468, 516, 70]],
        "start": [50, 360],
        "finish": [1230, 360],
        "end": [110, 360]
    }"#;

    fn campaign(level: usize) -> Campaign {
        Campaign::new(LevelPack::builtin().unwrap(), Progress { level }).unwrap()
    }

    #[test]
    fn test_parse_level_with_defaults() {
        let level = LevelData::from_json(LEVEL).unwrap();
        assert_eq!(level.spools.len(), 2);
        assert!(level.isolators.is_empty());
        assert!(level.blocks.is_empty());
        assert_eq!(level.end, [110.0, 360.0]);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = LevelData::from_json(r#"{"spools": [[1, 2]]}"#).unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_validation_rejects_bad_radius() {
        let mut level = LevelData::from_json(LEVEL).unwrap();
        level.blocks.push([300.0, 300.0, 0.0]);
        let err = level.validate().unwrap_err();
        assert!(matches!(
            err,
            LevelError::InvalidRadius {
                kind: "block",
                index: 0,
                ..
            }
        ));

        level.blocks[0][2] = f32::NAN;
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_bounds() {
        let mut level = LevelData::from_json(LEVEL).unwrap();
        level.finish = [1400.0, 360.0];
        let err = level.validate().unwrap_err();
        assert!(matches!(err, LevelError::OutOfBounds { kind: "finish", .. }));
        assert_eq!(err.to_string(), "finish 0 at (1400, 360) is outside the level");
    }

    #[test]
    fn test_builtin_pack_is_valid() {
        let pack = LevelPack::builtin().unwrap();
        assert_eq!(pack.len(), 16);
        assert_eq!(pack.levels[0].spools.len(), 2);
        for level in &pack.levels {
            level.validate().unwrap();
            let state = LevelState::new(level);
            assert_eq!(state.total_spools, level.spools.len());
        }
    }

    #[test]
    fn test_empty_pack_is_rejected() {
        let err = LevelPack::from_json(r#"{"levels": []}"#).unwrap_err();
        assert!(matches!(err, LevelError::EmptyPack));
    }

    #[test]
    fn test_export_matches_source_layout() {
        let pack = LevelPack::builtin().unwrap();
        for level in &pack.levels {
            let state = LevelState::new(level);
            assert_eq!(&LevelData::from_state(&state), level);
        }
    }

    #[test]
    fn test_export_resets_end_position() {
        let level = LevelData::from_json(LEVEL).unwrap();
        let mut state = LevelState::new(&level);
        let end = state.end.0;
        state.spools[end].pos = glam::Vec2::new(900.0, 100.0);
        assert_eq!(LevelData::from_state(&state).end, [110.0, 360.0]);

        let json = LevelData::from_state(&state).to_json().unwrap();
        assert_eq!(LevelData::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_campaign_navigation() {
        let mut campaign = campaign(0);
        assert!(!campaign.back());
        assert_eq!(campaign.current(), 0);

        assert!(campaign.skip());
        assert_eq!(campaign.current(), 1);
        assert!(campaign.back());
        assert_eq!(campaign.current(), 0);

        assert!(campaign.advance());
        assert_eq!(campaign.progress(), Progress { level: 1 });
    }

    #[test]
    fn test_campaign_end_of_game() {
        let mut campaign = campaign(15);
        assert!(campaign.is_last());
        assert!(!campaign.skip());
        assert_eq!(campaign.current(), 15);

        assert!(!campaign.advance());
        assert_eq!(campaign.current(), 0);
        assert_eq!(campaign.progress(), Progress { level: 0 });
    }

    #[test]
    fn test_campaign_clamps_saved_progress() {
        let campaign = campaign(99);
        assert_eq!(campaign.current(), 15);
    }

    #[test]
    fn test_campaign_select_and_reset() {
        let mut campaign = campaign(0);
        assert!(matches!(campaign.select(16), Err(LevelError::NoSuchLevel(16))));
        campaign.select(2).unwrap();

        let first = campaign.start_level();
        let again = campaign.start_level();
        assert_eq!(first.spools.len(), again.spools.len());
        assert_eq!(first.cable.attachments.len(), 2);
        assert!(!again.completed);
    }
}
