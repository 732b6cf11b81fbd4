//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - One tick per pointer sample, no timers
//! - Stable iteration order (arena order by `SpoolId`)
//! - No rendering or platform dependencies

pub mod drag;
pub mod geometry;
pub mod power;
pub mod resolve;
pub mod state;
pub mod tick;
pub mod view;

pub use drag::{DragControl, GuardedHandle, guard_handle};
pub use geometry::{Side, TangentPair, line_circle_intersect, line_line_intersect, tangents};
pub use power::{FaultReport, PowerReport, evaluate_faults, flow_power, is_level_complete};
pub use resolve::{SettleReport, resolve_connections, resolve_disconnections, settle};
pub use state::{Attachment, Block, Cable, Finish, LevelState, Spool, SpoolId, SpoolKind};
pub use tick::{LevelEvent, TickInput, tick};
pub use view::FrameView;
