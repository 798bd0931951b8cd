//! ECS systems for the transit simulation.
//!
//! The schedule runs the three systems in a fixed chain once per
//! `advance(dt)` call:
//!
//! 1. `motion_system` - uniform linear travel scaled by the active ladder
//!    multiplier; accrues simulated time.
//! 2. `waypoint_scan_system` - in-order arrival/departure detection,
//!    overshoot snapping, post-arrival ladder reset, target cache refresh,
//!    end-of-route detection.
//! 3. `deceleration_system` - steps the ladder down one rung per tick while
//!    an arrival is imminent.
//!
//! The chain order matters: deceleration reads the position and target the
//! scan just settled, so an arrival tick never also triggers a ramp toward
//! the next body.

pub mod deceleration;
pub mod motion;
pub mod waypoints;

pub use deceleration::*;
pub use motion::*;
pub use waypoints::*;
