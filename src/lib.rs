//! Headless simulation core for a probe's transit across the Solar System.
//!
//! The crate owns all travel state and time semantics; a rendering host
//! drives it one frame at a time and draws whatever the snapshot says:
//!
//! ```
//! use voyager_sim::{FrameClock, TransitWorld};
//!
//! let mut sim = TransitWorld::new().unwrap();
//! let mut clock = FrameClock::new();
//! sim.launch();
//! clock.start();
//! for _ in 0..3 {
//!     let snapshot = sim.advance(clock.tick());
//!     for event in &snapshot.events {
//!         println!("reached {}", event.waypoint_name());
//!     }
//! }
//! ```
//!
//! Everything scales by the real seconds handed to `advance`, so two hosts
//! running at different frame rates see identical journeys.

pub mod api;
pub mod clock;
pub mod components;
pub mod config;
pub mod systems;
pub mod world;

pub use api::TransitWorld;
pub use clock::FrameClock;
pub use components::{
    Elapsed, Phase, Position, Probe, Route, TargetWaypoint, TimeScale, TimeScaleStep,
    TransitEvent, TransitEvents, UnitSystem, Waypoint, WaypointFacts,
};
pub use config::{ConfigError, SimConfig, UnitSpec};
pub use systems::{deceleration_system, motion_system, waypoint_scan_system, DeltaTime};
pub use world::{ElapsedBreakdown, RotationSnapshot, Snapshot, SECONDS_PER_YEAR};
