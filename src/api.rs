//! Public API for the simulation.
//!
//! This module provides the main interface for a rendering host (or any
//! other client) to drive the simulation.
//!
//! ## Tick model
//!
//! The host calls `advance(dt)` once per animation frame with the real
//! seconds elapsed since the previous frame (see [`crate::clock::FrameClock`]).
//! Every physical quantity is scaled by `dt`, so the result is independent
//! of frame rate: many small ticks sum to the same state as one large one.
//!
//! ## Threading
//!
//! The core is not reentrant. `faster`/`slower`/`toggle_units` take `&mut
//! self` like `advance`, so control input is applied atomically between
//! ticks by construction; a multi-threaded host wraps the whole value in
//! its own lock.

use crate::components::*;
use crate::config::{ConfigError, SimConfig};
use crate::systems::*;
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The main simulation container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Constructing (and validating) the simulation
/// - Advancing it one frame at a time
/// - Discrete speed/unit control input
/// - Extracting state snapshots
pub struct TransitWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
}

impl TransitWorld {
    /// Simulation of the built-in Solar System journey.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(SimConfig::solar_system())
    }

    /// Simulation with a custom configuration.
    ///
    /// Validates the route and ladder up front; a core that constructed
    /// successfully can never observe invalid config at tick time.
    pub fn with_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(Elapsed(0.0));
        world.insert_resource(Phase::PreStart);
        world.insert_resource(UnitSystem::default());
        world.insert_resource(TimeScale {
            index: config.start_scale_index,
            decelerating: false,
        });
        world.insert_resource(Route::new(config.waypoints.clone()));
        world.insert_resource(TargetWaypoint(Some(0)));
        world.insert_resource(TransitEvents::default());
        world.spawn((Probe, Position(config.start_position)));
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems((motion_system, waypoint_scan_system, deceleration_system).chain());

        Ok(Self {
            world,
            schedule,
            tick: 0,
        })
    }

    /// Begin travel. Idempotent; has no effect once the journey has ended.
    pub fn launch(&mut self) {
        let mut phase = self.world.resource_mut::<Phase>();
        if *phase == Phase::PreStart {
            *phase = Phase::Traveling;
        }
    }

    /// Advance the simulation by `dt` real seconds and return the snapshot.
    ///
    /// Negative `dt` is clamped to zero rather than treated as an error;
    /// the tick source already guards this, but the core does not assume
    /// perfect collaborators. Before launch and after the journey ends the
    /// call is permitted but leaves position and elapsed time frozen.
    pub fn advance(&mut self, dt: f64) -> Snapshot {
        self.world.resource_mut::<DeltaTime>().0 = dt.max(0.0);
        self.schedule.run(&mut self.world);
        self.tick += 1;
        self.snapshot()
    }

    /// Step one rung up the time-scale ladder. Silent no-op at the top,
    /// and rejected while auto-deceleration is running.
    pub fn faster(&mut self) {
        let len = self.world.resource::<SimConfig>().time_scales.len();
        let mut scale = self.world.resource_mut::<TimeScale>();
        if !scale.decelerating && scale.index + 1 < len {
            scale.index += 1;
        }
    }

    /// Step one rung down the ladder. Silent no-op at the bottom, and
    /// rejected while auto-deceleration is running.
    pub fn slower(&mut self) {
        let mut scale = self.world.resource_mut::<TimeScale>();
        if !scale.decelerating && scale.index > 0 {
            scale.index -= 1;
        }
    }

    /// Flip between imperial and metric distance formatting.
    pub fn toggle_units(&mut self) {
        let mut units = self.world.resource_mut::<UnitSystem>();
        *units = units.toggled();
    }

    /// Get a snapshot of the current simulation state, draining any events
    /// emitted since the previous snapshot.
    pub fn snapshot(&mut self) -> Snapshot {
        let events = self.world.resource_mut::<TransitEvents>().drain();
        Snapshot::from_world(&mut self.world, self.tick, events)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Number of `advance` calls so far.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Cumulative simulated seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.world.resource::<Elapsed>().0
    }

    /// Probe position along the travel axis, scene units.
    pub fn position(&mut self) -> f64 {
        let mut query = self.world.query_filtered::<&Position, With<Probe>>();
        query.iter(&self.world).map(|p| p.0).next().unwrap_or(0.0)
    }

    /// Current rung on the time-scale ladder.
    pub fn time_scale_index(&self) -> usize {
        self.world.resource::<TimeScale>().index
    }

    /// True while the core is auto-reducing speed ahead of an arrival.
    pub fn is_decelerating(&self) -> bool {
        self.world.resource::<TimeScale>().decelerating
    }

    /// Index of the nearest not-yet-arrived waypoint.
    pub fn target_waypoint(&self) -> Option<usize> {
        self.world.resource::<TargetWaypoint>().0
    }

    /// The route with per-waypoint visit state.
    pub fn route(&self) -> &Route {
        self.world.resource::<Route>()
    }

    /// True once the probe has passed the final waypoint's departure
    /// position. Travel halts there; further `advance` calls are no-ops
    /// for position and elapsed time.
    pub fn ended(&self) -> bool {
        *self.world.resource::<Phase>() == Phase::Ended
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
