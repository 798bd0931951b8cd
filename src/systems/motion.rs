//! Motion system - uniform linear travel and simulated-time accrual.

use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick, in real
/// seconds. Already clamped non-negative by `TransitWorld::advance`.
#[derive(Resource, Debug, Default)]
pub struct DeltaTime(pub f64);

/// Moves the probe and accrues simulated time.
///
/// Motion is uniform linear travel: `base_velocity * multiplier * dt`.
/// Only the simulated-time rate changes with the ladder, never the
/// physical velocity. Frozen outside the Traveling phase.
pub fn motion_system(
    dt: Res<DeltaTime>,
    config: Res<SimConfig>,
    scale: Res<TimeScale>,
    phase: Res<Phase>,
    mut elapsed: ResMut<Elapsed>,
    mut query: Query<&mut Position, With<Probe>>,
) {
    if *phase != Phase::Traveling {
        return;
    }

    let speed = config.time_scales[scale.index.min(config.time_scales.len() - 1)].multiplier;
    let delta = dt.0.max(0.0);

    for mut pos in query.iter_mut() {
        pos.0 += config.base_velocity * speed * delta;
    }
    elapsed.0 += speed * delta;
}
