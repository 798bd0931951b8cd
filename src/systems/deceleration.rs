//! Deceleration system - automatic ladder ramp-down on final approach.

use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;

/// Steps the ladder down one rung per tick when an arrival is imminent.
///
/// The ramp begins when the time to the target drops inside the configured
/// window while the ladder sits above the deceleration floor. Once begun it
/// continues unconditionally - one rung per tick down to the floor, holding
/// there - until the arrival itself clears the flag. Manual speed input is
/// rejected for the whole ramp, so the sequence always runs to completion.
pub fn deceleration_system(
    config: Res<SimConfig>,
    phase: Res<Phase>,
    route: Res<Route>,
    target: Res<TargetWaypoint>,
    mut scale: ResMut<TimeScale>,
    query: Query<&Position, With<Probe>>,
) {
    if *phase != Phase::Traveling {
        return;
    }

    if !scale.decelerating {
        let Some(index) = target.0 else { return };
        let Ok(pos) = query.get_single() else { return };
        let speed = config.time_scales[scale.index.min(config.time_scales.len() - 1)].multiplier;
        if speed <= 0.0 {
            return;
        }

        let remaining =
            (route.waypoints[index].arrival_position - pos.0) / (config.base_velocity * speed);
        if remaining > 0.0
            && remaining <= config.deceleration_window
            && scale.index > config.decel_floor_index
        {
            scale.decelerating = true;
        }
    }

    if scale.decelerating && scale.index > config.decel_floor_index {
        scale.index -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitSpec;

    fn decel_world(start_position: f64, start_index: usize) -> (World, Schedule) {
        let config = SimConfig {
            base_velocity: 1.0,
            start_position,
            start_scale_index: start_index,
            post_arrival_scale_index: 1,
            decel_floor_index: 2,
            deceleration_window: 0.05,
            metres_per_unit: 1000.0,
            imperial: UnitSpec::new(1609.0, 0.0, "mi"),
            metric: UnitSpec::new(1000.0, 0.0, "km"),
            time_scales: vec![
                TimeScaleStep::new(0.0, "stop", 0.0),
                TimeScaleStep::new(1.0, "x1", 0.0),
                TimeScaleStep::new(2.0, "x2", 0.0),
                TimeScaleStep::new(4.0, "x4", 0.0),
                TimeScaleStep::new(8.0, "x8", 0.0),
                TimeScaleStep::new(16.0, "x16", 0.0),
            ],
            waypoints: vec![Waypoint::new("wp0", 10.0, 11.0, WaypointFacts::default())],
            rotations: vec![],
        };

        let mut world = World::new();
        world.insert_resource(Phase::Traveling);
        world.insert_resource(TimeScale {
            index: start_index,
            decelerating: false,
        });
        world.insert_resource(Route::new(config.waypoints.clone()));
        world.insert_resource(TargetWaypoint(Some(0)));
        world.spawn((Probe, Position(start_position)));
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(deceleration_system);
        (world, schedule)
    }

    #[test]
    fn test_ramp_steps_down_once_per_tick_to_floor() {
        // remaining = (10 - 9.5) / (1 * 16) = 0.03125 <= 0.05 window.
        let (mut world, mut schedule) = decel_world(9.5, 5);

        schedule.run(&mut world);
        let scale = *world.resource::<TimeScale>();
        assert!(scale.decelerating);
        assert_eq!(scale.index, 4);

        schedule.run(&mut world);
        assert_eq!(world.resource::<TimeScale>().index, 3);

        schedule.run(&mut world);
        assert_eq!(world.resource::<TimeScale>().index, 2);

        // Holds at the floor, still flagged until arrival clears it.
        schedule.run(&mut world);
        let scale = *world.resource::<TimeScale>();
        assert_eq!(scale.index, 2);
        assert!(scale.decelerating);
    }

    #[test]
    fn test_no_ramp_outside_window() {
        // remaining = (10 - 0) / 16 = 0.625, well outside the window.
        let (mut world, mut schedule) = decel_world(0.0, 5);
        schedule.run(&mut world);
        let scale = *world.resource::<TimeScale>();
        assert!(!scale.decelerating);
        assert_eq!(scale.index, 5);
    }

    #[test]
    fn test_no_ramp_when_paused() {
        let (mut world, mut schedule) = decel_world(9.99, 0);
        schedule.run(&mut world);
        let scale = *world.resource::<TimeScale>();
        assert!(!scale.decelerating);
        assert_eq!(scale.index, 0);
    }

    #[test]
    fn test_no_ramp_at_or_below_floor() {
        // Close enough to trigger, but already at the floor index.
        let (mut world, mut schedule) = decel_world(9.95, 2);
        schedule.run(&mut world);
        let scale = *world.resource::<TimeScale>();
        assert!(!scale.decelerating);
        assert_eq!(scale.index, 2);
    }

    #[test]
    fn test_no_ramp_without_target() {
        let (mut world, mut schedule) = decel_world(9.5, 5);
        world.resource_mut::<TargetWaypoint>().0 = None;
        schedule.run(&mut world);
        assert!(!world.resource::<TimeScale>().decelerating);
    }
}
