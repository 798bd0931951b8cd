//! Waypoint scan system - arrival/departure detection and retargeting.

use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;

/// Single in-order pass over the route.
///
/// Relies on the route's strictly-increasing positions: the first unarrived
/// waypoint in list order is always the nearest one, so the target cache is
/// refilled during the same pass that invalidates it.
///
/// On arrival the probe is snapped back to the exact arrival position -
/// high multipliers overshoot a point target within one tick - and the
/// ladder drops to the post-arrival rung so the probe does not immediately
/// blow past the next body.
pub fn waypoint_scan_system(
    config: Res<SimConfig>,
    mut phase: ResMut<Phase>,
    mut scale: ResMut<TimeScale>,
    mut route: ResMut<Route>,
    mut target: ResMut<TargetWaypoint>,
    mut events: ResMut<TransitEvents>,
    mut query: Query<&mut Position, With<Probe>>,
) {
    if *phase != Phase::Traveling {
        return;
    }
    let Ok(mut pos) = query.get_single_mut() else {
        return;
    };

    for (index, waypoint) in route.waypoints.iter_mut().enumerate() {
        if pos.0 >= waypoint.arrival_position && !waypoint.arrived {
            waypoint.arrived = true;
            pos.0 = waypoint.arrival_position;
            scale.decelerating = false;
            scale.index = config
                .post_arrival_scale_index
                .min(config.time_scales.len() - 1);
            target.0 = None;
            events.0.push(TransitEvent::Arrived {
                name: waypoint.name.clone(),
                facts: waypoint.facts.clone(),
            });
        }

        if target.0.is_none() && !waypoint.arrived {
            target.0 = Some(index);
        }

        if waypoint.arrived && !waypoint.left && pos.0 >= waypoint.departure_position {
            waypoint.left = true;
            events.0.push(TransitEvent::Departed {
                name: waypoint.name.clone(),
            });
        }
    }

    if let Some(final_departure) = route.final_departure() {
        if pos.0 > final_departure {
            *phase = Phase::Ended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitSpec;

    fn scan_world(waypoints: Vec<Waypoint>, start: f64) -> (World, Schedule) {
        let config = SimConfig {
            base_velocity: 1.0,
            start_position: start,
            start_scale_index: 1,
            post_arrival_scale_index: 1,
            decel_floor_index: 1,
            deceleration_window: 0.05,
            metres_per_unit: 1000.0,
            imperial: UnitSpec::new(1609.0, 0.0, "mi"),
            metric: UnitSpec::new(1000.0, 0.0, "km"),
            time_scales: vec![
                TimeScaleStep::new(0.0, "stop", 0.0),
                TimeScaleStep::new(1.0, "real", 0.0),
                TimeScaleStep::new(60.0, "1s = 1m", 0.0),
            ],
            waypoints: waypoints.clone(),
            rotations: vec![],
        };

        let mut world = World::new();
        world.insert_resource(Phase::Traveling);
        world.insert_resource(TimeScale {
            index: 2,
            decelerating: true,
        });
        world.insert_resource(Route::new(waypoints));
        world.insert_resource(TargetWaypoint(Some(0)));
        world.insert_resource(TransitEvents::default());
        world.spawn((Probe, Position(start)));
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(waypoint_scan_system);
        (world, schedule)
    }

    fn probe_position(world: &mut World) -> f64 {
        let mut query = world.query_filtered::<&Position, With<Probe>>();
        query.single(world).0
    }

    #[test]
    fn test_overshoot_snaps_to_arrival_position() {
        let waypoints = vec![
            Waypoint::new("wp0", 100.0, 101.0, WaypointFacts::default()),
            Waypoint::new("wp1", 200.0, 201.0, WaypointFacts::default()),
        ];
        // Probe overshot to 105 within one tick.
        let (mut world, mut schedule) = scan_world(waypoints, 105.0);
        schedule.run(&mut world);

        assert_eq!(probe_position(&mut world), 100.0);
        let route = world.resource::<Route>();
        assert!(route.waypoints[0].arrived);
        assert!(!route.waypoints[0].left);
        assert!(!route.waypoints[1].arrived);

        let scale = world.resource::<TimeScale>();
        assert_eq!(scale.index, 1);
        assert!(!scale.decelerating);
        assert_eq!(world.resource::<TargetWaypoint>().0, Some(1));

        let events = world.resource::<TransitEvents>();
        assert_eq!(events.0.len(), 1);
        assert_eq!(events.0[0].waypoint_name(), "wp0");
    }

    #[test]
    fn test_arrival_emitted_exactly_once() {
        let waypoints = vec![Waypoint::new("wp0", 100.0, 110.0, WaypointFacts::default())];
        let (mut world, mut schedule) = scan_world(waypoints, 102.0);
        schedule.run(&mut world);
        world.resource_mut::<TransitEvents>().drain();

        // Still past the arrival position; nothing new may fire.
        schedule.run(&mut world);
        assert!(world.resource::<TransitEvents>().0.is_empty());
        assert_eq!(probe_position(&mut world), 100.0);
    }

    #[test]
    fn test_snap_prevents_skipping_waypoints() {
        let waypoints = vec![
            Waypoint::new("wp0", 10.0, 10.5, WaypointFacts::default()),
            Waypoint::new("wp1", 12.0, 12.5, WaypointFacts::default()),
            Waypoint::new("wp2", 14.0, 14.5, WaypointFacts::default()),
        ];
        // One huge tick would cross all three; only the first may arrive.
        let (mut world, mut schedule) = scan_world(waypoints, 100.0);
        schedule.run(&mut world);

        let route = world.resource::<Route>();
        assert!(route.waypoints[0].arrived);
        assert!(!route.waypoints[1].arrived);
        assert!(!route.waypoints[2].arrived);
        assert_eq!(probe_position(&mut world), 10.0);
    }

    #[test]
    fn test_departure_after_dwell_span() {
        let waypoints = vec![
            Waypoint::new("wp0", 10.0, 12.0, WaypointFacts::default()),
            Waypoint::new("wp1", 20.0, 22.0, WaypointFacts::default()),
        ];
        let (mut world, mut schedule) = scan_world(waypoints, 11.0);
        schedule.run(&mut world);
        // Arrived and snapped to 10; not yet past departure at 12.
        assert!(!world.resource::<Route>().waypoints[0].left);
        world.resource_mut::<TransitEvents>().drain();

        // Move past the departure position by hand and rescan.
        {
            let mut query = world.query_filtered::<&mut Position, With<Probe>>();
            query.single_mut(&mut world).0 = 13.0;
        }
        schedule.run(&mut world);

        let route = world.resource::<Route>();
        assert!(route.waypoints[0].left);
        let events = world.resource::<TransitEvents>();
        assert_eq!(events.0.len(), 1);
        assert!(matches!(events.0[0], TransitEvent::Departed { .. }));
    }

    #[test]
    fn test_passing_final_departure_ends_simulation() {
        let waypoints = vec![Waypoint::new("wp0", 10.0, 12.0, WaypointFacts::default())];
        let (mut world, mut schedule) = scan_world(waypoints, 11.0);
        schedule.run(&mut world);
        assert_eq!(*world.resource::<Phase>(), Phase::Traveling);

        {
            let mut query = world.query_filtered::<&mut Position, With<Probe>>();
            query.single_mut(&mut world).0 = 12.5;
        }
        schedule.run(&mut world);
        assert_eq!(*world.resource::<Phase>(), Phase::Ended);
        assert_eq!(world.resource::<TargetWaypoint>().0, None);
    }
}
