//! ECS components and resources for the transit simulation.
//!
//! Components are pure data containers attached to entities; global
//! simulation state lives in resources. All logic lives in systems.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// PROBE
// ============================================================================

/// Scalar position along the single travel axis, in scene units
/// (1 scene unit = one solar diameter), measured from the Sun's center.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub f64);

/// Marker for the probe entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Probe;

// ============================================================================
// GLOBAL SIMULATION STATE
// ============================================================================

/// Cumulative simulated time in seconds. Monotonically non-decreasing.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Elapsed(pub f64);

/// Top-level simulation phase.
///
/// `launch()` moves `PreStart -> Traveling`; crossing the final waypoint's
/// departure position moves `Traveling -> Ended`. Both PreStart and Ended
/// freeze the probe and the simulated clock.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PreStart,
    Traveling,
    Ended,
}

/// Unit system used when formatting distance-from-origin. The core stores
/// the flag and selects a divisor/offset pair; it does no conversion logic.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Imperial => UnitSystem::Metric,
            UnitSystem::Metric => UnitSystem::Imperial,
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::Imperial
    }
}

/// Current rung on the time-scale ladder, plus the auto-deceleration flag.
///
/// While `decelerating` is true, manual speed changes are rejected so the
/// ramp-down always completes a full ladder-step sequence.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeScale {
    /// Index into the configured ladder, clamped to `[0, len - 1]`.
    pub index: usize,
    /// True while the core is auto-reducing speed ahead of an arrival.
    pub decelerating: bool,
}

/// Cached index of the nearest not-yet-arrived waypoint, or `None` once
/// every waypoint has been visited. Recomputed only when an arrival
/// changes route state, not every tick.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetWaypoint(pub Option<usize>);

// ============================================================================
// TIME-SCALE LADDER
// ============================================================================

/// One entry in the ordered ladder of speed multipliers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeScaleStep {
    /// Simulated seconds advanced per real second. 0 = paused.
    pub multiplier: f64,
    /// Display text, e.g. "1s = 1h".
    pub label: String,
    /// Opaque passthrough for the host's audio mixing, 0..1.
    pub sound_level: f32,
}

impl TimeScaleStep {
    pub fn new(multiplier: f64, label: &str, sound_level: f32) -> Self {
        Self {
            multiplier,
            label: label.to_string(),
            sound_level,
        }
    }
}

// ============================================================================
// ROUTE / WAYPOINTS
// ============================================================================

/// Static descriptive attributes for one celestial body. Opaque payload:
/// passed through unchanged to the presentation layer on arrival, never
/// interpreted by the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointFacts {
    pub diameter: String,
    pub temperature: String,
    pub moons: String,
    pub day_length: String,
    pub fun_fact: String,
}

/// One celestial body the probe can reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    /// Position at which the probe is considered "arrived".
    pub arrival_position: f64,
    /// Position (>= arrival) past which the probe has "left" the body.
    /// The dwell span between the two keeps the facts panel visible.
    pub departure_position: f64,
    /// Monotonic false -> true.
    #[serde(default)]
    pub arrived: bool,
    /// Monotonic false -> true; can only follow `arrived`.
    #[serde(default)]
    pub left: bool,
    pub facts: WaypointFacts,
}

impl Waypoint {
    pub fn new(name: &str, arrival: f64, departure: f64, facts: WaypointFacts) -> Self {
        Self {
            name: name.to_string(),
            arrival_position: arrival,
            departure_position: departure,
            arrived: false,
            left: false,
            facts,
        }
    }
}

/// The ordered waypoint list. Positions are strictly increasing across the
/// sequence, which lets a single in-order scan pick the nearest unarrived
/// waypoint as the target.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Index of the first waypoint not yet arrived at, in list order.
    pub fn first_unarrived(&self) -> Option<usize> {
        self.waypoints.iter().position(|w| !w.arrived)
    }

    /// Departure position of the final waypoint.
    pub fn final_departure(&self) -> Option<f64> {
        self.waypoints.last().map(|w| w.departure_position)
    }
}

/// Rotation period of one celestial body, in hours. Negative for
/// retrograde rotation (Venus, Uranus, Pluto).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyRotation {
    pub name: String,
    pub period_hours: f64,
}

impl BodyRotation {
    pub fn new(name: &str, period_hours: f64) -> Self {
        Self {
            name: name.to_string(),
            period_hours,
        }
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Discrete event produced during a tick and drained into that tick's
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransitEvent {
    /// The probe reached a waypoint's arrival position.
    Arrived { name: String, facts: WaypointFacts },
    /// The probe passed a visited waypoint's departure position.
    Departed { name: String },
}

impl TransitEvent {
    /// Name of the waypoint this event refers to.
    pub fn waypoint_name(&self) -> &str {
        match self {
            TransitEvent::Arrived { name, .. } | TransitEvent::Departed { name } => name,
        }
    }
}

/// Buffer of events emitted since the last snapshot. Cleared when a
/// snapshot is taken.
#[derive(Resource, Debug, Default)]
pub struct TransitEvents(pub Vec<TransitEvent>);

impl TransitEvents {
    pub fn drain(&mut self) -> Vec<TransitEvent> {
        std::mem::take(&mut self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_toggles() {
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::default(), UnitSystem::Imperial);
    }

    #[test]
    fn test_route_first_unarrived() {
        let mut route = Route::new(vec![
            Waypoint::new("a", 10.0, 11.0, WaypointFacts::default()),
            Waypoint::new("b", 20.0, 21.0, WaypointFacts::default()),
        ]);
        assert_eq!(route.first_unarrived(), Some(0));

        route.waypoints[0].arrived = true;
        assert_eq!(route.first_unarrived(), Some(1));

        route.waypoints[1].arrived = true;
        assert_eq!(route.first_unarrived(), None);
        assert_eq!(route.final_departure(), Some(21.0));
    }

    #[test]
    fn test_event_buffer_drains() {
        let mut events = TransitEvents::default();
        events.0.push(TransitEvent::Departed {
            name: "Mars".to_string(),
        });
        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].waypoint_name(), "Mars");
        assert!(events.0.is_empty());
    }
}
