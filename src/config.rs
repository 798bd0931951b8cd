//! Simulation configuration and validation.
//!
//! `SimConfig` is supplied once at construction and inserted into the ECS
//! world as a resource. Validation runs before the world is built; a
//! rejected config means the core cannot run at all.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{BodyRotation, TimeScaleStep, Waypoint, WaypointFacts};

/// Fatal configuration errors detected at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("waypoint list must not be empty")]
    EmptyRoute,

    #[error("waypoint `{name}` departs at {departure} before arriving at {arrival}")]
    InvertedDwell {
        name: String,
        arrival: f64,
        departure: f64,
    },

    #[error("waypoints out of order: `{prev}` at {prev_position} is not before `{next}` at {next_position}")]
    RouteNotAscending {
        prev: String,
        prev_position: f64,
        next: String,
        next_position: f64,
    },

    #[error("time-scale ladder must not be empty")]
    EmptyLadder,

    #[error("time-scale step {index} (`{label}`) has negative multiplier {multiplier}")]
    NegativeMultiplier {
        index: usize,
        label: String,
        multiplier: f64,
    },

    #[error("time-scale ladder not sorted ascending at step {index}")]
    LadderNotAscending { index: usize },

    #[error("{field} index {index} out of range for a ladder of {len} steps")]
    ScaleIndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("deceleration floor rung {index} (`{label}`) is paused; the ramp could never reach arrival")]
    PausedDecelFloor { index: usize, label: String },

    #[error("base velocity must be positive, got {0}")]
    NonPositiveVelocity(f64),

    #[error("deceleration window must be positive, got {0}")]
    NonPositiveWindow(f64),

    #[error("rotation period for `{name}` must be non-zero")]
    ZeroRotationPeriod { name: String },
}

/// Divisor/offset pair for formatting distance-from-origin in one unit
/// system. `value = position * metres_per_unit / divisor - offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub divisor: f64,
    pub offset: f64,
    pub suffix: String,
}

impl UnitSpec {
    pub fn new(divisor: f64, offset: f64, suffix: &str) -> Self {
        Self {
            divisor,
            offset,
            suffix: suffix.to_string(),
        }
    }
}

/// Complete simulation configuration.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Scene units travelled per simulated second at multiplier 1.
    pub base_velocity: f64,
    /// Probe start position along the travel axis.
    pub start_position: f64,
    /// Ladder index active at launch.
    pub start_scale_index: usize,
    /// Ladder index restored after each arrival, so the probe does not
    /// immediately blow past the next target.
    pub post_arrival_scale_index: usize,
    /// Deceleration never steps below this ladder index.
    pub decel_floor_index: usize,
    /// Time-to-target window (seconds) that triggers auto-deceleration.
    pub deceleration_window: f64,
    /// Metres represented by one scene unit.
    pub metres_per_unit: f64,
    pub imperial: UnitSpec,
    pub metric: UnitSpec,
    pub time_scales: Vec<TimeScaleStep>,
    pub waypoints: Vec<Waypoint>,
    /// Spin periods for every rendered body (Sun included), used only to
    /// derive snapshot spin angles.
    pub rotations: Vec<BodyRotation>,
}

impl SimConfig {
    /// Check every structural invariant the core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waypoints.is_empty() {
            return Err(ConfigError::EmptyRoute);
        }
        for w in &self.waypoints {
            if w.departure_position < w.arrival_position {
                return Err(ConfigError::InvertedDwell {
                    name: w.name.clone(),
                    arrival: w.arrival_position,
                    departure: w.departure_position,
                });
            }
        }
        for pair in self.waypoints.windows(2) {
            if pair[1].arrival_position <= pair[0].departure_position {
                return Err(ConfigError::RouteNotAscending {
                    prev: pair[0].name.clone(),
                    prev_position: pair[0].departure_position,
                    next: pair[1].name.clone(),
                    next_position: pair[1].arrival_position,
                });
            }
        }

        if self.time_scales.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }
        for (index, step) in self.time_scales.iter().enumerate() {
            if step.multiplier < 0.0 {
                return Err(ConfigError::NegativeMultiplier {
                    index,
                    label: step.label.clone(),
                    multiplier: step.multiplier,
                });
            }
        }
        for (index, pair) in self.time_scales.windows(2).enumerate() {
            if pair[1].multiplier < pair[0].multiplier {
                return Err(ConfigError::LadderNotAscending { index: index + 1 });
            }
        }

        let len = self.time_scales.len();
        for (field, index) in [
            ("start_scale_index", self.start_scale_index),
            ("post_arrival_scale_index", self.post_arrival_scale_index),
            ("decel_floor_index", self.decel_floor_index),
        ] {
            if index >= len {
                return Err(ConfigError::ScaleIndexOutOfRange { field, index, len });
            }
        }

        // The ramp holds at the floor until arrival; a paused floor rung
        // would freeze the probe with manual input still locked out.
        let floor = &self.time_scales[self.decel_floor_index];
        if floor.multiplier == 0.0 {
            return Err(ConfigError::PausedDecelFloor {
                index: self.decel_floor_index,
                label: floor.label.clone(),
            });
        }

        if self.base_velocity <= 0.0 {
            return Err(ConfigError::NonPositiveVelocity(self.base_velocity));
        }
        if self.deceleration_window <= 0.0 {
            return Err(ConfigError::NonPositiveWindow(self.deceleration_window));
        }

        for body in &self.rotations {
            if body.period_hours == 0.0 {
                return Err(ConfigError::ZeroRotationPeriod {
                    name: body.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Resolve the `UnitSpec` for the given unit system.
    pub fn unit_spec(&self, metric: bool) -> &UnitSpec {
        if metric {
            &self.metric
        } else {
            &self.imperial
        }
    }

    /// The full Solar System journey: Voyager-scale velocity, ten stops
    /// from Mercury to Pluto, and the ten-rung time-scale ladder.
    pub fn solar_system() -> Self {
        Self {
            // Roughly the 38,026 mph Voyager is moving, in scene units.
            base_velocity: 0.000012212,
            // Just in front of the Sun's surface.
            start_position: 0.500001,
            start_scale_index: 1,
            post_arrival_scale_index: 1,
            decel_floor_index: 2,
            deceleration_window: 0.05,
            // One scene unit is one solar diameter.
            metres_per_unit: 1_392_000_000.0,
            imperial: UnitSpec::new(1609.0, 432_567.34, "mi"),
            metric: UnitSpec::new(1000.0, 695_999.99999, "km"),
            time_scales: vec![
                TimeScaleStep::new(0.0, "Time Stopped", 0.0),
                TimeScaleStep::new(1.0, "Real-time", 0.0),
                TimeScaleStep::new(60.0, "1s = 1m", 0.08),
                TimeScaleStep::new(300.0, "1s = 5m", 0.16),
                TimeScaleStep::new(3600.0, "1s = 1h", 0.24),
                TimeScaleStep::new(86400.0, "1s = 1d", 0.32),
                TimeScaleStep::new(1_296_000.0, "1s = 15d", 0.4),
                TimeScaleStep::new(2_592_000.0, "1s = 30d", 0.48),
                TimeScaleStep::new(5_184_000.0, "1s = 60d", 0.56),
                TimeScaleStep::new(10_368_000.0, "1s = 120d", 0.64),
            ],
            waypoints: vec![
                Waypoint::new("Mercury", 41.596, 41.604, WaypointFacts {
                    diameter: "3,032 mi (4,879 km)".to_string(),
                    temperature: "333\u{b0}F (167\u{b0}C)".to_string(),
                    moons: "0".to_string(),
                    day_length: "175.9 Earth Days".to_string(),
                    fun_fact: "Mercury's temperature fluctuates from around 800\u{b0}F (430\u{b0}C) during the day to around -290\u{b0}F (-180\u{b0}C) at night.".to_string(),
                }),
                Waypoint::new("Venus", 77.723, 77.737, WaypointFacts {
                    diameter: "7,521 mi (12,104 km)".to_string(),
                    temperature: "867\u{b0}F (464\u{b0}C)".to_string(),
                    moons: "0".to_string(),
                    day_length: "116.8 Earth Days".to_string(),
                    fun_fact: "Venus has a thick atmosphere of carbon dioxide that makes it hotter than Mercury, despite being farther from the Sun.".to_string(),
                }),
                Waypoint::new("Earth", 107.492, 107.508, WaypointFacts {
                    diameter: "7,926 mi (12,756 km)".to_string(),
                    temperature: "59\u{b0}F (15\u{b0}C)".to_string(),
                    moons: "1".to_string(),
                    day_length: "1 Earth Day".to_string(),
                    fun_fact: "Earth is the only planet in the Universe known to support life.".to_string(),
                }),
                Waypoint::new("The Moon", 107.774, 107.778402704, WaypointFacts {
                    diameter: "2,159 mi (3,475 km)".to_string(),
                    temperature: "-4\u{b0}F (-20\u{b0}C)".to_string(),
                    moons: "0".to_string(),
                    day_length: "29.5 Earth Days".to_string(),
                    fun_fact: "When the Moon is at its farthest distance from Earth, you could fit all the other planets (including Pluto) in the space between them.".to_string(),
                }),
                Waypoint::new("Mars", 163.696, 163.704, WaypointFacts {
                    diameter: "4,221 mi (6,792 km)".to_string(),
                    temperature: "-85\u{b0}F (-65\u{b0}C)".to_string(),
                    moons: "2".to_string(),
                    day_length: "1.03 Earth Days".to_string(),
                    fun_fact: "Mars is home to the tallest volcano in the Solar System, Olympus Mons, which is about two and a half times the height of Mount Everest.".to_string(),
                }),
                Waypoint::new("Jupiter", 559.2, 559.4, WaypointFacts {
                    diameter: "88,846 mi (142,984 km)".to_string(),
                    temperature: "-166\u{b0}F (-110\u{b0}C)".to_string(),
                    moons: "95".to_string(),
                    day_length: "0.414 Earth Days".to_string(),
                    fun_fact: "Jupiter actually has rings, along with Uranus and Neptune. These rings are just much harder to see compared to Saturn's rings.".to_string(),
                }),
                Waypoint::new("Saturn", 1028.88, 1029.12, WaypointFacts {
                    diameter: "74,897 mi (120,536 km)".to_string(),
                    temperature: "-220\u{b0}F (-140\u{b0}C)".to_string(),
                    moons: "146".to_string(),
                    day_length: "0.444 Earth Days".to_string(),
                    fun_fact: "Despite Saturn's rings being around 175,000 miles (282,000 km) wide, their thickness is less than the length of a football field.".to_string(),
                }),
                Waypoint::new("Uranus", 2066.968, 2067.032, WaypointFacts {
                    diameter: "31,763 mi (51,118 km)".to_string(),
                    temperature: "-320\u{b0}F (-195\u{b0}C)".to_string(),
                    moons: "27".to_string(),
                    day_length: "0.718 Earth Days".to_string(),
                    fun_fact: "Uranus is unique because it rotates on its side, with its axis tilted by about 98 degrees.".to_string(),
                }),
                Waypoint::new("Neptune", 3234.968, 3235.032, WaypointFacts {
                    diameter: "30,775 mi (49,528 km)".to_string(),
                    temperature: "-330\u{b0}F (-200\u{b0}C)".to_string(),
                    moons: "14".to_string(),
                    day_length: "0.671 Earth Days".to_string(),
                    fun_fact: "Neptune is known for its strong winds, the fastest in the Solar System, reaching speeds of more than 1,200 mph (2,000 km/h).".to_string(),
                }),
                Waypoint::new("Pluto", 4219.9978, 4220.0022, WaypointFacts {
                    diameter: "1,476 mi (2,376 km)".to_string(),
                    temperature: "-375\u{b0}F (-225\u{b0}C)".to_string(),
                    moons: "5".to_string(),
                    day_length: "6.39 Earth Days".to_string(),
                    fun_fact: "Pluto was once considered the ninth planet in our Solar System before being reclassified as a dwarf planet in 2006.".to_string(),
                }),
            ],
            rotations: vec![
                BodyRotation::new("Sun", 648.0),
                BodyRotation::new("Mercury", 1407.6),
                BodyRotation::new("Venus", -5832.5),
                BodyRotation::new("Earth", 23.9),
                BodyRotation::new("The Moon", 655.7),
                BodyRotation::new("Mars", 24.6),
                BodyRotation::new("Jupiter", 9.9),
                BodyRotation::new("Saturn", 10.7),
                BodyRotation::new("Uranus", -17.2),
                BodyRotation::new("Neptune", 16.1),
                BodyRotation::new("Pluto", -153.3),
            ],
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::solar_system()
    }
}
