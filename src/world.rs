//! Snapshot types and derived-quantity formatting.
//!
//! `Snapshot` is the per-tick read-only output bundle: everything the
//! presentation layer displays is derived here from the core state, so the
//! host never reaches into the ECS world directly.

use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::warn;

/// Seconds in a Julian year (365.25 days), the original display convention.
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Simulated elapsed time broken into display components.
///
/// Uses the truncation scheme of the source display: years are Julian, so
/// the components do not recompose exactly - they are display fields, not
/// a calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedBreakdown {
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedBreakdown {
    pub fn from_seconds(t: f64) -> Self {
        let t = t.max(0.0);
        let seconds = (t - 60.0 * (t / 60.0).trunc()).trunc();
        let minutes = (t / 60.0 - 60.0 * (t / SECONDS_PER_HOUR).trunc()).trunc();
        let hours = (t / SECONDS_PER_HOUR - 24.0 * (t / SECONDS_PER_DAY).trunc()).trunc();
        let days = (t / SECONDS_PER_DAY - 365.25 * (t / SECONDS_PER_YEAR).trunc()).trunc();
        let years = (t / SECONDS_PER_YEAR).trunc();

        // Invariant-violation detection, not error handling: out-of-range
        // components mean the truncation math broke, which the host wants
        // surfaced in diagnostics.
        if !(0.0..=60.0).contains(&seconds) {
            warn!(seconds, "elapsed seconds component out of range");
        }
        if !(0.0..=60.0).contains(&minutes) {
            warn!(minutes, "elapsed minutes component out of range");
        }
        if !(0.0..=24.0).contains(&hours) {
            warn!(hours, "elapsed hours component out of range");
        }
        if !(0.0..=365.0).contains(&days) {
            warn!(days, "elapsed days component out of range");
        }

        Self {
            years: years as u64,
            days: days.max(0.0) as u64,
            hours: hours.max(0.0) as u64,
            minutes: minutes.max(0.0) as u64,
            seconds: seconds.max(0.0) as u64,
        }
    }

    /// `"0y 000d 00h 00m 00s"` display form.
    pub fn label(&self) -> String {
        format!(
            "{}y {:03}d {:02}h {:02}m {:02}s",
            self.years, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Derived spin angle for one rendered body, radians in `[0, TAU)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub name: String,
    pub angle: f64,
}

/// Complete per-tick simulation state for the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of `advance` calls so far.
    pub tick: u64,
    /// Raw simulated seconds.
    pub elapsed_seconds: f64,
    pub elapsed: ElapsedBreakdown,
    pub elapsed_label: String,
    /// Probe position along the travel axis, scene units.
    pub position: f64,
    /// Distance from the origin body's surface in the active unit.
    pub distance: i64,
    pub distance_unit: String,
    /// Grouped-digit display form, e.g. `"36,250,582 mi"`.
    pub distance_label: String,
    /// Ladder label, or the ramp-down banner while decelerating.
    pub speed_label: String,
    /// Opaque audio passthrough from the active ladder step.
    pub sound_level: f32,
    pub decelerating: bool,
    pub target_name: Option<String>,
    /// Real seconds until the target at the current rate; `None` while
    /// paused or once every waypoint is visited.
    pub time_to_target: Option<f64>,
    pub time_to_target_label: Option<String>,
    /// Spin angles for every rendered body, derived from elapsed time.
    pub rotations: Vec<RotationSnapshot>,
    /// Events emitted since the previous snapshot.
    pub events: Vec<TransitEvent>,
    pub ended: bool,
}

impl Snapshot {
    /// Build a snapshot from the ECS world. `events` is the buffer drained
    /// for this tick.
    pub fn from_world(world: &mut World, tick: u64, events: Vec<TransitEvent>) -> Self {
        let mut position = 0.0;
        let mut query = world.query_filtered::<&Position, With<Probe>>();
        for pos in query.iter(world) {
            position = pos.0;
        }

        let config = world.resource::<SimConfig>();
        let route = world.resource::<Route>();
        let scale = world.resource::<TimeScale>();
        let target = world.resource::<TargetWaypoint>();
        let phase = *world.resource::<Phase>();
        let units = *world.resource::<UnitSystem>();
        let elapsed_seconds = world.resource::<Elapsed>().0;

        let step = &config.time_scales[scale.index.min(config.time_scales.len() - 1)];
        let elapsed = ElapsedBreakdown::from_seconds(elapsed_seconds);

        let unit = config.unit_spec(units == UnitSystem::Metric);
        let distance = (position * config.metres_per_unit / unit.divisor - unit.offset).round();
        let distance = distance as i64;
        let distance_label = format!("{} {}", group_digits(distance), unit.suffix);

        let target_waypoint = target.0.and_then(|i| route.waypoints.get(i));
        let target_name = target_waypoint.map(|w| w.name.clone());
        let time_to_target = target_waypoint.and_then(|w| {
            if step.multiplier > 0.0 {
                let remaining =
                    (w.arrival_position - position) / (config.base_velocity * step.multiplier);
                (remaining >= 0.0).then_some(remaining)
            } else {
                None
            }
        });

        let time_to_target_label = if scale.decelerating {
            target_name
                .as_ref()
                .map(|name| format!("Arriving At {name}"))
        } else {
            time_to_target.map(format_countdown)
        };

        let speed_label = if scale.decelerating {
            "Slowing Down".to_string()
        } else {
            step.label.clone()
        };

        let rotations = config
            .rotations
            .iter()
            .map(|body| RotationSnapshot {
                name: body.name.clone(),
                angle: (TAU * elapsed_seconds / (body.period_hours * SECONDS_PER_HOUR))
                    .rem_euclid(TAU),
            })
            .collect();

        Self {
            tick,
            elapsed_seconds,
            elapsed_label: elapsed.label(),
            elapsed,
            position,
            distance,
            distance_unit: unit.suffix.clone(),
            distance_label,
            speed_label,
            sound_level: step.sound_level,
            decelerating: scale.decelerating,
            target_name,
            time_to_target,
            time_to_target_label,
            rotations,
            events,
            ended: phase == Phase::Ended,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Countdown in its largest sensible unit: whole years/days/hours/minutes,
/// else seconds with one decimal.
fn format_countdown(remaining: f64) -> String {
    if remaining >= SECONDS_PER_YEAR {
        format!("{}y", (remaining / SECONDS_PER_YEAR).round() as i64)
    } else if remaining >= SECONDS_PER_DAY {
        format!("{}d", (remaining / SECONDS_PER_DAY).round() as i64)
    } else if remaining >= SECONDS_PER_HOUR {
        format!("{}h", (remaining / SECONDS_PER_HOUR).round() as i64)
    } else if remaining >= 60.0 {
        format!("{}m", (remaining / 60.0).round() as i64)
    } else {
        format!("{remaining:.1}s")
    }
}

/// Thousands separators for display, e.g. `-1234567 -> "-1,234,567"`.
fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let first = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
