use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::coordinates::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of ids minted from the clock, `None` for anything else.
    pub fn as_millis(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            WorkoutType::Running => WorkoutType::Cycling,
            WorkoutType::Cycling => WorkoutType::Running,
        }
    }
}

impl FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(format!("Unknown workout type: {other}")),
        }
    }
}

/// Variant specific data. The `type` tag is what brings the right variant back
/// when a stored snapshot is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        cadence: u32,
        /// min/km
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// A recorded workout. Every field is fixed at construction, derived values
/// included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<FixedOffset>,
    coords: Coordinates,
    /// km
    distance: f64,
    /// min
    duration: f64,
    description: String,
    #[serde(flatten)]
    kind: WorkoutKind,
}

impl Workout {
    pub fn running(
        id: WorkoutId,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        cadence: u32,
    ) -> Self {
        let pace = round2(duration / distance);
        Self::new(id, created_at, coords, distance, duration, WorkoutKind::Running { cadence, pace })
    }

    pub fn cycling(
        id: WorkoutId,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        let speed = round2(distance / (duration / 60.));
        Self::new(id, created_at, coords, distance, duration, WorkoutKind::Cycling { elevation_gain, speed })
    }

    fn new(
        id: WorkoutId,
        created_at: DateTime<FixedOffset>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Self {
        let description = format!("{} on {}", kind.workout_type().label(), created_at.format("%B %-d"));

        Self {
            id,
            created_at,
            coords,
            distance,
            duration,
            description,
            kind,
        }
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }
}

impl PartialEq for Workout {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Workout {}

fn round2(value: f64) -> f64 {
    (value * 100.).round() / 100.
}
