//! What the UI draws for a workout, independent of how it is drawn.

use crate::workout::{Workout, WorkoutId, WorkoutKind, WorkoutType};

#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    pub max_width: f64,
    pub min_width: f64,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupSpec {
    pub fn for_type(workout_type: WorkoutType) -> Self {
        Self {
            max_width: 250.,
            min_width: 150.,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{}-popup", workout_type.as_str()),
        }
    }
}

pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.workout_type().glyph(), workout.description())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: impl ToString, unit: &'static str) -> Self {
        Self {
            icon,
            value: value.to_string(),
            unit,
        }
    }
}

/// One entry of the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub id: WorkoutId,
    pub class: String,
    pub title: String,
    pub details: Vec<Detail>,
}

impl From<&Workout> for SummaryRow {
    fn from(workout: &Workout) -> Self {
        let workout_type = workout.workout_type();

        let mut details = vec![
            Detail::new(workout_type.glyph(), workout.distance(), "km"),
            Detail::new("⏱", workout.duration(), "min"),
        ];

        match *workout.kind() {
            WorkoutKind::Running { cadence, pace } => {
                details.push(Detail::new("⚡️", format!("{pace:.2}"), "min/km"));
                details.push(Detail::new("🦶🏼", cadence, "spm"));
            }
            WorkoutKind::Cycling { elevation_gain, speed } => {
                details.push(Detail::new("⚡️", format!("{speed:.2}"), "km/h"));
                details.push(Detail::new("⛰", elevation_gain, "m"));
            }
        }

        Self {
            id: workout.id().clone(),
            class: format!("workout workout--{}", workout_type.as_str()),
            title: workout.description().to_owned(),
            details,
        }
    }
}
