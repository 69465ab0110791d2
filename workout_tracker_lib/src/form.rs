use std::fmt;

use thiserror::Error;

use crate::workout::WorkoutType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Distance => "distance",
            Field::Duration => "duration",
            Field::Cadence => "cadence",
            Field::Elevation => "elevation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field} must be a positive number, got {value:?}")]
pub struct InvalidInput {
    pub field: Field,
    pub value: String,
}

/// Raw text of the workout form, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub workout_type: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Form input that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidInput {
    Running { distance: f64, duration: f64, cadence: u32 },
    Cycling { distance: f64, duration: f64, elevation: f64 },
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Distance => &self.distance,
            Field::Duration => &self.duration,
            Field::Cadence => &self.cadence,
            Field::Elevation => &self.elevation,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Distance => &mut self.distance,
            Field::Duration => &mut self.duration,
            Field::Cadence => &mut self.cadence,
            Field::Elevation => &mut self.elevation,
        };
        *slot = value.into();
    }

    /// Empties every text field. The selected type is kept.
    pub fn clear(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
    }

    /// Distance, duration and the metric of the selected type must all be
    /// finite and strictly positive.
    pub fn validate(&self) -> Result<ValidInput, InvalidInput> {
        let distance = self.positive(Field::Distance)?;
        let duration = self.positive(Field::Duration)?;

        match self.workout_type {
            WorkoutType::Running => {
                let cadence = self.whole(Field::Cadence)?;
                Ok(ValidInput::Running { distance, duration, cadence })
            }
            WorkoutType::Cycling => Ok(ValidInput::Cycling {
                distance,
                duration,
                elevation: self.positive(Field::Elevation)?,
            }),
        }
    }

    /// Step counts are taken as typed, never rounded.
    fn whole(&self, field: Field) -> Result<u32, InvalidInput> {
        let value = self.positive(field)?;
        if value.fract() != 0. || value > f64::from(u32::MAX) {
            return Err(InvalidInput {
                field,
                value: self.get(field).to_owned(),
            });
        }
        Ok(value as u32)
    }

    fn positive(&self, field: Field) -> Result<f64, InvalidInput> {
        let raw = self.get(field);
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0. => Ok(value),
            _ => Err(InvalidInput {
                field,
                value: raw.to_owned(),
            }),
        }
    }
}

/// Display state of the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub visible: bool,
    pub values: FormValues,
}

impl FormState {
    /// The type specific input currently shown. Always exactly one.
    pub fn visible_metric(&self) -> Field {
        match self.values.workout_type {
            WorkoutType::Running => Field::Cadence,
            WorkoutType::Cycling => Field::Elevation,
        }
    }

    pub fn is_field_hidden(&self, field: Field) -> bool {
        matches!(field, Field::Cadence | Field::Elevation) && field != self.visible_metric()
    }

    pub fn toggle_type(&mut self) {
        self.values.workout_type = self.values.workout_type.toggled();
    }
}
