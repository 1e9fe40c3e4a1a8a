//! Submitted form bodies and their validation.
//!
//! Every field deserializes as a string so a missing or blank input never
//! trips the extractor; `validate` decides what the values mean.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::accounts::Registration;
use crate::db::models::{EntryValues, HealthEntry};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Date must be a valid calendar date (YYYY-MM-DD).")]
    InvalidDate,

    #[error("{0} must be a number.")]
    NotANumber(&'static str),

    #[error("{0} must be a whole number.")]
    NotAnInteger(&'static str),

    #[error("Weight must be between 0 and {max} kg.", max = MAX_WEIGHT_KG)]
    WeightOutOfRange,
}

/// Exclusive upper bound on a stored weight.
pub const MAX_WEIGHT_KG: f64 = 1000.0;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub age: String,
    pub gender: String,
}

impl LoginForm {
    /// Usernames are stored trimmed, so lookups trim the same way.
    pub fn normalize(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
        }
    }
}

impl RegisterForm {
    pub fn validate(self) -> Result<Registration, FormError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(FormError::Required("Username"));
        }
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }

        let age = match optional(&self.age) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| FormError::NotAnInteger("Age"))? as i64,
            ),
            None => None,
        };

        Ok(Registration {
            username,
            password: self.password,
            age,
            gender: optional(&self.gender).map(str::to_string),
        })
    }
}

/// Raw add/edit fields, also used to refill the form after a rejected submit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    pub date: String,
    pub weight: String,
    pub steps: String,
    pub calories: String,
}

impl EntryForm {
    pub fn validate(&self) -> Result<EntryValues, FormError> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(FormError::Required("Date"));
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;

        let weight = match optional(&self.weight) {
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| FormError::NotANumber("Weight"))?;
                // "NaN" and "inf" parse as f64 but are not weights
                if !value.is_finite() {
                    return Err(FormError::NotANumber("Weight"));
                }
                if value <= 0.0 || value >= MAX_WEIGHT_KG {
                    return Err(FormError::WeightOutOfRange);
                }
                Some(value)
            }
            None => None,
        };

        Ok(EntryValues {
            date: date.to_string(),
            weight,
            steps: parse_integer(&self.steps, "Steps")?,
            calories_burned: parse_integer(&self.calories, "Calories")?,
        })
    }
}

impl From<&HealthEntry> for EntryForm {
    fn from(entry: &HealthEntry) -> Self {
        Self {
            date: entry.date.clone(),
            weight: entry.weight.map(|w| w.to_string()).unwrap_or_default(),
            steps: entry.steps.map(|s| s.to_string()).unwrap_or_default(),
            calories: entry
                .calories_burned
                .map(|c| c.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Blank and whitespace-only inputs count as absent.
fn optional(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_integer(raw: &str, field: &'static str) -> Result<Option<i64>, FormError> {
    optional(raw)
        .map(|v| v.parse::<i64>().map_err(|_| FormError::NotAnInteger(field)))
        .transpose()
}
