use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt digest, never the plaintext.
    pub password_hash: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

/// Fields supplied when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub weight: Option<f64>,
    pub steps: Option<i64>,
    pub calories_burned: Option<i64>,
}

/// The user-editable part of an entry. Add and edit both write all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryValues {
    pub date: String,
    pub weight: Option<f64>,
    pub steps: Option<i64>,
    pub calories_burned: Option<i64>,
}

/// One point of the weight-over-time series.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightPoint {
    pub date: String,
    pub weight: f64,
}
