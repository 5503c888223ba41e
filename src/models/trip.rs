use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

use super::UpdateFields;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Open,
    Closed,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Open => "open",
            TripStatus::Closed => "closed",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown trip status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Trip {
    pub id: i64,
    pub destination: String,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub female_allowed: bool,
    pub male_count: i64,
    pub female_count: i64,
    pub status: TripStatus,
    pub creator_id: i64,
    pub itinerary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_female_allowed() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub destination: String,
    pub creator_id: i64,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_female_allowed")]
    pub female_allowed: bool,
    #[serde(default)]
    pub male_count: i64,
    #[serde(default)]
    pub female_count: i64,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub itinerary: Option<String>,
}

impl NewTrip {
    pub fn new(destination: impl Into<String>, creator_id: i64) -> Self {
        Self {
            destination: destination.into(),
            creator_id,
            budget: None,
            start_date: None,
            end_date: None,
            female_allowed: default_female_allowed(),
            male_count: 0,
            female_count: 0,
            status: TripStatus::Open,
            itinerary: None,
        }
    }
}

/// Editable trip fields. The creator and timestamps are not on this list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TripUpdate {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub budget: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub female_allowed: Option<bool>,
    #[serde(default)]
    pub male_count: Option<i64>,
    #[serde(default)]
    pub female_count: Option<i64>,
    #[serde(default)]
    pub status: Option<TripStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub itinerary: Option<Option<String>>,
}

impl TripUpdate {
    pub fn status(status: TripStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl UpdateFields for TripUpdate {
    const FIELDS: &'static [&'static str] = &[
        "destination",
        "budget",
        "start_date",
        "end_date",
        "female_allowed",
        "male_count",
        "female_count",
        "status",
        "itinerary",
    ];
}
