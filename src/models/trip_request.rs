use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TripRequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl TripRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripRequestStatus::Pending => "pending",
            TripRequestStatus::Accepted => "accepted",
            TripRequestStatus::Rejected => "rejected",
            TripRequestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown trip request status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TripRequest {
    pub id: i64,
    pub user_id: i64,
    pub trip_id: i64,
    pub status: TripRequestStatus,
    pub created_at: DateTime<Utc>,
}
