use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether higher or lower values of a KPI are considered better.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiDirection {
    UpIsBetter,
    DownIsBetter,
}

impl KpiDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpIsBetter => "UP_IS_BETTER",
            Self::DownIsBetter => "DOWN_IS_BETTER",
        }
    }
}

impl FromStr for KpiDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UP_IS_BETTER" => Ok(Self::UpIsBetter),
            "DOWN_IS_BETTER" => Ok(Self::DownIsBetter),
            _ => Err(format!("unknown KPI direction: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl KpiFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }
}

impl FromStr for KpiFrequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            _ => Err(format!("unknown KPI frequency: {value}")),
        }
    }
}

/// Health status of a KPI value relative to its thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiStatus {
    Green,
    Orange,
    Red,
}

impl KpiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Orange => "ORANGE",
            Self::Red => "RED",
        }
    }
}

impl FromStr for KpiStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GREEN" => Ok(Self::Green),
            "ORANGE" => Ok(Self::Orange),
            "RED" => Ok(Self::Red),
            _ => Err(format!("unknown KPI status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kpi {
    pub id: Uuid,
    pub dashboard_id: Uuid,
    pub org_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub unit: Option<String>,
    pub frequency: KpiFrequency,
    pub direction: KpiDirection,
    pub threshold_green: f64,
    pub threshold_orange: f64,
    pub threshold_red: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A measured value for one period of a KPI. Append-only: the status is
/// derived from the thresholds at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiValue {
    pub id: Uuid,
    pub kpi_id: Uuid,
    pub org_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub value: f64,
    pub status: KpiStatus,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
