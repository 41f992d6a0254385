use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use kpix_db::action::models::ActionStatus;

#[derive(Debug, Deserialize)]
pub struct CreateActionRequest {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub progress: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub status: Option<ActionStatus>,
}
