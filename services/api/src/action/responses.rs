use serde::Serialize;

use kpix_db::action::models::ActionPlan;

#[derive(Debug, Serialize)]
pub struct ListActionsResponse {
    pub data: Vec<ActionPlan>,
    pub count: usize,
}
