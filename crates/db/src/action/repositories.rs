use async_trait::async_trait;
use uuid::Uuid;

use crate::action::models::ActionPlan;
use kpix_common::error::KpixResult;

#[async_trait]
pub trait ActionRepository: Send + Sync {
    async fn create(&self, action: ActionPlan) -> KpixResult<ActionPlan>;
    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<ActionPlan>>;
    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<ActionPlan>>;
    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<ActionPlan>>;
    async fn update(&self, action: ActionPlan) -> KpixResult<ActionPlan>;
}
