use async_trait::async_trait;
use uuid::Uuid;

use crate::dashboard::models::Dashboard;
use kpix_common::error::KpixResult;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn create(&self, dashboard: Dashboard) -> KpixResult<Dashboard>;
    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<Dashboard>>;
    async fn list(&self, org_id: Uuid) -> KpixResult<Vec<Dashboard>>;
    async fn update(&self, dashboard: Dashboard) -> KpixResult<Dashboard>;
    async fn delete(&self, org_id: Uuid, id: Uuid) -> KpixResult<()>;
}
