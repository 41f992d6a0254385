use async_trait::async_trait;
use uuid::Uuid;

use crate::kpi::models::{Kpi, KpiValue};
use kpix_common::error::KpixResult;

#[async_trait]
pub trait KpiRepository: Send + Sync {
    async fn create(&self, kpi: Kpi) -> KpixResult<Kpi>;
    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<Kpi>>;
    async fn list_for_dashboard(&self, org_id: Uuid, dashboard_id: Uuid) -> KpixResult<Vec<Kpi>>;
    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<Kpi>>;
    async fn update(&self, kpi: Kpi) -> KpixResult<Kpi>;
    async fn delete(&self, org_id: Uuid, id: Uuid) -> KpixResult<()>;
}

#[async_trait]
pub trait KpiValueRepository: Send + Sync {
    async fn create(&self, value: KpiValue) -> KpixResult<KpiValue>;
    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<KpiValue>>;
    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<KpiValue>>;
}
