use async_trait::async_trait;
use uuid::Uuid;

use crate::user::models::User;
use kpix_common::error::KpixResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<User>>;
    async fn list(&self, org_id: Uuid) -> KpixResult<Vec<User>>;
}
