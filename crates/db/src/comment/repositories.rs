use async_trait::async_trait;
use uuid::Uuid;

use crate::comment::models::Comment;
use kpix_common::error::KpixResult;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> KpixResult<Comment>;
    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<Comment>>;
    async fn list_for_action(&self, org_id: Uuid, action_id: Uuid) -> KpixResult<Vec<Comment>>;
}
