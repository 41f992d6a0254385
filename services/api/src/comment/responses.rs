use serde::Serialize;

use kpix_db::comment::models::Comment;

#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
    pub data: Vec<Comment>,
    pub count: usize,
}
