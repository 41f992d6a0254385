use serde::Serialize;

use kpix_db::user::models::User;

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub data: Vec<User>,
    pub count: usize,
}
