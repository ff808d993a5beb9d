use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub user_id: i64,
    pub(crate) username: Option<String>,
    pub(crate) ref_code: String,
    pub(crate) referred_by: Option<String>,
    pub(crate) join_date: OffsetDateTime,
}
