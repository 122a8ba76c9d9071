use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Store-side mirror of a watched network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GasRow {
    pub id: i64,
    pub token: String,
    pub nickname: bool,
    pub network: String,
    pub frequency: i64,
}
