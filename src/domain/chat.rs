use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Summary row from `/users/{id}/chats`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub topic: Option<String>,
    pub chat_type: Option<String>,
}
