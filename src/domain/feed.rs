use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub url: String,
    pub created_at: Option<String>,
}

impl Feed {
    pub fn new(id: i64, url: String) -> Self {
        Self {
            id,
            url,
            created_at: None,
        }
    }
}
