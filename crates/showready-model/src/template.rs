use serde::{Deserialize, Serialize};

/// Global, reusable custom-item blueprint. Not owned by any event; many
/// checklists may apply the same template independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTemplate {
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}
