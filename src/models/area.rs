use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Area {
    /// Server-assigned identifier
    pub id: i64,
    /// Display name of the area, never empty
    pub name: String,
}

/// Request body for creating or renaming an area
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AreaInput {
    pub name: String,
}
