use serde::{Deserialize, Deserializer, Serialize};

use crate::models::area::Area;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Server-assigned identifier
    pub id: i64,
    /// Full name of the employee
    pub name: String,
    /// Job title
    #[serde(default)]
    pub position: String,
    /// Area the employee belongs to
    #[serde(default)]
    pub area_id: Option<i64>,
    /// Direct manager, `None` for top-level employees
    #[serde(default)]
    pub manager_id: Option<i64>,
    /// Area as resolved by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    /// Manager as resolved by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<Box<Employee>>,
    /// Direct reports as resolved by the server, in server order
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub subordinates: Vec<Employee>,
}

impl Employee {
    pub fn is_manager(&self) -> bool {
        !self.subordinates.is_empty()
    }

    /// The area id, falling back to the resolved area when the flat field is missing
    pub fn area_ref(&self) -> Option<i64> {
        self.area_id.or_else(|| self.area.as_ref().map(|a| a.id))
    }

    pub fn manager_ref(&self) -> Option<i64> {
        self.manager_id.or_else(|| self.manager.as_ref().map(|m| m.id))
    }

    pub fn area_name(&self) -> Option<&str> {
        self.area.as_ref().map(|a| a.name.as_str())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Employee>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Employee>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body for creating or updating an employee
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub position: String,
    pub area_id: i64,
    pub manager_id: Option<i64>,
}
