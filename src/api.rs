use thiserror::Error;

use crate::models::{
    area::{Area, AreaInput},
    employee::{Employee, EmployeeInput},
};

pub mod http;
#[cfg(test)]
pub mod memory;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("The request was interrupted before a response arrived")]
    Interrupted,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Remote persistence for areas and employees.
///
/// Employees returned by [`Api::list_employees`] carry their area, manager and
/// direct subordinates already resolved by the server. Updates and deletes
/// ignore the response body.
pub trait Api {
    fn list_areas(&self) -> Result<Vec<Area>, ApiError>;
    fn get_area(&self, id: i64) -> Result<Area, ApiError>;
    fn create_area(&self, input: &AreaInput) -> Result<Area, ApiError>;
    fn update_area(&self, id: i64, input: &AreaInput) -> Result<(), ApiError>;
    fn delete_area(&self, id: i64) -> Result<(), ApiError>;

    fn list_employees(&self) -> Result<Vec<Employee>, ApiError>;
    fn get_employee(&self, id: i64) -> Result<Employee, ApiError>;
    fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, ApiError>;
    fn update_employee(&self, id: i64, input: &EmployeeInput) -> Result<(), ApiError>;
    fn delete_employee(&self, id: i64) -> Result<(), ApiError>;
}
