use thiserror::Error;
use tracing::info;

use crate::{
    api::{Api, ApiError},
    models::employee::{Employee, EmployeeInput},
    prompt::{Confirm, PromptError},
    services::{Deletion, areas::find_area},
};

#[derive(Debug, Error)]
pub enum CreateEmployeeError {
    #[error("Employee name cannot be empty")]
    EmptyName,

    #[error("Employee position cannot be empty")]
    EmptyPosition,

    #[error("Area #{0} not found")]
    AreaNotFound(i64),

    #[error("Manager #{0} not found")]
    ManagerNotFound(i64),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub struct CreateEmployeeParameters {
    pub name: String,
    pub position: String,
    pub area_id: i64,
    pub manager_id: Option<i64>,
}

pub fn create_employee(
    api: &impl Api,
    parameters: CreateEmployeeParameters,
) -> Result<Employee, CreateEmployeeError> {
    let name = parameters.name.trim();
    if name.is_empty() {
        return Err(CreateEmployeeError::EmptyName);
    }
    let position = parameters.position.trim();
    if position.is_empty() {
        return Err(CreateEmployeeError::EmptyPosition);
    }

    if !area_exists(api, parameters.area_id)? {
        return Err(CreateEmployeeError::AreaNotFound(parameters.area_id));
    }

    if let Some(manager_id) = parameters.manager_id {
        if find_employee(api, manager_id)?.is_none() {
            return Err(CreateEmployeeError::ManagerNotFound(manager_id));
        }
    }

    let employee = api.create_employee(&EmployeeInput {
        name: name.to_string(),
        position: position.to_string(),
        area_id: parameters.area_id,
        manager_id: parameters.manager_id,
    })?;
    info!(employee_id = employee.id, name = %employee.name, "employee created");

    Ok(employee)
}

/// What an update does to the employee's reporting line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerChange {
    #[default]
    Keep,
    Set(i64),
    Clear,
}

impl ManagerChange {
    pub fn from_command_flags(manager: Option<i64>, no_manager: bool) -> Self {
        match (manager, no_manager) {
            (Some(id), _) => ManagerChange::Set(id),
            (None, true) => ManagerChange::Clear,
            (None, false) => ManagerChange::Keep,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateEmployeeError {
    #[error("Employee #{0} not found")]
    EmployeeNotFound(i64),

    #[error("Employee name cannot be empty")]
    EmptyName,

    #[error("Employee position cannot be empty")]
    EmptyPosition,

    #[error("Employee #{0} has no area on record, pass --area")]
    AreaRequired(i64),

    #[error("Area #{0} not found")]
    AreaNotFound(i64),

    #[error("Manager #{0} not found")]
    ManagerNotFound(i64),

    #[error("Employee #{0} cannot be their own manager")]
    SelfManagement(i64),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[derive(Default)]
pub struct UpdateEmployeeParameters {
    pub id: i64,
    pub name: Option<String>,
    pub position: Option<String>,
    pub area_id: Option<i64>,
    pub manager: ManagerChange,
}

/// Merges the provided fields over the employee's current record and submits the result.
pub fn update_employee(
    api: &impl Api,
    parameters: UpdateEmployeeParameters,
) -> Result<Employee, UpdateEmployeeError> {
    let current = find_employee(api, parameters.id)?
        .ok_or(UpdateEmployeeError::EmployeeNotFound(parameters.id))?;

    let name = match parameters.name {
        Some(name) => name.trim().to_string(),
        None => current.name.clone(),
    };
    if name.is_empty() {
        return Err(UpdateEmployeeError::EmptyName);
    }

    let position = match parameters.position {
        Some(position) => position.trim().to_string(),
        None => current.position.clone(),
    };
    if position.is_empty() {
        return Err(UpdateEmployeeError::EmptyPosition);
    }

    let area_id = match parameters.area_id {
        Some(area_id) => {
            if !area_exists(api, area_id)? {
                return Err(UpdateEmployeeError::AreaNotFound(area_id));
            }
            area_id
        }
        None => current
            .area_ref()
            .ok_or(UpdateEmployeeError::AreaRequired(current.id))?,
    };

    let manager_id = match parameters.manager {
        ManagerChange::Keep => current.manager_ref(),
        ManagerChange::Clear => None,
        ManagerChange::Set(manager_id) if manager_id == current.id => {
            return Err(UpdateEmployeeError::SelfManagement(manager_id));
        }
        ManagerChange::Set(manager_id) => {
            if find_employee(api, manager_id)?.is_none() {
                return Err(UpdateEmployeeError::ManagerNotFound(manager_id));
            }
            Some(manager_id)
        }
    };

    let input = EmployeeInput {
        name,
        position,
        area_id,
        manager_id,
    };
    api.update_employee(current.id, &input)?;
    info!(employee_id = current.id, "employee updated");

    Ok(Employee {
        id: current.id,
        name: input.name,
        position: input.position,
        area_id: Some(input.area_id),
        manager_id: input.manager_id,
        ..Employee::default()
    })
}

#[derive(Debug, Error)]
pub enum DeleteEmployeeError {
    #[error("Employee #{0} not found")]
    EmployeeNotFound(i64),

    #[error("{0}")]
    Prompt(#[from] PromptError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub struct DeleteEmployeeParameters {
    pub id: i64,
    pub skip_confirmation: bool,
}

pub fn delete_employee(
    api: &impl Api,
    prompt: &mut impl Confirm,
    parameters: DeleteEmployeeParameters,
) -> Result<Deletion<Employee>, DeleteEmployeeError> {
    let employee = find_employee(api, parameters.id)?
        .ok_or(DeleteEmployeeError::EmployeeNotFound(parameters.id))?;

    if !parameters.skip_confirmation {
        let mut question = format!("Delete employee '{}'?", employee.name);
        if employee.is_manager() {
            question.push_str(&format!(
                " They manage {} employee(s).",
                employee.subordinates.len()
            ));
        }
        question.push_str(" This cannot be undone.");

        if !prompt.confirm(&question)? {
            return Ok(Deletion::Cancelled);
        }
    }

    api.delete_employee(employee.id)?;
    info!(employee_id = employee.id, name = %employee.name, "employee deleted");

    Ok(Deletion::Deleted(employee))
}

fn area_exists(api: &impl Api, area_id: i64) -> Result<bool, ApiError> {
    Ok(find_area(api, area_id)?.is_some())
}

fn find_employee(api: &impl Api, id: i64) -> Result<Option<Employee>, ApiError> {
    match api.get_employee(id) {
        Ok(employee) => Ok(Some(employee)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
