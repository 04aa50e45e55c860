use std::sync::Mutex;

use crate::{
    api::{Api, ApiError},
    models::{
        area::{Area, AreaInput},
        employee::{Employee, EmployeeInput},
    },
};

#[derive(Default)]
struct Tables {
    areas: Vec<Area>,
    employees: Vec<Employee>,
    next_id: i64,
    calls: Vec<String>,
    reads: Vec<&'static str>,
}

/// In-process stand-in for the REST service, resolving relationships the way the server does.
#[derive(Default)]
pub struct InMemoryApi {
    tables: Mutex<Tables>,
    failing: bool,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a 503 status.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_area(self, name: &str) -> Self {
        self.create_area(&AreaInput {
            name: name.to_string(),
        })
        .unwrap();
        self
    }

    pub fn with_employee(self, name: &str, position: &str, area_id: i64, manager_id: Option<i64>) -> Self {
        self.create_employee(&EmployeeInput {
            name: name.to_string(),
            position: position.to_string(),
            area_id,
            manager_id,
        })
        .unwrap();
        self
    }

    /// Names of the mutating calls received so far
    pub fn calls(&self) -> Vec<String> {
        self.tables.lock().unwrap().calls.clone()
    }

    /// Names of the read calls received so far
    pub fn reads(&self) -> Vec<&'static str> {
        self.tables.lock().unwrap().reads.clone()
    }

    fn check(&self, url: &str) -> Result<(), ApiError> {
        if self.failing {
            Err(ApiError::Status {
                status: 503,
                url: url.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn not_found(url: String) -> ApiError {
        ApiError::Status { status: 404, url }
    }

    fn flat(employee: &Employee) -> Employee {
        Employee {
            area: None,
            manager: None,
            subordinates: vec![],
            ..employee.clone()
        }
    }

    fn resolve(tables: &Tables, employee: &Employee) -> Employee {
        Employee {
            area: employee
                .area_id
                .and_then(|id| tables.areas.iter().find(|a| a.id == id).cloned()),
            manager: employee.manager_id.and_then(|id| {
                tables
                    .employees
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| Box::new(Self::flat(e)))
            }),
            subordinates: tables
                .employees
                .iter()
                .filter(|e| e.manager_id == Some(employee.id))
                .map(Self::flat)
                .collect(),
            ..Self::flat(employee)
        }
    }
}

impl Api for InMemoryApi {
    fn list_areas(&self) -> Result<Vec<Area>, ApiError> {
        self.check("/areas")?;
        let mut tables = self.tables.lock().unwrap();
        tables.reads.push("list_areas");
        Ok(tables.areas.clone())
    }

    fn get_area(&self, id: i64) -> Result<Area, ApiError> {
        self.check("/areas/info")?;
        let mut tables = self.tables.lock().unwrap();
        tables.reads.push("get_area");
        tables
            .areas
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/areas/info/{}", id)))
    }

    fn create_area(&self, input: &AreaInput) -> Result<Area, ApiError> {
        self.check("/areas/crear")?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let area = Area {
            id: tables.next_id,
            name: input.name.clone(),
        };
        tables.areas.push(area.clone());
        tables.calls.push(String::from("create_area"));
        Ok(area)
    }

    fn update_area(&self, id: i64, input: &AreaInput) -> Result<(), ApiError> {
        self.check("/areas/update")?;
        let mut tables = self.tables.lock().unwrap();
        tables.calls.push(String::from("update_area"));
        let area = tables
            .areas
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Self::not_found(format!("/areas/update/{}", id)))?;
        area.name = input.name.clone();
        Ok(())
    }

    fn delete_area(&self, id: i64) -> Result<(), ApiError> {
        self.check("/areas/delete")?;
        let mut tables = self.tables.lock().unwrap();
        tables.calls.push(String::from("delete_area"));
        tables.areas.retain(|a| a.id != id);
        Ok(())
    }

    fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.check("/employees")?;
        let mut tables = self.tables.lock().unwrap();
        tables.reads.push("list_employees");
        Ok(tables
            .employees
            .iter()
            .map(|e| Self::resolve(&tables, e))
            .collect())
    }

    fn get_employee(&self, id: i64) -> Result<Employee, ApiError> {
        self.check("/employees/info")?;
        let mut tables = self.tables.lock().unwrap();
        tables.reads.push("get_employee");
        tables
            .employees
            .iter()
            .find(|e| e.id == id)
            .map(|e| Self::resolve(&tables, e))
            .ok_or_else(|| Self::not_found(format!("/employees/info/{}", id)))
    }

    fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, ApiError> {
        self.check("/employees/create")?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let employee = Employee {
            id: tables.next_id,
            name: input.name.clone(),
            position: input.position.clone(),
            area_id: Some(input.area_id),
            manager_id: input.manager_id,
            ..Employee::default()
        };
        tables.employees.push(employee.clone());
        tables.calls.push(String::from("create_employee"));
        Ok(employee)
    }

    fn update_employee(&self, id: i64, input: &EmployeeInput) -> Result<(), ApiError> {
        self.check("/employees/update")?;
        let mut tables = self.tables.lock().unwrap();
        tables.calls.push(String::from("update_employee"));
        let employee = tables
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found(format!("/employees/update/{}", id)))?;
        employee.name = input.name.clone();
        employee.position = input.position.clone();
        employee.area_id = Some(input.area_id);
        employee.manager_id = input.manager_id;
        Ok(())
    }

    fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        self.check("/employees/delete")?;
        let mut tables = self.tables.lock().unwrap();
        tables.calls.push(String::from("delete_employee"));
        tables.employees.retain(|e| e.id != id);
        Ok(())
    }
}
