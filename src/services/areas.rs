use thiserror::Error;
use tracing::info;

use crate::{
    api::{Api, ApiError},
    models::area::{Area, AreaInput},
    prompt::{Confirm, PromptError},
    services::Deletion,
};

#[derive(Debug, Error)]
pub enum CreateAreaError {
    #[error("Area name cannot be empty")]
    EmptyName,

    #[error("Area with name '{}' already exists", .0)]
    AreaAlreadyExists(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub struct CreateAreaParameters {
    pub name: String,
}

pub fn create_area(
    api: &impl Api,
    parameters: CreateAreaParameters,
) -> Result<Area, CreateAreaError> {
    let name = parameters.name.trim();
    if name.is_empty() {
        return Err(CreateAreaError::EmptyName);
    }

    let already_exists = api
        .list_areas()?
        .iter()
        .any(|a| a.name.to_lowercase() == name.to_lowercase());
    if already_exists {
        return Err(CreateAreaError::AreaAlreadyExists(name.to_string()));
    }

    let area = api.create_area(&AreaInput {
        name: name.to_string(),
    })?;
    info!(area_id = area.id, name = %area.name, "area created");

    Ok(area)
}

#[derive(Debug, Error)]
pub enum RenameAreaError {
    #[error("Area name cannot be empty")]
    EmptyName,

    #[error("Area #{0} not found")]
    AreaNotFound(i64),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub struct RenameAreaParameters {
    pub id: i64,
    pub name: String,
}

pub fn rename_area(
    api: &impl Api,
    parameters: RenameAreaParameters,
) -> Result<Area, RenameAreaError> {
    let name = parameters.name.trim();
    if name.is_empty() {
        return Err(RenameAreaError::EmptyName);
    }

    let area = find_area(api, parameters.id)?.ok_or(RenameAreaError::AreaNotFound(parameters.id))?;

    let input = AreaInput {
        name: name.to_string(),
    };
    api.update_area(area.id, &input)?;
    info!(area_id = area.id, from = %area.name, to = %name, "area renamed");

    // The update reply is not read, report what was sent
    Ok(Area {
        id: area.id,
        name: input.name,
    })
}

#[derive(Debug, Error)]
pub enum DeleteAreaError {
    #[error("Area #{0} not found")]
    AreaNotFound(i64),

    #[error("{0}")]
    Prompt(#[from] PromptError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub struct DeleteAreaParameters {
    pub id: i64,
    pub skip_confirmation: bool,
}

pub fn delete_area(
    api: &impl Api,
    prompt: &mut impl Confirm,
    parameters: DeleteAreaParameters,
) -> Result<Deletion<Area>, DeleteAreaError> {
    let area = find_area(api, parameters.id)?.ok_or(DeleteAreaError::AreaNotFound(parameters.id))?;

    if !parameters.skip_confirmation
        && !prompt.confirm(&format!(
            "Delete area '{}'? This cannot be undone.",
            area.name
        ))?
    {
        return Ok(Deletion::Cancelled);
    }

    api.delete_area(area.id)?;
    info!(area_id = area.id, name = %area.name, "area deleted");

    Ok(Deletion::Deleted(area))
}

/// `None` when the API answers 404 for the id.
pub(crate) fn find_area(api: &impl Api, id: i64) -> Result<Option<Area>, ApiError> {
    match api.get_area(id) {
        Ok(area) => Ok(Some(area)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::memory::InMemoryApi, services::testing::ScriptedConfirm};

    #[test]
    fn test_create_area_trims_name() {
        let api = InMemoryApi::new();

        let area = create_area(
            &api,
            CreateAreaParameters {
                name: String::from("  Finance "),
            },
        )
        .unwrap();

        assert_eq!(area.name, "Finance");
        assert_eq!(api.list_areas().unwrap(), vec![area]);
    }

    #[test]
    fn test_create_area_rejects_blank_name() {
        let api = InMemoryApi::new();

        let result = create_area(
            &api,
            CreateAreaParameters {
                name: String::from("   "),
            },
        );

        assert!(matches!(result, Err(CreateAreaError::EmptyName)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_create_area_rejects_duplicate_name() {
        let api = InMemoryApi::new().with_area("Finance");

        let result = create_area(
            &api,
            CreateAreaParameters {
                name: String::from("finance"),
            },
        );

        match result {
            Err(CreateAreaError::AreaAlreadyExists(name)) => assert_eq!(name, "finance"),
            _ => panic!("Expected AreaAlreadyExists error"),
        }
    }

    #[test]
    fn test_rename_area() {
        let api = InMemoryApi::new().with_area("Finanzas");

        let area = rename_area(
            &api,
            RenameAreaParameters {
                id: 1,
                name: String::from("Finance"),
            },
        )
        .unwrap();

        assert_eq!(area.name, "Finance");
        assert_eq!(api.get_area(1).unwrap().name, "Finance");
    }

    #[test]
    fn test_rename_unknown_area() {
        let api = InMemoryApi::new();

        let result = rename_area(
            &api,
            RenameAreaParameters {
                id: 42,
                name: String::from("Finance"),
            },
        );

        assert!(matches!(result, Err(RenameAreaError::AreaNotFound(42))));
    }

    #[test]
    fn test_delete_area_asks_before_deleting() {
        let api = InMemoryApi::new().with_area("Sales");
        let mut prompt = ScriptedConfirm::answering(true);

        let outcome = delete_area(
            &api,
            &mut prompt,
            DeleteAreaParameters {
                id: 1,
                skip_confirmation: false,
            },
        )
        .unwrap();

        assert_eq!(prompt.questions.len(), 1);
        assert!(prompt.questions[0].contains("Sales"));
        assert!(matches!(outcome, Deletion::Deleted(Area { id: 1, .. })));
        assert!(api.list_areas().unwrap().is_empty());
    }

    #[test]
    fn test_declined_delete_keeps_area() {
        let api = InMemoryApi::new().with_area("Sales");
        let mut prompt = ScriptedConfirm::answering(false);

        let outcome = delete_area(
            &api,
            &mut prompt,
            DeleteAreaParameters {
                id: 1,
                skip_confirmation: false,
            },
        )
        .unwrap();

        assert_eq!(outcome, Deletion::Cancelled);
        assert_eq!(api.list_areas().unwrap().len(), 1);
        assert!(!api.calls().contains(&String::from("delete_area")));
    }

    #[test]
    fn test_skip_confirmation_does_not_prompt() {
        let api = InMemoryApi::new().with_area("Sales");
        let mut prompt = ScriptedConfirm::answering(false);

        let outcome = delete_area(
            &api,
            &mut prompt,
            DeleteAreaParameters {
                id: 1,
                skip_confirmation: true,
            },
        )
        .unwrap();

        assert!(prompt.questions.is_empty());
        assert!(matches!(outcome, Deletion::Deleted(_)));
    }

    #[test]
    fn test_lookup_uses_single_area_endpoint() {
        let api = InMemoryApi::new().with_area("Sales");

        rename_area(
            &api,
            RenameAreaParameters {
                id: 1,
                name: String::from("Revenue"),
            },
        )
        .unwrap();

        assert_eq!(api.reads(), vec!["get_area"]);
    }

    #[test]
    fn test_lookup_failure_is_not_reported_as_missing() {
        let api = InMemoryApi::failing();

        let result = delete_area(
            &api,
            &mut ScriptedConfirm::answering(true),
            DeleteAreaParameters {
                id: 1,
                skip_confirmation: true,
            },
        );

        assert!(matches!(
            result,
            Err(DeleteAreaError::Api(ApiError::Status { status: 503, .. }))
        ));
    }

    #[test]
    fn test_api_failure_propagates() {
        let api = InMemoryApi::failing();

        let result = create_area(
            &api,
            CreateAreaParameters {
                name: String::from("Finance"),
            },
        );

        assert!(matches!(
            result,
            Err(CreateAreaError::Api(ApiError::Status { status: 503, .. }))
        ));
    }
}
