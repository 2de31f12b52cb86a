use actix_web::web;

use crate::api::{error, success};
use crate::modules::application::{
    model::{
        ActionQuery, Application, ApplicationAction, ApplicationRequest, ArchiveModel,
        ArchiveResponse, DeleteQuery, ListQuery,
    },
    service::{ApplicationOutcome, ApplicationService},
};
use crate::utils::{decode_json, ValidatedQuery};

impl ApplicationRequest {
    /// Picks the variant from the `action` query parameter and validates the body
    /// against it.
    pub fn from_post(
        action: Option<ApplicationAction>,
        body: serde_json::Value,
    ) -> Result<Self, error::Error> {
        if !body.is_object() {
            return Err(error::Error::bad_request("Invalid input"));
        }

        let request = match action {
            None => ApplicationRequest::CreateApplication(decode_json(body)?),
            Some(ApplicationAction::UpdateStatus) => {
                ApplicationRequest::UpdateStatus(decode_json(body)?)
            }
            Some(ApplicationAction::Archive) => {
                ApplicationRequest::Archive(decode_json::<ArchiveModel>(body)?)
            }
        };
        Ok(request)
    }
}

pub async fn list_applications(
    service: web::Data<ApplicationService>,
    query: ValidatedQuery<ListQuery>,
) -> Result<success::Success<Vec<Application>>, error::Error> {
    let applications = service.list(query.0.archived).await?;
    Ok(success::Success::ok(Some(applications)))
}

pub async fn post_application(
    service: web::Data<ApplicationService>,
    query: ValidatedQuery<ActionQuery>,
    body: web::Json<serde_json::Value>,
) -> Result<success::Success<ArchiveResponse>, error::Error> {
    let request = ApplicationRequest::from_post(query.0.action, body.into_inner())?;

    let response = match service.execute(request).await? {
        ApplicationOutcome::Created => {
            success::Success::created(None).message("Application saved successfully")
        }
        ApplicationOutcome::StatusUpdated => {
            success::Success::ok(None).message("Status updated successfully")
        }
        ApplicationOutcome::Archived(archived) => {
            success::Success::ok(Some(archived)).message("Application archived successfully")
        }
        ApplicationOutcome::Deleted => {
            success::Success::ok(None).message("Application deleted successfully")
        }
    };
    Ok(response)
}

pub async fn delete_application(
    service: web::Data<ApplicationService>,
    query: ValidatedQuery<DeleteQuery>,
) -> Result<success::Success<()>, error::Error> {
    let id = query
        .0
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| error::Error::bad_request("Missing application ID"))?;

    service.execute(ApplicationRequest::Delete { id }).await?;
    Ok(success::Success::ok(None).message("Application deleted successfully"))
}

pub async fn method_not_allowed() -> Result<success::Success<()>, error::Error> {
    Err(error::Error::MethodNotAllowed)
}
