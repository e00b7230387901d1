//! Workspace Resolution
//!
//! Lookup of the workspace payment endpoints are scoped to.

use crate::client::HttpGateway;
use crate::error::{SantanderError, SantanderResult};
use crate::types::{Workspace, WorkspaceList, WorkspaceType};

/// Workspace listing endpoint.
pub const WORKSPACES_ENDPOINT: &str = "/management_payments_partners/v1/workspaces";

/// List every workspace of the account.
pub async fn list_workspaces(gateway: &dyn HttpGateway) -> SantanderResult<Vec<Workspace>> {
    let response = gateway.get(WORKSPACES_ENDPOINT).await?;
    let list: WorkspaceList = serde_json::from_value(response).map_err(|e| {
        SantanderError::client(format!("unexpected workspace listing: {}", e))
    })?;
    Ok(list.content)
}

/// Id of the first active workspace of the given type, if any.
pub async fn first_workspace_id_of_type(
    gateway: &dyn HttpGateway,
    workspace_type: WorkspaceType,
) -> SantanderResult<Option<String>> {
    let workspaces = list_workspaces(gateway).await?;
    let found = workspaces
        .into_iter()
        .find(|w| w.is_active_of_type(&workspace_type))
        .map(|w| w.id);

    if found.is_none() {
        tracing::warn!(workspace_type = workspace_type.as_str(), "no active workspace");
    }
    Ok(found)
}
