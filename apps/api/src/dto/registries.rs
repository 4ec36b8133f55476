use scanboard_application::{AddGitlabRegistryInput, RegistrySummary};
use scanboard_domain::{GitlabNonSecret, GitlabSecret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Non-secret part of a GitLab registry request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gitlab-non-secret-request.ts"
)]
pub struct GitlabNonSecretRequest {
    pub gitlab_registry_url: String,
    pub gitlab_server_url: String,
}

/// Secret part of a GitLab registry request.
#[derive(Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gitlab-secret-request.ts"
)]
pub struct GitlabSecretRequest {
    pub gitlab_access_token: String,
}

/// Incoming payload for GitLab registry creation.
#[derive(Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/add-gitlab-registry-request.ts"
)]
pub struct AddGitlabRegistryRequest {
    pub name: String,
    pub registry_type: String,
    pub non_secret: GitlabNonSecretRequest,
    pub secret: GitlabSecretRequest,
}

impl From<AddGitlabRegistryRequest> for AddGitlabRegistryInput {
    fn from(request: AddGitlabRegistryRequest) -> Self {
        Self {
            name: request.name,
            registry_type: request.registry_type,
            non_secret: GitlabNonSecret {
                gitlab_registry_url: request.non_secret.gitlab_registry_url,
                gitlab_server_url: request.non_secret.gitlab_server_url,
            },
            secret: GitlabSecret {
                gitlab_access_token: request.secret.gitlab_access_token,
            },
        }
    }
}

/// API representation of a registry, without its secret.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/registry-response.ts"
)]
pub struct RegistryResponse {
    pub registry_id: String,
    pub name: String,
    pub registry_type: String,
    #[ts(type = "Record<string, unknown>")]
    pub non_secret: Value,
    pub created_at: String,
}

impl From<RegistrySummary> for RegistryResponse {
    fn from(summary: RegistrySummary) -> Self {
        Self {
            registry_id: summary.registry_id,
            name: summary.name,
            registry_type: summary.registry_type,
            non_secret: summary.non_secret,
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}
