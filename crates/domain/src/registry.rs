use scanboard_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Registry type tag accepted for GitLab registries.
pub const GITLAB_REGISTRY_TYPE: &str = "gitlab";

const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 64;
const FIELD_MIN_LENGTH: usize = 2;

/// Non-secret GitLab registry settings, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitlabNonSecret {
    /// Registry host, e.g. `registry.gitlab.com`.
    pub gitlab_registry_url: String,
    /// GitLab server base URL.
    pub gitlab_server_url: String,
}

/// Secret GitLab registry settings. Stored encrypted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitlabSecret {
    /// Personal or project access token.
    pub gitlab_access_token: String,
}

impl std::fmt::Debug for GitlabSecret {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GitlabSecret")
            .field("gitlab_access_token", &"<redacted>")
            .finish()
    }
}

/// Validated GitLab container registry credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitlabRegistry {
    name: String,
    non_secret: GitlabNonSecret,
    secret: GitlabSecret,
}

impl GitlabRegistry {
    /// Validates registry credentials.
    pub fn new(
        name: impl Into<String>,
        registry_type: &str,
        non_secret: GitlabNonSecret,
        secret: GitlabSecret,
    ) -> AppResult<Self> {
        let name = name.into().trim().to_owned();
        let name_length = name.chars().count();
        if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&name_length) {
            return Err(field_error(
                "name",
                format!("must be between {NAME_MIN_LENGTH} and {NAME_MAX_LENGTH} characters"),
            ));
        }

        if registry_type.trim().is_empty() {
            return Err(field_error("registry_type", "is required".to_owned()));
        }
        if registry_type != GITLAB_REGISTRY_TYPE {
            return Err(field_error(
                "registry_type",
                format!("must be '{GITLAB_REGISTRY_TYPE}'"),
            ));
        }

        require_min_length(
            "non_secret.gitlab_registry_url",
            non_secret.gitlab_registry_url.as_str(),
        )?;
        let server_url = Url::parse(non_secret.gitlab_server_url.trim())
            .map_err(|_| field_error("non_secret.gitlab_server_url", "must be url".to_owned()))?;
        if server_url.host_str().is_none() {
            return Err(field_error(
                "non_secret.gitlab_server_url",
                "must be url".to_owned(),
            ));
        }
        require_min_length(
            "secret.gitlab_access_token",
            secret.gitlab_access_token.as_str(),
        )?;

        Ok(Self {
            name,
            non_secret,
            secret,
        })
    }

    /// Returns registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns registry type tag.
    #[must_use]
    pub fn registry_type(&self) -> &'static str {
        GITLAB_REGISTRY_TYPE
    }

    /// Returns non-secret settings.
    #[must_use]
    pub fn non_secret(&self) -> &GitlabNonSecret {
        &self.non_secret
    }

    /// Returns secret settings.
    #[must_use]
    pub fn secret(&self) -> &GitlabSecret {
        &self.secret
    }
}

fn require_min_length(field: &str, value: &str) -> AppResult<()> {
    if value.trim().chars().count() < FIELD_MIN_LENGTH {
        return Err(field_error(
            field,
            format!("must be at least {FIELD_MIN_LENGTH} characters"),
        ));
    }

    Ok(())
}

fn field_error(field: &str, message: String) -> AppError {
    AppError::Validation(format!("{field} {message}"))
}

#[cfg(test)]
mod tests {
    use super::{GitlabNonSecret, GitlabRegistry, GitlabSecret};

    fn non_secret(server_url: &str) -> GitlabNonSecret {
        GitlabNonSecret {
            gitlab_registry_url: "registry.gitlab.com".to_owned(),
            gitlab_server_url: server_url.to_owned(),
        }
    }

    fn secret(token: &str) -> GitlabSecret {
        GitlabSecret {
            gitlab_access_token: token.to_owned(),
        }
    }

    #[test]
    fn accepts_valid_credentials() {
        let registry = GitlabRegistry::new(
            "team-registry",
            "gitlab",
            non_secret("https://gitlab.com"),
            secret("glpat-123"),
        );
        assert!(registry.is_ok());
    }

    #[test]
    fn rejects_short_or_long_names() {
        let long_name = "x".repeat(65);
        for name in ["a", " ", long_name.as_str()] {
            let registry = GitlabRegistry::new(
                name,
                "gitlab",
                non_secret("https://gitlab.com"),
                secret("glpat-123"),
            );
            assert!(registry.is_err());
        }
    }

    #[test]
    fn rejects_non_url_server() {
        let registry = GitlabRegistry::new(
            "team-registry",
            "gitlab",
            non_secret("gitlab.com"),
            secret("glpat-123"),
        );
        assert!(
            matches!(registry, Err(error) if error.to_string().contains("gitlab_server_url"))
        );
    }

    #[test]
    fn rejects_missing_token_and_wrong_type() {
        assert!(
            GitlabRegistry::new(
                "team-registry",
                "gitlab",
                non_secret("https://gitlab.com"),
                secret("x"),
            )
            .is_err()
        );
        assert!(
            GitlabRegistry::new(
                "team-registry",
                "docker_hub",
                non_secret("https://gitlab.com"),
                secret("glpat-123"),
            )
            .is_err()
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", secret("glpat-123"));
        assert!(!rendered.contains("glpat-123"));
    }
}
