//! Credentials management infrastructure
//!
//! SonarQube token lookup from the environment.

/// Primary token variable.
pub const SONAR_TOKEN_ENV: &str = "SONAR_TOKEN";
/// Fallback token variable.
pub const SONARQUBE_TOKEN_ENV: &str = "SONARQUBE_TOKEN";

/// Read the SonarQube token, preferring `SONAR_TOKEN` over `SONARQUBE_TOKEN`.
///
/// Returns `None` when neither is set to a non-empty value.
pub fn sonar_token_from_env() -> Option<String> {
    [SONAR_TOKEN_ENV, SONARQUBE_TOKEN_ENV]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sonar_token_preferred() {
        temp_env::with_vars(
            [
                (SONAR_TOKEN_ENV, Some("primary")),
                (SONARQUBE_TOKEN_ENV, Some("secondary")),
            ],
            || assert_eq!(sonar_token_from_env().as_deref(), Some("primary")),
        );
    }

    #[test]
    fn test_sonarqube_token_fallback() {
        temp_env::with_vars(
            [
                (SONAR_TOKEN_ENV, Some("")),
                (SONARQUBE_TOKEN_ENV, Some("secondary")),
            ],
            || assert_eq!(sonar_token_from_env().as_deref(), Some("secondary")),
        );
    }

    #[test]
    fn test_no_token() {
        temp_env::with_vars_unset([SONAR_TOKEN_ENV, SONARQUBE_TOKEN_ENV], || {
            assert!(sonar_token_from_env().is_none());
        });
    }
}
