//! Council configuration from TOML (`[council]` section)

use council_domain::deliberation::request::{COUNCIL_SIZE, TEMPERATURE};
use council_domain::{ConfigIssue, ConfigIssueCode, ProviderModelRef};
use serde::{Deserialize, Serialize};

/// Council membership and stage temperatures
///
/// # Example
///
/// ```toml
/// [council]
/// models = ["arcee-ai/trinity-mini:free", "groq:llama-3.3-70b-versatile"]
/// chairman = "arcee-ai/trinity-large-preview:free"
/// review_temperature = 0.3
/// chairman_temperature = 0.3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Default council, replacing the built-in one
    pub models: Option<Vec<String>>,
    /// Default chairman
    pub chairman: Option<String>,
    pub review_temperature: Option<f32>,
    pub chairman_temperature: Option<f32>,
}

impl FileCouncilConfig {
    /// Parse one model reference, collecting issues for blank or unknown entries.
    fn parse_model(field: &str, value: &str) -> (Option<ProviderModelRef>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        match ProviderModelRef::parse(value) {
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.to_string(),
                    },
                    format!("{}: {}", field, e),
                ));
                (None, issues)
            }
            Ok(model) => {
                if !model.provider().is_known() {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownProvider {
                            field: field.to_string(),
                            provider: model.provider().to_string(),
                        },
                        format!(
                            "{}: unknown provider '{}', calls to '{}' will fail",
                            field,
                            model.provider(),
                            value.trim()
                        ),
                    ));
                }
                (Some(model), issues)
            }
        }
    }

    /// Parse `council.models`; invalid entries are dropped
    pub fn parse_models(&self) -> (Option<Vec<ProviderModelRef>>, Vec<ConfigIssue>) {
        let Some(values) = &self.models else {
            return (None, Vec::new());
        };

        let mut issues = Vec::new();
        let mut models = Vec::new();
        for (i, value) in values.iter().enumerate() {
            let (model, model_issues) =
                Self::parse_model(&format!("council.models[{}]", i), value);
            issues.extend(model_issues);
            models.extend(model);
        }

        if models.len() > *COUNCIL_SIZE.end() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::CouncilSize {
                    count: models.len(),
                },
                format!(
                    "council.models: {} models configured, at most {} allowed",
                    models.len(),
                    COUNCIL_SIZE.end()
                ),
            ));
        }

        // An empty list means "use the built-in council"
        if models.is_empty() {
            return (None, issues);
        }
        (Some(models), issues)
    }

    pub fn parse_chairman(&self) -> (Option<ProviderModelRef>, Vec<ConfigIssue>) {
        match &self.chairman {
            None => (None, Vec::new()),
            Some(value) => Self::parse_model("council.chairman", value),
        }
    }

    fn check_temperature(field: &str, value: Option<f32>) -> (Option<f32>, Vec<ConfigIssue>) {
        match value {
            Some(t) if !TEMPERATURE.contains(&t) => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                    },
                    format!(
                        "{}: {} is outside {}..={}",
                        field,
                        t,
                        TEMPERATURE.start(),
                        TEMPERATURE.end()
                    ),
                )],
            ),
            other => (other, Vec::new()),
        }
    }

    pub fn parse_review_temperature(&self) -> (Option<f32>, Vec<ConfigIssue>) {
        Self::check_temperature("council.review_temperature", self.review_temperature)
    }

    pub fn parse_chairman_temperature(&self) -> (Option<f32>, Vec<ConfigIssue>) {
        Self::check_temperature("council.chairman_temperature", self.chairman_temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Provider, Severity};

    fn council(models: &[&str]) -> FileCouncilConfig {
        FileCouncilConfig {
            models: Some(models.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_models() {
        let (models, issues) =
            council(&["arcee-ai/trinity-mini:free", "groq:llama-3.3-70b-versatile"]).parse_models();
        let models = models.unwrap();
        assert!(issues.is_empty());
        assert_eq!(models[0].provider(), &Provider::OpenRouter);
        assert_eq!(models[1].provider(), &Provider::Groq);
        assert_eq!(models[1].model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_empty_model_name_is_error() {
        let (models, issues) = council(&["a/b", "  "]).parse_models();
        assert_eq!(models.unwrap().len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::EmptyModelName {
                field: "council.models[1]".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_provider_is_warning() {
        let (models, issues) = council(&["foo:bar"]).parse_models();
        assert_eq!(models.unwrap().len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::UnknownProvider { provider, .. } if provider == "foo"
        ));
    }

    #[test]
    fn test_oversized_council_is_error() {
        let names: Vec<String> = (0..9).map(|i| format!("vendor/m{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_, issues) = council(&refs).parse_models();
        assert!(issues
            .iter()
            .any(|i| i.code == ConfigIssueCode::CouncilSize { count: 9 }));
    }

    #[test]
    fn test_empty_list_falls_back() {
        let (models, issues) = council(&[]).parse_models();
        assert!(models.is_none());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_temperature_range() {
        let config = FileCouncilConfig {
            review_temperature: Some(2.5),
            chairman_temperature: Some(0.1),
            ..Default::default()
        };
        let (review, issues) = config.parse_review_temperature();
        assert!(review.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(config.parse_chairman_temperature().0, Some(0.1));
    }
}
