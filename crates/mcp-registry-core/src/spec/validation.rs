//! Package specification validation
//!
//! Checks run in a fixed order and stop at the first violation:
//! required fields, at least one method, nodeModule/docker pairing,
//! the API credential rule, then per-method identifier fields.

use serde_json::Value;
use thiserror::Error;

use super::types::{
    DockerInstallation, InstallationMethods, InstallationMethodsDraft, MethodDraft, MethodKind,
    NodeModuleInstallation, PackageSpec, PackageSpecDraft, PythonModuleInstallation,
};

/// A package specification rule violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Package specification is missing required field: {0}")]
    MissingField(&'static str),

    #[error(
        "Package specification uses the list-based installationOptions schema; \
         convert installationOptions to installationMethods"
    )]
    ListSchemaVariant,

    #[error("Package specification must define at least one installation method")]
    NoInstallationMethod,

    #[error(
        "Package specification with nodeModule installation method must also provide a docker installation method"
    )]
    NodeModuleWithoutDocker,

    #[error("API-based server must include environment variables in {method} installation method")]
    MissingEnvVars { method: MethodKind },

    #[error("{method} installation method is missing required field: {field}")]
    MissingMethodField {
        method: MethodKind,
        field: &'static str,
    },

    #[error("Package specification field {field} must be {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{method} installation method field {field} must be a string")]
    WrongMethodFieldType {
        method: MethodKind,
        field: &'static str,
    },

    #[error("Package specification has an invalid structure: {0}")]
    InvalidShape(String),
}

/// Servers whose name or description mentions an external service must
/// document the credentials they need.
///
/// A name or description containing one of the terms (case-insensitive)
/// requires non-empty `envVars` on every defined nodeModule and docker method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentialRule {
    terms: Vec<String>,
}

impl ApiCredentialRule {
    pub const DEFAULT_TERMS: [&'static str; 7] =
        ["api", "search", "map", "weather", "chat", "auth", "token"];

    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether the server looks like it fronts an external API
    pub fn applies_to(&self, name: &str, description: Option<&str>) -> bool {
        let name = name.to_lowercase();
        let description = description.map(str::to_lowercase);
        self.terms.iter().any(|term| {
            name.contains(term.as_str())
                || description
                    .as_deref()
                    .is_some_and(|d| d.contains(term.as_str()))
        })
    }

    /// Check the rule against the defined methods
    pub fn check(
        &self,
        name: &str,
        description: Option<&str>,
        methods: &InstallationMethodsDraft,
    ) -> Result<(), SpecError> {
        if !self.applies_to(name, description) {
            return Ok(());
        }
        for kind in [MethodKind::NodeModule, MethodKind::Docker] {
            if let Some(method) = methods.get(kind)
                && !method.has_env_vars()
            {
                return Err(SpecError::MissingEnvVars { method: kind });
            }
        }
        Ok(())
    }
}

impl Default for ApiCredentialRule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TERMS)
    }
}

/// Validates drafts into [`PackageSpec`] values
#[derive(Debug, Clone)]
pub struct SpecValidator {
    api_rule: Option<ApiCredentialRule>,
    require_docker_for_node: bool,
}

impl SpecValidator {
    /// Validator with every rule enabled
    pub fn strict() -> Self {
        Self {
            api_rule: Some(ApiCredentialRule::default()),
            require_docker_for_node: true,
        }
    }

    /// Validator with only field-presence checks
    pub fn lenient() -> Self {
        Self {
            api_rule: None,
            require_docker_for_node: false,
        }
    }

    pub fn with_api_rule(mut self, rule: Option<ApiCredentialRule>) -> Self {
        self.api_rule = rule;
        self
    }

    pub fn with_docker_pairing(mut self, required: bool) -> Self {
        self.require_docker_for_node = required;
        self
    }

    pub fn api_rule(&self) -> Option<&ApiCredentialRule> {
        self.api_rule.as_ref()
    }

    /// Validate a parsed JSON value
    pub fn validate_value(&self, value: Value) -> Result<PackageSpec, SpecError> {
        let draft = PackageSpecDraft::from_value(value)
            .map_err(|e| SpecError::InvalidShape(e.to_string()))?;
        self.validate(draft)
    }

    /// Validate a draft, returning the first rule it violates
    pub fn validate(&self, draft: PackageSpecDraft) -> Result<PackageSpec, SpecError> {
        let id = required(draft.id.as_ref(), "id")?;
        let url = required(draft.url.as_ref(), "url")?;
        let name = required(draft.name.as_ref(), "name")?;
        let methods = match &draft.installation_methods {
            Some(Value::Object(map)) => InstallationMethodsDraft::from_object(map),
            Some(_) => {
                return Err(SpecError::WrongFieldType {
                    field: "installationMethods",
                    expected: "an object",
                });
            }
            None if draft.installation_options.is_some() => {
                return Err(SpecError::ListSchemaVariant);
            }
            None => return Err(SpecError::MissingField("installationMethods")),
        };

        if methods.node_module.is_none()
            && methods.python_module.is_none()
            && methods.docker.is_none()
        {
            return Err(SpecError::NoInstallationMethod);
        }

        if self.require_docker_for_node
            && methods.node_module.is_some()
            && methods.docker.is_none()
        {
            return Err(SpecError::NodeModuleWithoutDocker);
        }

        if let Some(rule) = &self.api_rule {
            rule.check(&name, draft.description(), &methods)?;
        }

        let installation_methods = InstallationMethods {
            node_module: match &methods.node_module {
                Some(m) => Some(NodeModuleInstallation {
                    npm_package: identifier(m, MethodKind::NodeModule)?,
                    env_vars: m.env_vars(),
                }),
                None => None,
            },
            python_module: match &methods.python_module {
                Some(m) => Some(PythonModuleInstallation {
                    pip_package: identifier(m, MethodKind::PythonModule)?,
                    env_vars: m.env_vars(),
                }),
                None => None,
            },
            docker: match &methods.docker {
                Some(m) => Some(DockerInstallation {
                    image: identifier(m, MethodKind::Docker)?,
                    env_vars: m.env_vars(),
                }),
                None => None,
            },
        };

        Ok(PackageSpec {
            id,
            url,
            name,
            aliases: draft.aliases(),
            description: draft.description().map(str::to_string),
            installation_methods,
        })
    }
}

impl Default for SpecValidator {
    fn default() -> Self {
        Self::strict()
    }
}

fn required(value: Option<&Value>, field: &'static str) -> Result<String, SpecError> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        None | Some(Value::String(_)) => Err(SpecError::MissingField(field)),
        Some(_) => Err(SpecError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

fn identifier(method: &MethodDraft, kind: MethodKind) -> Result<String, SpecError> {
    let field = kind.required_field();
    match method.identifier_value(kind) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        None | Some(Value::String(_)) => Err(SpecError::MissingMethodField { method: kind, field }),
        Some(_) => Err(SpecError::WrongMethodFieldType { method: kind, field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_value() -> Value {
        json!({
            "id": "acme/files",
            "url": "https://github.com/acme/files",
            "name": "files",
            "installationMethods": {
                "nodeModule": {"npmPackage": "@acme/files"},
                "docker": {"image": "modelcontextprotocol/files"}
            }
        })
    }

    fn strict_error(value: Value) -> SpecError {
        SpecValidator::strict().validate_value(value).unwrap_err()
    }

    #[test]
    fn test_valid_spec_passes() {
        let spec = SpecValidator::strict().validate_value(valid_value()).unwrap();
        assert_eq!(spec.id, "acme/files");
        assert_eq!(
            spec.installation_methods.node_module.unwrap().npm_package,
            "@acme/files"
        );
    }

    #[test]
    fn test_missing_fields_are_reported_in_order() {
        let value = json!({"installationMethods": {}});
        assert_eq!(strict_error(value), SpecError::MissingField("id"));

        let value = json!({"id": "a/b", "name": "n"});
        assert_eq!(strict_error(value), SpecError::MissingField("url"));

        let value = json!({"id": "a/b", "url": "u"});
        assert_eq!(strict_error(value), SpecError::MissingField("name"));

        let value = json!({"id": "a/b", "url": "u", "name": "n"});
        assert_eq!(
            strict_error(value),
            SpecError::MissingField("installationMethods")
        );
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let mut value = valid_value();
        value["url"] = json!("");
        assert_eq!(strict_error(value), SpecError::MissingField("url"));
    }

    #[test]
    fn test_no_installation_method() {
        let mut value = valid_value();
        value["installationMethods"] = json!({});
        assert_eq!(strict_error(value), SpecError::NoInstallationMethod);
    }

    #[test]
    fn test_unknown_methods_do_not_count() {
        let mut value = valid_value();
        value["installationMethods"] = json!({"binary": {"path": "/usr/bin/x"}});
        assert_eq!(strict_error(value), SpecError::NoInstallationMethod);
    }

    #[test]
    fn test_node_module_requires_docker() {
        let mut value = valid_value();
        value["installationMethods"] = json!({"nodeModule": {}});
        assert_eq!(strict_error(value), SpecError::NodeModuleWithoutDocker);
    }

    #[test]
    fn test_lenient_validator_allows_node_without_docker() {
        let mut value = valid_value();
        value["installationMethods"] = json!({"nodeModule": {"npmPackage": "x"}});
        assert!(SpecValidator::lenient().validate_value(value).is_ok());
    }

    #[test]
    fn test_weather_server_requires_docker_env_vars() {
        let value = json!({
            "id": "acme/weather",
            "url": "https://github.com/acme/weather",
            "name": "Weather Server",
            "installationMethods": {
                "docker": {"image": "acme/weather", "envVars": {}}
            }
        });
        assert_eq!(
            strict_error(value),
            SpecError::MissingEnvVars {
                method: MethodKind::Docker
            }
        );
    }

    #[test]
    fn test_api_rule_checks_node_module_first() {
        let mut value = valid_value();
        value["description"] = json!("Talks to the Search API");
        assert_eq!(
            strict_error(value),
            SpecError::MissingEnvVars {
                method: MethodKind::NodeModule
            }
        );
    }

    #[test]
    fn test_api_rule_ignores_python_module() {
        let value = json!({
            "id": "acme/chat",
            "url": "https://github.com/acme/chat",
            "name": "chat",
            "installationMethods": {"pythonModule": {"pipPackage": "acme-chat"}}
        });
        assert!(SpecValidator::strict().validate_value(value).is_ok());
    }

    #[test]
    fn test_api_rule_can_be_disabled() {
        let value = json!({
            "id": "acme/maps",
            "url": "https://github.com/acme/maps",
            "name": "maps",
            "installationMethods": {"docker": {"image": "acme/maps"}}
        });
        let validator = SpecValidator::strict().with_api_rule(None);
        assert!(validator.validate_value(value).is_ok());
    }

    #[test]
    fn test_api_rule_custom_terms() {
        let rule = ApiCredentialRule::new(["Stripe"]);
        assert!(rule.applies_to("stripe-payments", None));
        assert!(!rule.applies_to("weather", Some("forecasts")));
        assert!(ApiCredentialRule::default().applies_to("x", Some("OAuth helper")));
    }

    #[test]
    fn test_method_identifier_fields() {
        let mut value = valid_value();
        value["installationMethods"]["docker"] = json!({"image": ""});
        assert_eq!(
            strict_error(value),
            SpecError::MissingMethodField {
                method: MethodKind::Docker,
                field: "image"
            }
        );

        let mut value = valid_value();
        value["installationMethods"] = json!({"pythonModule": {}});
        let err = strict_error(value);
        assert_eq!(
            err.to_string(),
            "pythonModule installation method is missing required field: pipPackage"
        );
    }

    #[test]
    fn test_list_schema_variant_is_rejected() {
        let value = json!({
            "id": "a/b",
            "url": "u",
            "name": "n",
            "installationOptions": [{"dependencies": ["node"], "runCommands": ["npx b"]}]
        });
        assert_eq!(strict_error(value), SpecError::ListSchemaVariant);
    }

    #[test]
    fn test_wrong_types_are_reported_by_the_owning_rule() {
        let value = json!({
            "url": "u",
            "name": "n",
            "description": 42,
            "installationMethods": {"docker": {"image": "i"}}
        });
        assert_eq!(strict_error(value), SpecError::MissingField("id"));

        let value = json!({"id": ["a"], "url": "u", "name": "n"});
        assert_eq!(
            strict_error(value),
            SpecError::WrongFieldType {
                field: "id",
                expected: "a string"
            }
        );

        let mut value = valid_value();
        value["installationMethods"] = json!([{"docker": {"image": "i"}}]);
        assert_eq!(
            strict_error(value),
            SpecError::WrongFieldType {
                field: "installationMethods",
                expected: "an object"
            }
        );

        let mut value = valid_value();
        value["installationMethods"]["docker"]["image"] = json!(7);
        assert_eq!(
            strict_error(value),
            SpecError::WrongMethodFieldType {
                method: MethodKind::Docker,
                field: "image"
            }
        );
    }

    #[test]
    fn test_non_object_spec_is_invalid_shape() {
        assert!(matches!(
            strict_error(json!("acme/files")),
            SpecError::InvalidShape(_)
        ));
    }

    #[test]
    fn test_numeric_env_var_values_are_accepted() {
        let mut value = valid_value();
        value["installationMethods"]["docker"]["envVars"] = json!({"PORT": 3000});
        let spec = SpecValidator::strict().validate_value(value).unwrap();
        let docker = spec.installation_methods.docker.unwrap();
        assert_eq!(docker.env_vars.unwrap()["PORT"], "3000");
    }

    #[test]
    fn test_non_string_description_is_dropped() {
        let mut value = valid_value();
        value["description"] = json!({"text": "Weather API"});
        let spec = SpecValidator::strict().validate_value(value).unwrap();
        assert!(spec.description.is_none());
    }
}
