//! Package specification schema
//!
//! `PackageSpec` is the validated, persisted form. `PackageSpecDraft` is the
//! lenient parse of untrusted JSON (LLM replies, hand-authored files) where
//! every field may be absent; validation turns a draft into a spec.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environment variable name -> description of its purpose
pub type EnvironmentVariables = BTreeMap<String, String>;

/// A complete, validated MCP server package specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    /// Unique identifier, e.g. "owner/repo#subdir" or "gitlab.com/owner/repo"
    pub id: String,
    /// Source location
    pub url: String,
    /// Display name
    pub name: String,
    /// Short alternative names, in preference order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub installation_methods: InstallationMethods,
}

/// Installation strategies keyed by method name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationMethods {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_module: Option<NodeModuleInstallation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_module: Option<PythonModuleInstallation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerInstallation>,
}

impl InstallationMethods {
    /// True when no method is defined
    pub fn is_empty(&self) -> bool {
        self.node_module.is_none() && self.python_module.is_none() && self.docker.is_none()
    }

    /// Kinds of the defined methods, in schema order
    pub fn kinds(&self) -> Vec<MethodKind> {
        let mut kinds = Vec::new();
        if self.node_module.is_some() {
            kinds.push(MethodKind::NodeModule);
        }
        if self.python_module.is_some() {
            kinds.push(MethodKind::PythonModule);
        }
        if self.docker.is_some() {
            kinds.push(MethodKind::Docker);
        }
        kinds
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeModuleInstallation {
    /// npm package name, possibly scoped (`@owner/name`)
    pub npm_package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<EnvironmentVariables>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonModuleInstallation {
    pub pip_package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<EnvironmentVariables>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerInstallation {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<EnvironmentVariables>,
}

/// Installation method kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    NodeModule,
    PythonModule,
    Docker,
}

impl MethodKind {
    /// Key used for this method in `installationMethods`
    pub fn key(&self) -> &'static str {
        match self {
            MethodKind::NodeModule => "nodeModule",
            MethodKind::PythonModule => "pythonModule",
            MethodKind::Docker => "docker",
        }
    }

    /// Kind for an `installationMethods` key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "nodeModule" => Some(MethodKind::NodeModule),
            "pythonModule" => Some(MethodKind::PythonModule),
            "docker" => Some(MethodKind::Docker),
            _ => None,
        }
    }

    /// Name of the identifier field the method requires
    pub fn required_field(&self) -> &'static str {
        match self {
            MethodKind::NodeModule => "npmPackage",
            MethodKind::PythonModule => "pipPackage",
            MethodKind::Docker => "image",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lenient form of [`PackageSpec`] used before validation
///
/// Fields keep their raw JSON so a wrongly typed value is reported by the
/// validation rule that owns the field, not while parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpecDraft {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub aliases: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub installation_methods: Option<Value>,
    /// List-based schema variant; not accepted, kept to report it
    #[serde(default)]
    pub installation_options: Option<Value>,
}

impl PackageSpecDraft {
    /// Deserialize a draft from an already parsed JSON value
    ///
    /// Only a non-object value is rejected.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "expected a JSON object",
            ));
        }
        serde_json::from_value(value)
    }

    /// `description`, when it is a non-empty string
    pub fn description(&self) -> Option<&str> {
        non_empty_str(self.description.as_ref())
    }

    /// String entries of `aliases`
    pub fn aliases(&self) -> Option<Vec<String>> {
        let Value::Array(items) = self.aliases.as_ref()? else {
            return None;
        };
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }

    /// `installationMethods`, when it is an object
    pub fn methods(&self) -> Option<InstallationMethodsDraft> {
        match self.installation_methods.as_ref()? {
            Value::Object(map) => Some(InstallationMethodsDraft::from_object(map)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstallationMethodsDraft {
    pub node_module: Option<MethodDraft>,
    pub python_module: Option<MethodDraft>,
    pub docker: Option<MethodDraft>,
    /// Keys other than the known method names
    pub unknown: BTreeMap<String, Value>,
}

impl InstallationMethodsDraft {
    /// Split an `installationMethods` object into known and unknown methods; `null` entries are skipped
    pub fn from_object(map: &Map<String, Value>) -> Self {
        let mut methods = Self::default();
        for (key, value) in map.iter().filter(|(_, v)| !v.is_null()) {
            match MethodKind::from_key(key) {
                Some(MethodKind::NodeModule) => {
                    methods.node_module = Some(MethodDraft::from_value(value))
                }
                Some(MethodKind::PythonModule) => {
                    methods.python_module = Some(MethodDraft::from_value(value))
                }
                Some(MethodKind::Docker) => methods.docker = Some(MethodDraft::from_value(value)),
                None => {
                    methods.unknown.insert(key.clone(), value.clone());
                }
            }
        }
        methods
    }

    /// The draft for a given method kind, if present
    pub fn get(&self, kind: MethodKind) -> Option<&MethodDraft> {
        match kind {
            MethodKind::NodeModule => self.node_module.as_ref(),
            MethodKind::PythonModule => self.python_module.as_ref(),
            MethodKind::Docker => self.docker.as_ref(),
        }
    }

    /// True when neither a known nor an unknown method key is present
    pub fn is_empty(&self) -> bool {
        self.node_module.is_none()
            && self.python_module.is_none()
            && self.docker.is_none()
            && self.unknown.is_empty()
    }
}

/// Lenient form of a single installation method
///
/// All three identifier fields are read; only the one matching the method
/// kind is meaningful.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDraft {
    pub npm_package: Option<Value>,
    pub pip_package: Option<Value>,
    pub image: Option<Value>,
    pub env_vars: Option<Value>,
}

impl MethodDraft {
    /// Read the known fields of a method object
    ///
    /// A method that is not an object reads as having no fields.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).filter(|v| !v.is_null()).cloned();
        Self {
            npm_package: field("npmPackage"),
            pip_package: field("pipPackage"),
            image: field("image"),
            env_vars: field("envVars"),
        }
    }

    /// Raw identifier field for the given kind
    pub fn identifier_value(&self, kind: MethodKind) -> Option<&Value> {
        match kind {
            MethodKind::NodeModule => self.npm_package.as_ref(),
            MethodKind::PythonModule => self.pip_package.as_ref(),
            MethodKind::Docker => self.image.as_ref(),
        }
    }

    /// Documented environment variables
    ///
    /// Values that are not strings (`"PORT": 3000`) keep their JSON text.
    pub fn env_vars(&self) -> Option<EnvironmentVariables> {
        let Some(Value::Object(vars)) = &self.env_vars else {
            return None;
        };
        Some(
            vars.iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), text)
                })
                .collect(),
        )
    }

    /// True when at least one environment variable is documented
    pub fn has_env_vars(&self) -> bool {
        matches!(&self.env_vars, Some(Value::Object(vars)) if !vars.is_empty())
    }
}

/// Whether a field counts as provided: present and not an empty string
pub fn is_provided(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
