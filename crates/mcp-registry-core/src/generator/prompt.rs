//! Prompt text for package spec generation

use crate::llm::FAILURE_MARKER;

/// README text beyond this many characters is dropped from the prompt
pub const MAX_README_CHARS: usize = 10_000;

const SCHEMA_INSTRUCTIONS: &str = r#"
The package specification should be in JSON format and include the following fields:
- id: A unique identifier for the server (if GitHub, use format "username/repo#subdirectory" for github, or "gitlab.com/user/repo" or similar for non-github)
- url: URL to the server's source code
- name: Name of the server
- aliases: List of alternative names for the server - use simple, short names without "mcp" in them (e.g., "mongodb" instead of "mongodb-mcp")
- description: Description of the server
- installationMethods: Methods to install the server (nodeModule, pythonModule, or docker)

IMPORTANT: YOU MUST INCLUDE ALL APPLICABLE INSTALLATION METHODS in the installationMethods object.

1. If you find references to npm packages, package.json, or npx commands, include a nodeModule installation method.
2. If you find references to Python, pip, requirements.txt, or .py files, include a pythonModule installation method.
3. If you find references to Docker, Dockerfile, docker-compose, or docker run commands, include a docker installation method.
4. CRITICAL: For any server that has a nodeModule installation method, ALWAYS INCLUDE a docker installation method as well, using the same package name but with a "modelcontextprotocol/" prefix for the Docker image. All MCP servers support both nodeModule and Docker installation methods.
5. IMPORTANT: For any server that interfaces with external APIs (search APIs, weather APIs, etc.), ALWAYS INCLUDE the necessary API key environment variables in BOTH nodeModule and docker installation methods. If the server name suggests it interfaces with a service (like "Brave Search", "Google Maps", etc.), assume it requires an API key even if not explicitly mentioned in the documentation.

Many repositories support multiple installation methods - be sure to include ALL that apply, not just one. For example, if a repository has both npm package and Docker support, include BOTH nodeModule and docker installation methods.

For nodeModule installation method, include:
- npmPackage: Name of the npm package (usually found in package.json, often matches the repository name, could include scope like @username/package-name)
- envVars: Key/value list of environment variables mentioned in documentation (if applicable)

For pythonModule installation method, include:
- pipPackage: Name of the pip package (usually found in setup.py or pyproject.toml)
- envVars: Key/value list of environment variables mentioned in documentation (if applicable)

For docker installation method, include:
- image: Docker image to use (often the repo name)
- envVars: Key/value list of environment variables mentioned in documentation (if applicable)

Examples of valid installationMethods objects:

For an npm package:
"installationMethods": {
  "nodeModule": {
    "npmPackage": "@username/package-name",
    "envVars": {
      "API_KEY": "Description of the API key",
      "OTHER_VAR": "Description of other variable"
    }
  }
}

For a package that could be installed via npm or Docker:
"installationMethods": {
  "nodeModule": {
    "npmPackage": "package-name"
  },
  "docker": {
    "image": "username/package-name"
  }
}

Please respond with ONLY the JSON object, no additional text or explanations.
"#;

/// Repository context gathered before prompting
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub readme: Option<String>,
    /// Pretty-printed package.json
    pub manifest: Option<String>,
}

/// Compose the generation prompt for `url`
pub fn build_prompt(url: &str, context: &PromptContext) -> String {
    let mut prompt = format!(
        "\nI need you to generate a package specification for an MCP server based on the following URL:\n{url}\n\n\
         If this URL is not a git repository (or similar), please end in failure (just output \"{FAILURE_MARKER}: [reason]\") where [reason] explains why you couldn't generate the spec.\n"
    );
    prompt.push_str(SCHEMA_INSTRUCTIONS);

    if let Some(readme) = context.readme.as_deref().filter(|r| !r.is_empty()) {
        prompt.push_str(
            "\nHere is the README content from the repository to help with your analysis:\n",
        );
        prompt.push_str(&truncate_chars(readme, MAX_README_CHARS));
    }

    if let Some(manifest) = context.manifest.as_deref().filter(|m| !m.is_empty()) {
        prompt.push_str("\nHere is the package.json content from the repository:\n");
        prompt.push_str(manifest);
    }

    prompt
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
