use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{SkillCatalog, SkillContent},
    facts::FactSet,
    math::{Operator, OperatorTable},
};

const APPLICATION_ID_PREFIXES: [&str; 2] = ["amzn1.ask.skill.", "amzn1.echo-sdk-ams.app."];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub skill: SkillConfig,
    pub content: ContentConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SkillConfig {
    pub application_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct ContentConfig {
    /// Replaces the built-in fact list when set.
    pub facts: Option<Vec<String>>,
    /// Extra spoken keywords mapped onto the built-in operators.
    pub operator_aliases: BTreeMap<String, Operator>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub application_id: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub facts: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            skill: SkillConfig { application_id: String::new() },
            content: ContentConfig::default(),
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("mathwhiz.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Freezes the content settings into the shared read-only catalog.
    pub fn catalog(&self) -> Result<SkillCatalog, ConfigError> {
        let facts = match &self.content.facts {
            Some(facts) => FactSet::new(facts.iter().cloned())
                .map_err(|error| ConfigError::Validation(format!("content.facts: {error}")))?,
            None => FactSet::standard(),
        };
        let operators = self
            .content
            .operator_aliases
            .iter()
            .fold(OperatorTable::standard(), |table, (keyword, operator)| {
                table.with_keyword(keyword, *operator)
            });

        Ok(SkillCatalog::new(SkillContent::default(), facts, operators))
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(skill) = patch.skill {
            if let Some(application_id) = skill.application_id {
                self.skill.application_id = application_id;
            }
        }

        if let Some(content) = patch.content {
            if let Some(facts) = content.facts {
                self.content.facts = Some(facts);
            }
            if let Some(operator_aliases) = content.operator_aliases {
                self.content.operator_aliases.extend(operator_aliases);
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MATHWHIZ_SKILL_APPLICATION_ID") {
            self.skill.application_id = value;
        }

        if let Some(value) = read_env("MATHWHIZ_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("MATHWHIZ_SERVER_PORT") {
            self.server.port = parse_u16("MATHWHIZ_SERVER_PORT", &value)?;
        }

        let log_level =
            read_env("MATHWHIZ_LOGGING_LEVEL").or_else(|| read_env("MATHWHIZ_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MATHWHIZ_LOGGING_FORMAT").or_else(|| read_env("MATHWHIZ_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(application_id) = overrides.application_id {
            self.skill.application_id = application_id;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(facts) = overrides.facts {
            self.content.facts = Some(facts);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_skill(&self.skill)?;
        validate_content(&self.content)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("mathwhiz.toml"), PathBuf::from("config/mathwhiz.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_skill(skill: &SkillConfig) -> Result<(), ConfigError> {
    let application_id = skill.application_id.trim();
    if application_id.is_empty() {
        return Err(ConfigError::Validation(
            "skill.application_id is required. \
             Copy it from the developer console > Your Skill > Skill ID"
                .to_string(),
        ));
    }

    let known_prefix =
        APPLICATION_ID_PREFIXES.iter().any(|prefix| application_id.starts_with(prefix));
    if !known_prefix {
        return Err(ConfigError::Validation(format!(
            "skill.application_id must start with `{}` (got `{application_id}`)",
            APPLICATION_ID_PREFIXES[0]
        )));
    }

    Ok(())
}

fn validate_content(content: &ContentConfig) -> Result<(), ConfigError> {
    if let Some(facts) = &content.facts {
        if facts.iter().all(|fact| fact.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "content.facts must contain at least one non-empty fact".to_string(),
            ));
        }
    }

    let blank_keyword = content.operator_aliases.keys().find(|keyword| keyword.trim().is_empty());
    if let Some(keyword) = blank_keyword {
        return Err(ConfigError::Validation(format!(
            "content.operator_aliases has an empty keyword (`{keyword}`)"
        )));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    skill: Option<SkillPatch>,
    content: Option<ContentPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SkillPatch {
    application_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentPatch {
    facts: Option<Vec<String>>,
    operator_aliases: Option<BTreeMap<String, Operator>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
