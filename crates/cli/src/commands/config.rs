use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mathwhiz_core::config::{AppConfig, LoadOptions};
use toml::Value;

use super::{CommandResult, EXIT_CONFIG_FAILURE};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG_FAILURE,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let facts = match &config.content.facts {
        Some(facts) => format!("{} custom", facts.len()),
        None => "built-in".to_string(),
    };
    let aliases = if config.content.operator_aliases.is_empty() {
        "<none>".to_string()
    } else {
        config
            .content
            .operator_aliases
            .iter()
            .map(|(keyword, operator)| format!("{keyword} => {operator}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let lines = [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "skill.application_id",
            &config.skill.application_id,
            source("skill.application_id", &["MATHWHIZ_SKILL_APPLICATION_ID"]),
        ),
        render_line("content.facts", &facts, source("content.facts", &[])),
        render_line(
            "content.operator_aliases",
            &aliases,
            source("content.operator_aliases", &[]),
        ),
        render_line(
            "server.bind_address",
            &config.server.bind_address,
            source("server.bind_address", &["MATHWHIZ_SERVER_BIND_ADDRESS"]),
        ),
        render_line(
            "server.port",
            &config.server.port.to_string(),
            source("server.port", &["MATHWHIZ_SERVER_PORT"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["MATHWHIZ_LOGGING_LEVEL", "MATHWHIZ_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["MATHWHIZ_LOGGING_FORMAT", "MATHWHIZ_LOG_FORMAT"]),
        ),
    ];

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("mathwhiz.toml"), PathBuf::from("config/mathwhiz.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::{contains_path, render_line};

    #[test]
    fn nested_paths_are_found_in_the_file_document() {
        let doc: toml::Value =
            "[content]\nfacts = [\"a\"]\n[content.operator_aliases]\nover = \"divided_by\"\n"
                .parse()
                .expect("valid toml");

        assert!(contains_path(&doc, "content.facts"));
        assert!(contains_path(&doc, "content.operator_aliases"));
        assert!(!contains_path(&doc, "server.port"));
    }

    #[test]
    fn lines_name_their_source() {
        assert_eq!(
            render_line("server.port", "8080", "default".to_string()),
            "- server.port = 8080 (source: default)"
        );
    }
}
