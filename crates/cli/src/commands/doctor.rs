use std::sync::Arc;

use mathwhiz_core::{
    config::{AppConfig, LoadOptions},
    SkillCatalog,
};
use mathwhiz_skill::{HandlerResult, SkillDispatcher};
use serde::Serialize;

use super::invoke::{build_envelope, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: format!(
                    "configuration loaded for `{}`",
                    config.skill.application_id
                ),
            });
            checks.push(check_skill(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "skill_round_trip",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_skill(config: &AppConfig) -> DoctorCheck {
    match config.catalog() {
        Ok(catalog) => check_round_trip(&config.skill.application_id, catalog),
        Err(error) => DoctorCheck {
            name: "skill_round_trip",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

/// Sends a math and a fact request through the dispatcher the server would build.
fn check_round_trip(application_id: &str, catalog: SkillCatalog) -> DoctorCheck {
    let fact_count = catalog.facts.len();
    let operator_count = catalog.operators.len();
    let facts = catalog.facts.clone();
    let dispatcher = SkillDispatcher::new(application_id, Arc::new(catalog));

    let math = Target::Math { words: ["1", "plus", "1"].map(str::to_string).to_vec() };
    let answer = match dispatcher.dispatch(&build_envelope(&math, application_id)) {
        Ok(HandlerResult::Responded(response)) => response.speech_text().map(str::to_string),
        Ok(_) => None,
        Err(error) => {
            return DoctorCheck {
                name: "skill_round_trip",
                status: CheckStatus::Fail,
                details: format!("math request failed: {error}"),
            };
        }
    };
    if answer.as_deref() != Some("The answer is 2") {
        return DoctorCheck {
            name: "skill_round_trip",
            status: CheckStatus::Fail,
            details: format!("math request answered {answer:?}"),
        };
    }

    let fact = match dispatcher.dispatch(&build_envelope(&Target::Fact, application_id)) {
        Ok(HandlerResult::Responded(response)) => response.speech_text().map(str::to_string),
        _ => None,
    };
    if !fact.as_deref().is_some_and(|fact| facts.contains(fact)) {
        return DoctorCheck {
            name: "skill_round_trip",
            status: CheckStatus::Fail,
            details: format!("fact request answered {fact:?}"),
        };
    }

    DoctorCheck {
        name: "skill_round_trip",
        status: CheckStatus::Pass,
        details: format!(
            "answered math and fact ({fact_count} facts, {operator_count} operator keywords)"
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
