use std::sync::Arc;

use clap::Subcommand;
use mathwhiz_core::{
    config::{AppConfig, LoadOptions},
    math::{FIRST_NUMBER_SLOT, OPERATOR_SLOT, SECOND_NUMBER_SLOT},
    IntentName,
};
use mathwhiz_skill::{
    envelope::{Application, Intent, IntentRequest, RequestMeta, SessionEndedRequest, Session, Slot},
    DispatchError, HandlerResult, PlatformRequest, RequestEnvelope, ResponseEnvelope,
    SkillDispatcher,
};
use serde_json::Value;

use super::{CommandResult, EXIT_CONFIG_FAILURE, EXIT_SKILL_FAILURE};

const COMMAND: &str = "invoke";
const SESSION_ID: &str = "mathwhiz-cli";
const REQUEST_ID: &str = "mathwhiz-cli-invoke";

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Target {
    #[command(about = "Open the skill without an intent")]
    Launch,
    #[command(about = "Ask for help")]
    Help,
    #[command(about = "Ask for a random fact")]
    Fact,
    #[command(about = "End the session")]
    End,
    #[command(
        about = "Ask a math question, e.g. `math 12 divided by 4`",
        arg_required_else_help = true
    )]
    Math {
        /// First number, operator keyword (may span words), second number.
        #[arg(num_args = 3.., allow_hyphen_values = true, required = true)]
        words: Vec<String>,
    },
    #[command(about = "Send an arbitrary intent name with no slots")]
    Intent { name: String },
}

pub fn run(target: Target) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                error.to_string(),
                EXIT_CONFIG_FAILURE,
            );
        }
    };
    let catalog = match config.catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                error.to_string(),
                EXIT_CONFIG_FAILURE,
            );
        }
    };

    let dispatcher = SkillDispatcher::new(&config.skill.application_id, Arc::new(catalog));
    let envelope = build_envelope(&target, &config.skill.application_id);

    match dispatcher.dispatch(&envelope) {
        Ok(HandlerResult::Responded(response)) => CommandResult::success_with_response(
            COMMAND,
            response.speech_text().unwrap_or_default().to_string(),
            Some(to_value(&response)),
        ),
        Ok(HandlerResult::Acknowledged | HandlerResult::Ignored) => {
            let response = dispatcher.responses().acknowledgement();
            CommandResult::success_with_response(COMMAND, "acknowledged", Some(to_value(&response)))
        }
        Err(DispatchError::Skill(error)) => {
            let response = dispatcher.responses().failure(&error);
            CommandResult::failure_with_response(
                COMMAND,
                error.error_class(),
                error.to_string(),
                Some(to_value(&response)),
                EXIT_SKILL_FAILURE,
            )
        }
        Err(error @ DispatchError::ApplicationMismatch { .. }) => CommandResult::failure(
            COMMAND,
            "application_mismatch",
            error.to_string(),
            EXIT_SKILL_FAILURE,
        ),
    }
}

/// Wraps the target in the envelope the platform would post for it.
pub fn build_envelope(target: &Target, application_id: &str) -> RequestEnvelope {
    let meta = RequestMeta { request_id: REQUEST_ID.to_string(), ..RequestMeta::default() };

    let request = match target {
        Target::Launch => PlatformRequest::Launch(meta),
        Target::End => PlatformRequest::SessionEnded(SessionEndedRequest {
            meta,
            reason: Some("USER_INITIATED".to_string()),
            error: None,
        }),
        Target::Help => intent_request(meta, IntentName::Help.platform_name(), Vec::new()),
        Target::Fact => intent_request(meta, IntentName::GetFact.platform_name(), Vec::new()),
        Target::Intent { name } => intent_request(meta, name, Vec::new()),
        Target::Math { words } => {
            intent_request(meta, IntentName::DoMath.platform_name(), math_slots(words))
        }
    };

    RequestEnvelope::new(request).with_session(Session {
        new: matches!(target, Target::Launch),
        session_id: SESSION_ID.to_string(),
        application: Some(Application { application_id: application_id.to_string() }),
        user: None,
    })
}

fn intent_request(meta: RequestMeta, name: &str, slots: Vec<(&str, String)>) -> PlatformRequest {
    PlatformRequest::Intent(IntentRequest {
        meta,
        intent: Intent {
            name: name.to_string(),
            slots: slots
                .into_iter()
                .map(|(slot, value)| {
                    (slot.to_string(), Slot { name: slot.to_string(), value: Some(value) })
                })
                .collect(),
            confirmation_status: None,
        },
    })
}

fn math_slots(words: &[String]) -> Vec<(&'static str, String)> {
    let [first, operator @ .., second] = words else {
        return Vec::new();
    };

    vec![
        (FIRST_NUMBER_SLOT, first.clone()),
        (OPERATOR_SLOT, operator.join(" ")),
        (SECOND_NUMBER_SLOT, second.clone()),
    ]
}

fn to_value(response: &ResponseEnvelope) -> Value {
    serde_json::to_value(response).unwrap_or(Value::Null)
}
