use std::collections::HashMap;

use mathwhiz_core::SkillRequest;
use serde::{Deserialize, Serialize};

/// Inbound JSON envelope as posted by the voice platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    pub request: PlatformRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemContext>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlatformRequest {
    #[serde(rename = "LaunchRequest")]
    Launch(RequestMeta),
    #[serde(rename = "IntentRequest")]
    Intent(IntentRequest),
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded(SessionEndedRequest),
    /// Any request type this skill does not handle (audio player events, system exceptions...).
    #[serde(other)]
    Unsupported,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRequest {
    #[serde(flatten)]
    pub meta: RequestMeta,
    pub intent: Intent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndedRequest {
    #[serde(flatten)]
    pub meta: RequestMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionEndedError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndedError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

impl RequestEnvelope {
    pub fn new(request: PlatformRequest) -> Self {
        Self { version: default_version(), session: None, context: None, request }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Application id from the session, falling back to the system context.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|session| session.application.as_ref())
            .or_else(|| {
                self.context
                    .as_ref()
                    .and_then(|context| context.system.as_ref())
                    .and_then(|system| system.application.as_ref())
            })
            .map(|application| application.application_id.as_str())
    }

    pub fn request_id(&self) -> Option<&str> {
        match &self.request {
            PlatformRequest::Launch(meta) => Some(&meta.request_id),
            PlatformRequest::Intent(intent) => Some(&intent.meta.request_id),
            PlatformRequest::SessionEnded(ended) => Some(&ended.meta.request_id),
            PlatformRequest::Unsupported => None,
        }
    }

    pub fn is_new_session(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.new)
    }

    pub fn request_type(&self) -> &'static str {
        match &self.request {
            PlatformRequest::Launch(_) => "LaunchRequest",
            PlatformRequest::Intent(_) => "IntentRequest",
            PlatformRequest::SessionEnded(_) => "SessionEndedRequest",
            PlatformRequest::Unsupported => "Unsupported",
        }
    }

    /// Normalizes the platform request; `None` for request types the skill ignores.
    /// Slots the platform sent without a value are left out.
    pub fn to_skill_request(&self) -> Option<SkillRequest> {
        match &self.request {
            PlatformRequest::Launch(_) => Some(SkillRequest::Launch),
            PlatformRequest::Intent(request) => Some(SkillRequest::Intent {
                name: request.intent.name.clone(),
                slots: request
                    .intent
                    .slots
                    .iter()
                    .filter_map(|(name, slot)| {
                        slot.value.as_ref().map(|value| (name.clone(), value.clone()))
                    })
                    .collect(),
            }),
            PlatformRequest::SessionEnded(_) => Some(SkillRequest::SessionEnded),
            PlatformRequest::Unsupported => None,
        }
    }
}

fn default_version() -> String {
    "1.0".to_owned()
}
