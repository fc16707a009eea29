use std::sync::Arc;

use mathwhiz_core::{
    FactSelector, IntentRouter, RouteOutcome, SkillCatalog, SkillError, ThreadRngSelector,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    envelope::{PlatformRequest, RequestEnvelope},
    response::{ResponseBuilder, ResponseEnvelope},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(ResponseEnvelope),
    /// Session end; the platform expects an empty body.
    Acknowledged,
    /// Request type the skill does not handle.
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("application id {received:?} is not allowed to invoke this skill")]
    ApplicationMismatch { received: Option<String> },
    #[error(transparent)]
    Skill(#[from] SkillError),
}

/// Platform-facing entry point: checks the caller, normalizes the envelope, routes it
/// and renders the reply.
pub struct SkillDispatcher<S = ThreadRngSelector> {
    application_id: String,
    router: IntentRouter<S>,
    responses: ResponseBuilder,
}

impl SkillDispatcher<ThreadRngSelector> {
    pub fn new(application_id: impl Into<String>, catalog: Arc<SkillCatalog>) -> Self {
        Self::with_router(application_id, IntentRouter::new(catalog))
    }
}

impl<S> SkillDispatcher<S>
where
    S: FactSelector,
{
    pub fn with_router(application_id: impl Into<String>, router: IntentRouter<S>) -> Self {
        let responses = ResponseBuilder::from_content(&router.catalog().content);
        Self { application_id: application_id.into(), router, responses }
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn responses(&self) -> &ResponseBuilder {
        &self.responses
    }

    pub fn dispatch(&self, envelope: &RequestEnvelope) -> Result<HandlerResult, DispatchError> {
        self.verify_application(envelope)?;
        let correlation_id = envelope.request_id().unwrap_or("unknown");

        if envelope.is_new_session() {
            let session_id =
                envelope.session.as_ref().map_or("unknown", |session| session.session_id.as_str());
            info!(
                event_name = "skill.session.started",
                correlation_id = %correlation_id,
                session_id = session_id,
                "new skill session"
            );
        }

        let Some(request) = envelope.to_skill_request() else {
            debug!(
                event_name = "skill.request.ignored",
                correlation_id = %correlation_id,
                "unsupported request type"
            );
            return Ok(HandlerResult::Ignored);
        };

        if let PlatformRequest::SessionEnded(ended) = &envelope.request {
            info!(
                event_name = "skill.session.ended",
                correlation_id = %correlation_id,
                reason = ended.reason.as_deref().unwrap_or("unknown"),
                error_type = ended.error.as_ref().map_or("none", |error| error.error_type.as_str()),
                "skill session ended"
            );
        }

        match self.router.handle(&request)? {
            RouteOutcome::Respond(response) => {
                info!(
                    event_name = "skill.request.handled",
                    correlation_id = %correlation_id,
                    request_kind = request.kind(),
                    response_kind = ?response.kind(),
                    "skill request handled"
                );
                Ok(HandlerResult::Responded(self.responses.render(&response)))
            }
            RouteOutcome::Acknowledged => Ok(HandlerResult::Acknowledged),
        }
    }

    /// Like [`dispatch`](Self::dispatch), but turns skill failures into a spoken reply
    /// and every outcome into an envelope. Only caller verification still fails.
    pub fn respond(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope, DispatchError> {
        match self.dispatch(envelope) {
            Ok(HandlerResult::Responded(response)) => Ok(response),
            Ok(HandlerResult::Acknowledged | HandlerResult::Ignored) => {
                Ok(self.responses.acknowledgement())
            }
            Err(DispatchError::Skill(error)) => {
                warn!(
                    event_name = "skill.request.failed",
                    correlation_id = %envelope.request_id().unwrap_or("unknown"),
                    error_class = error.error_class(),
                    error = %error,
                    "skill request failed"
                );
                Ok(self.responses.failure(&error))
            }
            Err(error) => Err(error),
        }
    }

    fn verify_application(&self, envelope: &RequestEnvelope) -> Result<(), DispatchError> {
        match envelope.application_id() {
            Some(received) if received == self.application_id => Ok(()),
            received => {
                warn!(
                    event_name = "skill.request.rejected",
                    correlation_id = %envelope.request_id().unwrap_or("unknown"),
                    received_application_id = received.unwrap_or("none"),
                    "application id mismatch"
                );
                Err(DispatchError::ApplicationMismatch { received: received.map(str::to_owned) })
            }
        }
    }
}
