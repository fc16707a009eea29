//! Voice platform interface for Math Whiz
//!
//! This crate adapts the platform's JSON contract to the skill core:
//! - **Envelope** (`envelope`) - inbound request envelope (launch, intent, session ended)
//! - **Response** (`response`) - outbound envelope and the ask/tell `ResponseBuilder`
//! - **Dispatch** (`dispatch`) - application id check, routing and rendering
//!
//! # Architecture
//!
//! ```text
//! Platform request → SkillDispatcher → IntentRouter (core) → ResponseIntent
//!                          ↓
//!              ResponseBuilder → Platform response
//! ```

pub mod dispatch;
pub mod envelope;
pub mod response;

pub use dispatch::{DispatchError, HandlerResult, SkillDispatcher};
pub use envelope::{PlatformRequest, RequestEnvelope};
pub use response::{ResponseBuilder, ResponseEnvelope};
