//! Math Whiz skill core: intent routing and response construction.
//!
//! The router is synchronous and holds only read-only data. Everything it needs at
//! request time lives in a [`SkillCatalog`] that is built once from configuration.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod facts;
pub mod math;
pub mod router;

pub use catalog::{SkillCatalog, SkillContent};
pub use domain::request::{IntentName, SkillRequest, Slots};
pub use domain::response::{ResponseIntent, ResponseKind};
pub use errors::{ArithmeticError, SkillError};
pub use facts::{FactSelector, FactSet, SeededSelector, ThreadRngSelector};
pub use math::{MathQuestion, Operator, OperatorTable};
pub use router::{IntentRouter, RouteOutcome};
