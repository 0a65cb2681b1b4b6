//! Alerting
//!
//! Decides whether a scored run warrants a notification and formats the
//! message handed to the messaging collaborator. Nothing here sends anything.

mod evaluator;
mod message;

pub use evaluator::{
    evaluate, evaluate_with_scope, AlertConfig, AlertDecision, AlertEvaluator, AlertScope,
};
pub use message::AlertMessage;
