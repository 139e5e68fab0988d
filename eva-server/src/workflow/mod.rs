//! Evaluation workflows
//!
//! - [`editor`]: persist one record's evaluator slots
//! - [`dispatcher`]: create an approval link and notify the approver
//! - [`responder`]: load a link and record the approver's decision

pub mod dispatcher;
pub mod editor;
pub mod responder;

pub use dispatcher::{ApprovalDispatch, DispatchError, DispatchOutcome, approval_link};
pub use editor::{EvaluatorAssignment, SaveError};
pub use responder::{ApprovalView, DecisionError};
