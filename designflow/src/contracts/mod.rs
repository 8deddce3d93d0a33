//! Reply contracts.
//!
//! Generator replies are parsed and validated exactly once, at the stage
//! boundary. Everything downstream works with typed records.

mod concept;
mod errors;
mod reply;

pub use concept::{parse_concept_reply, RawConcept, RawVisualPrompt};
pub use errors::ValidationError;
pub use reply::{parse_json, strip_code_fence, ReplyContract};
