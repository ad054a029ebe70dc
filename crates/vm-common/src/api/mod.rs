//! Request and export shapes exchanged with callers of the engine.

pub mod candidate_export;
pub mod candidate_request;

pub use candidate_export::CandidateExportRow;
pub use candidate_request::CandidateRequest;
