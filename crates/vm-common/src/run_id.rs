//! Identifiers for engine runs and candidate computations.
//!
//! The process gets one ULID at first access; every fresh computation also gets its own
//! ULID so cached results can be traced back to the run that produced them.

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Process-level run ID, stable for the process lifetime.
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Fresh ULID for a single candidate computation.
#[inline]
pub fn computation_id() -> String {
    Ulid::new().to_string()
}
