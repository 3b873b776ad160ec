//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_HOUSE: &str = "house";
pub const FIELD_PART: &str = "part";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_PATH: &str = "path";
pub const FIELD_REASON: &str = "reason";

// Collection sizes
pub const FIELD_PART_COUNT: &str = "part_count";
pub const FIELD_SKIPPED_COUNT: &str = "skipped_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Scanner events
pub const EVENT_HOUSE_PATH_MISSING: &str = "house_path_missing";
pub const EVENT_PART_REGISTERED: &str = "part_registered";
pub const EVENT_CANDIDATE_SKIPPED: &str = "candidate_skipped";
