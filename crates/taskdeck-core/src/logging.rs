//! Structured logging schema and field name constants for taskdeck.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, request rejected or fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), writes |
//! | DEBUG | Decision points, sort/filter choices, result counts |
//! | TRACE | Per-item iteration (scores, rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "auth", "ranking"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "tasks", "projects", "users", "stats"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "create", "update", "delete", "search"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Authenticated user UUID.
pub const USER_ID: &str = "user_id";

/// Task UUID being operated on.
pub const TASK_ID: &str = "task_id";

/// Project UUID being operated on.
pub const PROJECT_ID: &str = "project_id";

/// Search query text.
pub const QUERY: &str = "query";

/// Sort method requested for a listing.
pub const SORT_METHOD: &str = "sorting_method";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query or listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of rows touched by a write.
pub const ROWS_AFFECTED: &str = "rows_affected";
