//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// DISPATCH DEFAULTS
// =============================================================================

/// Default bounded wait for a judgehost work poll, in seconds
pub const DEFAULT_LONGPOLL_TIMEOUT_SECONDS: u64 = 30;

/// Interval between work-queue checks inside one long poll, in milliseconds
pub const DEFAULT_LONGPOLL_INTERVAL_MS: u64 = 500;

/// Default dispatch priority for fresh submissions (lower judges first)
pub const DEFAULT_SUBMISSION_PRIORITY: i32 = 0;

/// Dispatch priority assigned to rejudging work
pub const REJUDGE_PRIORITY: i32 = 10;

// =============================================================================
// JUDGING RESULTS
// =============================================================================

/// Verdict strings as reported by judgehosts and stored on judgings
pub mod results {
    pub const CORRECT: &str = "correct";
    pub const WRONG_ANSWER: &str = "wrong-answer";
    pub const TIMELIMIT: &str = "timelimit";
    pub const RUN_ERROR: &str = "run-error";
    pub const MEMORY_LIMIT: &str = "memory-limit";
    pub const OUTPUT_LIMIT: &str = "output-limit";
    pub const NO_OUTPUT: &str = "no-output";
    pub const COMPILER_ERROR: &str = "compiler-error";
    pub const ABORTED: &str = "aborted";

    /// Every result a judgehost may report for a testcase run
    pub const ALL_RUN_RESULTS: &[&str] = &[
        CORRECT,
        WRONG_ANSWER,
        TIMELIMIT,
        RUN_ERROR,
        MEMORY_LIMIT,
        OUTPUT_LIMIT,
        NO_OUTPUT,
    ];
}

/// Default result priorities. Higher priority is used first as final
/// result; with equal priority the first occurring result wins. Note
/// that `correct` deliberately has the lowest priority: a judging can
/// only be confirmed correct after every testcase ran, while any error
/// class may short-circuit under lazy evaluation.
pub const DEFAULT_RESULTS_PRIO: &[(&str, i32)] = &[
    (results::MEMORY_LIMIT, 99),
    (results::OUTPUT_LIMIT, 99),
    (results::RUN_ERROR, 99),
    (results::TIMELIMIT, 99),
    (results::WRONG_ANSWER, 30),
    (results::NO_OUTPUT, 10),
    (results::CORRECT, 1),
];

// =============================================================================
// SCORING DEFAULTS
// =============================================================================

/// Default penalty time in minutes per wrong submission (if finally solved)
pub const DEFAULT_PENALTY_TIME: i64 = 20;

/// Default for whether compiler errors incur penalty time
pub const DEFAULT_COMPILE_PENALTY: bool = true;

/// Default for requiring jury verification before publication
pub const DEFAULT_VERIFICATION_REQUIRED: bool = false;

/// Default for measuring scoreboard resolution in seconds instead of minutes
pub const DEFAULT_SCORE_IN_SECONDS: bool = false;

/// Default for lazy evaluation of judging results
pub const DEFAULT_LAZY_EVAL_RESULTS: bool = true;

/// Default cap on stored run/diff/error output per testcase run, in bytes
pub const DEFAULT_OUTPUT_STORAGE_LIMIT: i64 = 50_000;

// =============================================================================
// JUDGEHOST HEALTH
// =============================================================================

/// Seconds since last check-in before a judgehost status shows "warning"
pub const DEFAULT_JUDGEHOST_WARNING_SECONDS: i64 = 30;

/// Seconds since last check-in before a judgehost status shows "critical";
/// also the staleness window after which a running judging is flagged as
/// probably crashed
pub const DEFAULT_JUDGEHOST_CRITICAL_SECONDS: i64 = 120;

// =============================================================================
// SYSTEM IDENTITIES
// =============================================================================

/// Verifier identity recorded when a judging is verified automatically
pub const AUTO_VERIFIER: &str = "auto-verifier";

/// Redis channel on which contest-visible state transitions are published
pub const EVENT_FEED_CHANNEL: &str = "judgecore:events";

/// Redis list onto which balloon notifications are pushed
pub const BALLOON_QUEUE: &str = "judgecore:balloons";
