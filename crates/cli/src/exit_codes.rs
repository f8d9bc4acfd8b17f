//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scheduled jobs branch on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain     | Description                                        |
//! |------|------------|----------------------------------------------------|
//! | 0    | Universal  | Success                                            |
//! | 1    | Universal  | General error (unspecified)                        |
//! | 2    | Universal  | CLI usage error (bad args, bad --as-of)            |
//! | 60   | recon      | Invalid run config                                 |
//! | 61   | recon      | Schema error (required column missing)             |
//! | 62   | recon      | Malformed row (bad start date, empty staff id)     |
//! | 63   | recon      | Input file unreadable                              |
//! | 64   | recon      | Flagged officers found (only with --strict-exit)   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use flexitrack_io::IoError;
use flexitrack_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconciliation (60-69)
// =============================================================================

/// Run config failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 60;

/// An input table is missing a required column.
pub const EXIT_RECON_SCHEMA: u8 = 61;

/// A row could not be read (unparseable start date, empty staff id).
pub const EXIT_RECON_MALFORMED: u8 = 62;

/// An input or config file could not be opened or decoded.
pub const EXIT_RECON_UNREADABLE: u8 = 63;

/// The report flagged at least one officer and --strict-exit was given.
pub const EXIT_RECON_FLAGGED: u8 = 64;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    if err.is_schema() {
        return EXIT_RECON_SCHEMA;
    }
    if err.is_malformed_row() {
        return EXIT_RECON_MALFORMED;
    }
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        _ => EXIT_ERROR,
    }
}

/// Every IoError means the file never became a table.
pub fn io_exit_code(_err: &IoError) -> u8 {
    EXIT_RECON_UNREADABLE
}
