//! Standard exit codes for CLI operations
//!
//! Each failure class gets its own code so scripts can branch on the outcome.
//! Code 2 is left to clap, which exits with it on usage errors.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// The named resource does not exist
pub const NOT_FOUND: i32 = 3;

/// Create collided with an existing resource
pub const ALREADY_EXISTS: i32 = 4;

/// Update lost an optimistic-concurrency race
pub const CONFLICT: i32 = 5;

/// Remote access failed (transport, authorization, rejected request)
pub const ACCESS_ERROR: i32 = 6;

/// A remote call exceeded its timeout
pub const TIMEOUT: i32 = 7;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 8;

/// Decode error - malformed document or wrong resource type
pub const DECODE_ERROR: i32 = 9;
