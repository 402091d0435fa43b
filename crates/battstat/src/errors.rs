//! Exit status for battstat

/// Exit code for success, including reports with missing fields
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when ioreg cannot be run, returns nothing, or the dump cannot be read
pub const EXIT_ENVIRONMENT_ERROR: i32 = 1;
