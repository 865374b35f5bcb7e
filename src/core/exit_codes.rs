//! Exit codes reported by the `mvnrun` process.
//!
//! Each pipeline stage has its own code so a failure of the launched program
//! (`PROCESS_EXIT`) is never confused with a failure of the tool itself.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Bad flags, unreadable settings file.
pub const CONFIG_ERROR: i32 = 1;

/// Malformed artifact coordinate.
pub const INVALID_COORDINATE: i32 = 10;

/// The dependency tree could not be resolved.
pub const RESOLUTION_FAILURE: i32 = 11;

/// No class name given and no `Main-Class` in the first classpath entry.
pub const ENTRY_POINT_MISSING: i32 = 12;

/// Temp file, archive, or process spawn failure.
pub const IO_FAILURE: i32 = 13;

/// The launched program exited with a non-zero code.
pub const PROCESS_EXIT: i32 = 14;

/// Interrupted (Ctrl-C) while waiting for the launched program.
pub const INTERRUPTED: i32 = 130;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            CONFIG_ERROR,
            INVALID_COORDINATE,
            RESOLUTION_FAILURE,
            ENTRY_POINT_MISSING,
            IO_FAILURE,
            PROCESS_EXIT,
            INTERRUPTED,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fit_in_a_process_status() {
        for code in [CONFIG_ERROR, PROCESS_EXIT, INTERRUPTED] {
            assert!(u8::try_from(code).is_ok());
        }
    }
}
