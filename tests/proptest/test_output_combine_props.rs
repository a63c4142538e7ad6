//! Property-based tests for combined output

use proptest::prelude::*;
use scriptdeck::models::execution_result::{combine_output, STDERR_SEPARATOR};

proptest! {
    #[test]
    fn test_stdout_always_leads(stdout in "\\PC{0,200}", stderr in "\\PC{0,200}") {
        let combined = combine_output(&stdout, &stderr);
        prop_assert!(combined.starts_with(&stdout));
        prop_assert_eq!(combined.as_bytes()[stdout.len()], b'\n');
    }

    #[test]
    fn test_whitespace_stderr_is_dropped(stdout in "[a-z ]{0,80}", stderr in "[ \\t\\r\\n]{0,40}") {
        let combined = combine_output(&stdout, &stderr);
        prop_assert_eq!(combined, format!("{}\n", stdout));
    }

    #[test]
    fn test_meaningful_stderr_is_kept(
        stdout in "[a-z\\n]{0,80}",
        pad in "[ \\n]{0,5}",
        body in "[a-zA-Z0-9]{1,60}",
    ) {
        let stderr = format!("{}{}{}", pad, body, pad);
        let combined = combine_output(&stdout, &stderr);
        prop_assert_eq!(
            combined,
            format!("{}\n{}\n{}\n", stdout, STDERR_SEPARATOR, stderr)
        );
    }
}
