//! Subprocess output normalization.

/// Combine captured stdout and stderr into one answer text.
///
/// Stdout is the primary answer; a non-empty stderr is appended under a
/// visible separator so diagnostics reach the operator without being
/// mistaken for the answer itself.
pub(crate) fn combine_output(stdout: &str, stderr: &str) -> String {
    let mut text = stdout.trim().to_string();
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        text.push_str("\n\n--- STDERR ---\n");
        text.push_str(stderr);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_only() {
        assert_eq!(combine_output("answer\n", ""), "answer");
    }

    #[test]
    fn test_stderr_appended_under_separator() {
        let combined = combine_output("answer\n", "warning: deprecated\n");
        assert_eq!(combined, "answer\n\n--- STDERR ---\nwarning: deprecated");
    }

    #[test]
    fn test_blank_stderr_not_appended() {
        assert_eq!(combine_output("answer", "  \n "), "answer");
    }

    #[test]
    fn test_stderr_only() {
        let combined = combine_output("", "boom");
        assert_eq!(combined, "\n\n--- STDERR ---\nboom");
    }
}
