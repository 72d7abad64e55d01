/// Failure classification when no results artifact was produced
///
/// Looks at raw stderr (and, for some images, stdout) to explain why the
/// runner never wrote `results.json`: syntax errors, missing modules or
/// assemblies, compiler diagnostics.
use lazy_static::lazy_static;
use regex::Regex;

pub const NO_RESULTS_MESSAGE: &str = "No test results found. The tests may have failed to run.";

lazy_static! {
    static ref GENERIC_ERROR: Regex = Regex::new(r"(.*?error.*?:.*)").unwrap();
    static ref GO_SYNTAX_ERROR: Regex = Regex::new(r"(syntax error:.+?)(?:\n|$)").unwrap();
    static ref GO_COMPILE_ERROR: Regex = Regex::new(r"(.*\.go:\d+:\d+:.+?)(?:\n|$)").unwrap();
    static ref PYTHON_SYNTAX_ERROR: Regex = Regex::new(r"(SyntaxError:.+?)(?:\n|$)").unwrap();
    static ref PYTHON_IMPORT_ERROR: Regex = Regex::new(r"(ImportError:.+?)(?:\n|$)").unwrap();
}

/// Substring looked up in stdout, and the suffix appended to the default message
#[derive(Debug, Clone, Copy)]
pub struct StdoutHint {
    pub needle: &'static str,
    pub suffix: &'static str,
}

/// Language-specific classification rules; patterns are tried in order
#[derive(Debug, Clone)]
pub struct FailureRules {
    pub stderr_patterns: Vec<&'static Regex>,
    /// Only consulted when stderr is empty
    pub stdout_hints: Vec<StdoutHint>,
}

impl FailureRules {
    pub fn csharp() -> Self {
        Self {
            stderr_patterns: vec![&*GENERIC_ERROR],
            stdout_hints: vec![
                StdoutHint {
                    needle: "Could not load file or assembly",
                    suffix: " A required assembly could not be found.",
                },
                StdoutHint {
                    needle: "Syntax error",
                    suffix: " There is a syntax error in the code.",
                },
            ],
        }
    }

    pub fn go() -> Self {
        Self {
            stderr_patterns: vec![&*GO_SYNTAX_ERROR, &*GO_COMPILE_ERROR],
            stdout_hints: Vec::new(),
        }
    }

    pub fn python() -> Self {
        Self {
            stderr_patterns: vec![&*PYTHON_SYNTAX_ERROR, &*PYTHON_IMPORT_ERROR],
            stdout_hints: Vec::new(),
        }
    }

    pub fn typescript() -> Self {
        Self {
            stderr_patterns: vec![&*GENERIC_ERROR],
            stdout_hints: vec![
                StdoutHint {
                    needle: "Cannot find module",
                    suffix: " A required module could not be found.",
                },
                StdoutHint {
                    needle: "SyntaxError",
                    suffix: " There is a syntax error in the code.",
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub message: String,
    /// True when a stderr pattern produced the message
    pub matched: bool,
}

/// Derive the error message for the synthetic "Execution Error" case
pub fn classify_failure(stdout: &str, stderr: &str, rules: &FailureRules) -> Classification {
    if !stderr.is_empty() {
        let found = rules
            .stderr_patterns
            .iter()
            .find_map(|pattern| pattern.captures(stderr))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string());

        return match found {
            Some(message) => Classification {
                message,
                matched: true,
            },
            None => Classification {
                message: NO_RESULTS_MESSAGE.to_string(),
                matched: false,
            },
        };
    }

    let mut message = NO_RESULTS_MESSAGE.to_string();
    if let Some(hint) = rules.stdout_hints.iter().find(|h| stdout.contains(h.needle)) {
        message.push_str(hint.suffix);
    }

    Classification {
        message,
        matched: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_syntax_error() {
        let stderr = "  File \"test_solution.py\", line 3\nSyntaxError: invalid syntax";
        let result = classify_failure("", stderr, &FailureRules::python());

        assert_eq!(result.message, "SyntaxError: invalid syntax");
        assert!(result.matched);
    }

    #[test]
    fn test_python_import_error_after_syntax() {
        let stderr = "Traceback (most recent call last):\nImportError: cannot import name 'add' from 'solution'\n";
        let result = classify_failure("", stderr, &FailureRules::python());

        assert_eq!(
            result.message,
            "ImportError: cannot import name 'add' from 'solution'"
        );
    }

    #[test]
    fn test_go_syntax_error_preferred() {
        let stderr = "# solution\n./solution.go:4:2: syntax error: unexpected }\n";
        let result = classify_failure("", stderr, &FailureRules::go());

        assert_eq!(result.message, "syntax error: unexpected }");
    }

    #[test]
    fn test_go_compile_error() {
        let stderr = "# solution\n./solution.go:7:9: undefined: sum\nFAIL\n";
        let result = classify_failure("", stderr, &FailureRules::go());

        assert_eq!(result.message, "./solution.go:7:9: undefined: sum");
    }

    #[test]
    fn test_generic_error_line() {
        let stderr = "Build started\nUserSolution.cs(12,5): error CS1002: ; expected\n";
        let result = classify_failure("", stderr, &FailureRules::csharp());

        assert_eq!(result.message, "UserSolution.cs(12,5): error CS1002: ; expected");
    }

    #[test]
    fn test_unmatched_stderr_keeps_default() {
        let result = classify_failure("", "Killed", &FailureRules::go());

        assert_eq!(result.message, NO_RESULTS_MESSAGE);
        assert!(!result.matched);
    }

    #[test]
    fn test_stdout_hints_only_without_stderr() {
        let stdout = "Unhandled exception. Could not load file or assembly 'Newtonsoft.Json'";
        let result = classify_failure(stdout, "", &FailureRules::csharp());
        assert_eq!(
            result.message,
            format!("{} A required assembly could not be found.", NO_RESULTS_MESSAGE)
        );

        let result = classify_failure(stdout, "noise", &FailureRules::csharp());
        assert_eq!(result.message, NO_RESULTS_MESSAGE);
    }

    #[test]
    fn test_csharp_syntax_hint() {
        let stdout = "Build FAILED.\nSyntax error in UserSolution.cs";
        let result = classify_failure(stdout, "", &FailureRules::csharp());

        assert_eq!(
            result.message,
            format!("{} There is a syntax error in the code.", NO_RESULTS_MESSAGE)
        );
        assert!(!result.matched);
    }

    #[test]
    fn test_typescript_hints() {
        let result = classify_failure("Cannot find module './solution'", "", &FailureRules::typescript());
        assert!(result.message.ends_with(" A required module could not be found."));

        let result = classify_failure("SyntaxError: Unexpected token", "", &FailureRules::typescript());
        assert!(result.message.ends_with(" There is a syntax error in the code."));
    }

    #[test]
    fn test_go_and_python_ignore_stdout() {
        let result = classify_failure("SyntaxError: bad", "", &FailureRules::python());
        assert_eq!(result.message, NO_RESULTS_MESSAGE);
    }
}
