//! Per-case verdicts and their roll-up.

use serde::{Deserialize, Serialize};

/// Outcome of rendering one fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    /// C standard section the case exercises.
    pub spec_section: String,
    /// Text and length both matched.
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    /// Length reported by the measuring pass.
    pub measured_len: usize,
    /// Present for failures, and for passes that carried notes.
    pub diff: Option<String>,
}

/// Counts over a verification run, plus the individual results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failing results in run order.
    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool) -> VerificationResult {
        VerificationResult {
            case_name: name.to_string(),
            spec_section: String::new(),
            passed,
            expected: String::new(),
            actual: String::new(),
            measured_len: 0,
            diff: None,
        }
    }

    #[test]
    fn summary_counts_and_lists_failures() {
        let summary = VerificationSummary::from_results(vec![
            result("a", true),
            result("b", false),
            result("c", true),
            result("d", false),
        ]);
        assert_eq!((summary.total, summary.passed, summary.failed), (4, 2, 2));
        assert!(!summary.all_passed());
        let names: Vec<_> = summary.failures().map(|r| r.case_name.as_str()).collect();
        assert_eq!(names, ["b", "d"]);
    }

    #[test]
    fn empty_run_passes() {
        let summary = VerificationSummary::from_results(Vec::new());
        assert!(summary.all_passed());
        assert_eq!(summary.failures().count(), 0);
    }
}
