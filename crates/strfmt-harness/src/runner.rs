//! Test execution engine.

use strfmt_core::{BufferAllocator, SystemAllocator, format_string_in, measure};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Runs a fixture set and collects verification results.
pub struct TestRunner<A = SystemAllocator> {
    /// Name of the test campaign.
    pub campaign: String,
    allocator: A,
}

impl TestRunner {
    /// Create a new test runner backed by the system allocator.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self::with_allocator(campaign, SystemAllocator)
    }
}

impl<A: BufferAllocator> TestRunner<A> {
    /// Create a runner that formats through `allocator`.
    #[must_use]
    pub fn with_allocator(campaign: impl Into<String>, allocator: A) -> Self {
        Self {
            campaign: campaign.into(),
            allocator,
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| self.run_case(case))
            .collect()
    }

    /// Render one case and compare it with the expected output.
    ///
    /// A case also fails when the produced length disagrees with the
    /// measuring pass, even if the text matches.
    pub fn run_case(&self, case: &FixtureCase) -> VerificationResult {
        let args = case.format_args();
        let measured_len = measure(&case.template, &args);
        let (actual, mut notes) = match format_string_in(&self.allocator, &case.template, &args) {
            Ok(out) => {
                let mut notes = Vec::new();
                if out.len() != measured_len {
                    notes.push(format!(
                        "length mismatch: measured={measured_len}, produced={}",
                        out.len()
                    ));
                }
                (out.to_string_lossy().into_owned(), notes)
            }
            Err(err) => (format!("error:{err}"), Vec::new()),
        };

        let passed = actual == case.expected_output && notes.is_empty();
        let diff = if actual != case.expected_output {
            notes.insert(0, diff::render_diff(&case.expected_output, &actual));
            Some(notes.join("\n"))
        } else if !notes.is_empty() {
            Some(notes.join("\n"))
        } else {
            None
        };

        VerificationResult {
            case_name: case.name.clone(),
            spec_section: case.spec_section.clone(),
            passed,
            expected: case.expected_output.clone(),
            actual,
            measured_len,
            diff,
        }
    }
}
