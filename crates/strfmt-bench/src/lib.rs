//! Shared workloads for the strfmt benchmarks.

use strfmt_core::FormatArg;

/// A named template with its arguments.
pub struct Workload {
    pub name: &'static str,
    pub template: &'static str,
    pub args: Vec<FormatArg<'static>>,
}

/// Templates representative of log lines, short labels and numeric output.
#[must_use]
pub fn workloads() -> Vec<Workload> {
    vec![
        Workload {
            name: "literal",
            template: "no directives at all in this template",
            args: vec![],
        },
        Workload {
            name: "label",
            template: "%s-%d",
            args: vec![FormatArg::from("worker"), FormatArg::from(17)],
        },
        Workload {
            name: "log_line",
            template: "[%08x] %-12s %5d bytes in %.3f ms",
            args: vec![
                FormatArg::from(0xdead_beef_u32),
                FormatArg::from("read"),
                FormatArg::from(4096),
                FormatArg::from(0.734),
            ],
        },
        Workload {
            name: "floats",
            template: "%e %g %a",
            args: vec![
                FormatArg::from(6.02214076e23),
                FormatArg::from(0.000123),
                FormatArg::from(1.0 / 3.0),
            ],
        },
    ]
}
