//! Testing-guide checklist rendering.
//!
//! A fixed three-level hierarchy (section → subsection → item) maps each
//! item to the rule ids that cover it. Rendering walks the hierarchy once
//! against a run report, marking every item as clear, flagged, or needing
//! manual review, and collects a flat numbered list of all findings.

use crate::core::Finding;
use crate::runner::RunReport;
use std::fmt::Write;

pub struct ChecklistItem {
    pub id: &'static str,
    pub title: &'static str,
    /// Rule ids covering this item; empty means no automated coverage.
    pub rules: &'static [&'static str],
}

pub struct ChecklistSubsection {
    pub id: &'static str,
    pub title: &'static str,
    pub items: &'static [ChecklistItem],
}

pub struct ChecklistSection {
    pub title: &'static str,
    pub subsections: &'static [ChecklistSubsection],
}

macro_rules! item {
    ($id:literal, $title:literal, [$($rule:literal),*]) => {
        ChecklistItem { id: $id, title: $title, rules: &[$($rule),*] }
    };
}

pub static TESTING_GUIDE: &[ChecklistSection] = &[
    ChecklistSection {
        title: "1. Testing Arithmetic Operation and Conversion",
        subsections: &[
            ChecklistSubsection {
                id: "1.1",
                title: "Integer Overflow and Underflow",
                items: &[
                    item!("1.1.1", "Solidity compiler version 0.8.0 and higher", []),
                    item!("1.1.2", "Solidity compiler version 0.8.0 and below", []),
                ],
            },
            ChecklistSubsection {
                id: "1.2",
                title: "Precision Loss",
                items: &[
                    item!("1.2.1", "The rounding down of the division", []),
                    item!("1.2.2", "The order of division and multiplication", ["divide-before-multiply"]),
                ],
            },
            ChecklistSubsection {
                id: "1.3",
                title: "Type conversion",
                items: &[
                    item!("1.3.1", "The change of size (Same type with different size conversion)", ["explicit-type-conversion"]),
                    item!("1.3.2", "The change of type (Different types with the same size conversion)", []),
                    item!("1.3.3", "The change of sign (Different sign conversion)", []),
                ],
            },
        ],
    },
    ChecklistSection {
        title: "2. Testing Contract Compiling",
        subsections: &[
            ChecklistSubsection {
                id: "2.1",
                title: "Contract dependency",
                items: &[
                    item!("2.1.1", "Contract implementation should comply with the standards specification", ["erc20-interface", "erc721-interface", "common-standard-token"]),
                    item!("2.1.2", "Built-in symbols should not be shadowed", ["shadowing-builtin", "shadowing-abstract", "shadowing-state"]),
                ],
            },
            ChecklistSubsection {
                id: "2.2",
                title: "Solidity",
                items: &[
                    item!("2.2.1", "Solidity compiler version should be specific", ["floating-pragma-version"]),
                    item!("2.2.2", "State and function visibility should be explicitly labeled", ["inexplicit-variable-visibility"]),
                    item!("2.2.3", "Functions that are never called internally should not have public visibility", ["external-function"]),
                ],
            },
        ],
    },
    ChecklistSection {
        title: "3. Testing External Interaction",
        subsections: &[ChecklistSubsection {
            id: "3.1",
            title: "Invoking external calls",
            items: &[
                item!("3.1.1", "Unknown external components should not be invoked", ["unknown-external-functions"]),
                item!("3.1.2", "Delegatecall should not be used on untrusted contracts", ["controlled-delegatecall"]),
                item!("3.1.3", "Invoke function with \"this\" keyword should be used with caution", ["this-usage", "var-read-using-this"]),
            ],
        }],
    },
    ChecklistSection {
        title: "4. Testing Privilege Function",
        subsections: &[ChecklistSubsection {
            id: "4.1",
            title: "Privilege functions",
            items: &[
                item!("4.1.1", "State variables should not be unfairly controlled by privileged accounts", ["centralized-state"]),
                item!("4.1.2", "Privileged functions or modifications of critical states should be logged", ["insufficient-logging"]),
            ],
        }],
    },
    ChecklistSection {
        title: "5. Testing Control Flow",
        subsections: &[
            ChecklistSubsection {
                id: "5.1",
                title: "Reentrancy",
                items: &[item!("5.1.1", "Reentrant calling should not negatively affect the contract states", ["reentrancy-eth", "reentrancy-no-eth"])],
            },
            ChecklistSubsection {
                id: "5.2",
                title: "Input validation",
                items: &[item!("5.2.1", "Lack of input validation", ["missing-zero-check"])],
            },
        ],
    },
    ChecklistSection {
        title: "6. Testing Access Control",
        subsections: &[
            ChecklistSubsection {
                id: "6.1",
                title: "Contract's authentication",
                items: &[
                    item!("6.1.1", "tx.origin should not be used for authentication", ["tx-origin"]),
                    item!("6.1.2", "Authentication measures must be able to correctly identify the user", []),
                ],
            },
            ChecklistSubsection {
                id: "6.2",
                title: "Contract's authorization",
                items: &[
                    item!("6.2.1", "The roles are well defined and enforced", []),
                    item!("6.2.2", "The roles can be safely transferred", []),
                    item!("6.2.3", "Least privilege principle should be used for the rights of each role", []),
                ],
            },
            ChecklistSubsection {
                id: "6.3",
                title: "Signature verification",
                items: &[item!("6.3.1", "Signed signature should be used properly", [])],
            },
            ChecklistSubsection {
                id: "6.4",
                title: "Access control on critical function",
                items: &[item!("6.4.1", "The critical function should enforce an access control", [])],
            },
        ],
    },
    ChecklistSection {
        title: "7. Testing Randomness",
        subsections: &[
            ChecklistSubsection {
                id: "7.1",
                title: "External Source",
                items: &[
                    item!("7.1.1", "VRF", []),
                    item!("7.1.2", "Provenance hash", []),
                ],
            },
            ChecklistSubsection {
                id: "7.2",
                title: "Internal Source",
                items: &[item!("7.2.1", "Future block hash", [])],
            },
        ],
    },
    ChecklistSection {
        title: "8. Testing Loop Operation",
        subsections: &[
            ChecklistSubsection {
                id: "8.1",
                title: "Block gas limit",
                items: &[item!("8.1.1", "Gas cost could exceed the block limit from loop operations", ["costly-loop"])],
            },
            ChecklistSubsection {
                id: "8.2",
                title: "Reusing msg.value",
                items: &[item!("8.2.1", "Improper using msg.value in a loop", ["msg-value-loop"])],
            },
            ChecklistSubsection {
                id: "8.3",
                title: "Unexpected revert inside loop",
                items: &[item!("8.3.1", "Using multiple external calls in a loop", ["loop-reverted", "calls-loop"])],
            },
            ChecklistSubsection {
                id: "8.4",
                title: "Using flow control expressions over loop execution",
                items: &[item!("8.4.1", "Control flow operator skips a crucial part of code", ["loop-skip"])],
            },
            ChecklistSubsection {
                id: "8.5",
                title: "Inconsistent loop iterator",
                items: &[
                    item!("8.5.1", "Having multiple expression that alter the same iterator of the loop", ["dirty-iterators"]),
                    item!("8.5.2", "Variable loop boundary", ["state-changing-loop"]),
                ],
            },
        ],
    },
    ChecklistSection {
        title: "9. Testing Contract Upgradability",
        subsections: &[
            ChecklistSubsection {
                id: "9.1",
                title: "Identify an upgradability in contract",
                items: &[
                    item!("9.1.1", "Identify a delegatecall instruction that could lead to the contract upgradability", ["controlled-delegatecall"]),
                    item!("9.1.2", "Identify a selfdestruct instruction that could lead to the contract upgradability", ["suicidal"]),
                    item!("9.1.3", "The initialize function implementation", []),
                    item!("9.1.4", "The initialize function could only be executed once by the authorized party", ["unsafe-initiate"]),
                ],
            },
            ChecklistSubsection {
                id: "9.2",
                title: "Upgradable proxy contract pitfalls",
                items: &[item!("9.2.1", "Storage slot allocation should not conflict", [])],
            },
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Covered by at least one executed rule, nothing found.
    Clear,
    /// At least one covering rule reported findings.
    Flagged,
    /// No covering rule ran; needs manual review.
    Manual,
}

impl ItemStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            ItemStatus::Clear => "\u{2705}",
            ItemStatus::Flagged => "\u{1F50E}",
            ItemStatus::Manual => "\u{2757}",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            ItemStatus::Clear => "No issues found",
            ItemStatus::Flagged => "Found some issues. Please look at the full result",
            ItemStatus::Manual => "There are no supported detectors",
        }
    }
}

fn item_status<'r>(item: &ChecklistItem, report: &'r RunReport) -> (ItemStatus, Vec<&'r Finding>) {
    let ran: Vec<&str> = item
        .rules
        .iter()
        .copied()
        .filter(|id| report.entries().iter().any(|e| e.rule_id == *id))
        .collect();
    if ran.is_empty() {
        return (ItemStatus::Manual, Vec::new());
    }
    let findings: Vec<&Finding> = ran.iter().flat_map(|id| report.by_rule(id)).collect();
    if findings.is_empty() {
        (ItemStatus::Clear, findings)
    } else {
        (ItemStatus::Flagged, findings)
    }
}

fn finding_line(finding: &Finding) -> String {
    let summary = finding
        .description()
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .trim_start_matches("- ")
        .to_string();
    match finding.first_element() {
        Some(e) => match e.source_mapping.first_line() {
            Some(line) => format!("{} ({}#L{})", summary, e.source_mapping.filename_short, line),
            None => summary,
        },
        None => summary,
    }
}

/// Render the checklist walk as indented text with markers and the flat
/// numbered list of everything detected.
pub fn render_checklist(report: &RunReport) -> String {
    let mut out = String::new();
    let mut total = 0usize;
    let mut detected: Vec<String> = Vec::new();

    for section in TESTING_GUIDE {
        let _ = writeln!(out, "{}", section.title);
        let mut count = 0usize;
        for subsection in section.subsections {
            let _ = writeln!(out, "\t{} {}", subsection.id, subsection.title);
            for item in subsection.items {
                let (status, findings) = item_status(item, report);
                let _ = writeln!(out, "\t  {} {} {}", status.marker(), item.id, item.title);
                match status {
                    ItemStatus::Manual => {
                        count += 1;
                        let _ = writeln!(
                            out,
                            "\t- [ ] Checked ( There are no supported detectors at the moment. Please manually audit. )"
                        );
                    }
                    ItemStatus::Clear => {
                        let _ = writeln!(out, "\t( No issue found )");
                    }
                    ItemStatus::Flagged => {
                        for finding in findings {
                            count += 1;
                            total += 1;
                            let line = finding_line(finding);
                            let _ = writeln!(out, "\t- [ ] (IDX-{}) {}", total, line);
                            detected.push(format!(
                                "- [ ] (IDX-{}) {} {} | {}",
                                total, item.id, item.title, line
                            ));
                        }
                    }
                }
                out.push('\n');
            }
        }
        let _ = writeln!(out, "There are {} issue(s) need to be addressed", count);
        let _ = writeln!(out, "---\n");
    }

    let _ = writeln!(out, "## All detected issues\n");
    for line in detected {
        let _ = writeln!(out, "{}", line);
    }
    out
}

fn csv_quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// The same walk rendered as CSV rows: one sheet of checklist state, one of
/// detected issues.
pub fn render_checklist_csv(report: &RunReport) -> String {
    let mut out = String::from("Testing-ID,Title,Checked,Notes\n");
    let mut issues: Vec<(usize, String, String)> = Vec::new();
    let mut total = 0usize;

    for section in TESTING_GUIDE {
        let _ = writeln!(out, "{},,,", csv_quote(section.title));
        for subsection in section.subsections {
            let _ = writeln!(out, "{},{},,", subsection.id, csv_quote(subsection.title));
            for item in subsection.items {
                let (status, findings) = item_status(item, report);
                let _ = writeln!(
                    out,
                    "{},{},{},{}",
                    item.id,
                    csv_quote(item.title),
                    status.marker(),
                    csv_quote(status.note())
                );
                for finding in findings {
                    total += 1;
                    issues.push((
                        total,
                        format!("{} {}", item.id, item.title),
                        finding_line(finding),
                    ));
                }
            }
        }
    }

    out.push('\n');
    out.push_str("ID,Standard,Issue,Checked\n");
    for (idx, standard, issue) in issues {
        let _ = writeln!(out, "IDX-{},{},{},", idx, csv_quote(&standard), csv_quote(&issue));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Confidence, Impact, Rule, RuleConfig};
    use crate::ir::{AnalysisUnit, Contract};
    use crate::runner::{RuleEngine, RuleRegistry};

    struct OneHit;

    impl Rule for OneHit {
        fn id(&self) -> &'static str {
            "loop-skip"
        }
        fn impact(&self) -> Impact {
            Impact::Medium
        }
        fn confidence(&self) -> Confidence {
            Confidence::Medium
        }
        fn detect(
            &self,
            _: &AnalysisUnit,
            _: &RuleConfig,
        ) -> anyhow::Result<Vec<crate::core::Finding>> {
            Ok(vec![crate::core::Finding::new(
                "loop-skip",
                Impact::Medium,
                Confidence::Medium,
            )
            .with_text("return inside loop")])
        }
    }

    struct Quiet;

    impl Rule for Quiet {
        fn id(&self) -> &'static str {
            "dirty-iterators"
        }
        fn impact(&self) -> Impact {
            Impact::Medium
        }
        fn confidence(&self) -> Confidence {
            Confidence::Low
        }
        fn detect(
            &self,
            _: &AnalysisUnit,
            _: &RuleConfig,
        ) -> anyhow::Result<Vec<crate::core::Finding>> {
            Ok(Vec::new())
        }
    }

    fn report() -> RunReport {
        let mut registry = RuleRegistry::new();
        registry.register(OneHit);
        registry.register(Quiet);
        let engine = RuleEngine::new(registry, RuleConfig::default().sequential());
        engine
            .run(&AnalysisUnit::new(vec![Contract::new("C")]))
            .unwrap()
    }

    #[test]
    fn test_markers_reflect_rule_state() {
        let text = render_checklist(&report());
        // 8.4.1 is covered by loop-skip which fired.
        assert!(text.contains("\u{1F50E} 8.4.1"));
        // 8.5.1 is covered by dirty-iterators which ran clean.
        assert!(text.contains("\u{2705} 8.5.1"));
        // 7.1.1 has no detector at all.
        assert!(text.contains("\u{2757} 7.1.1"));
        assert!(text.contains("(IDX-1) return inside loop"));
    }

    #[test]
    fn test_csv_rows() {
        let csv = render_checklist_csv(&report());
        assert!(csv.starts_with("Testing-ID,Title,Checked,Notes\n"));
        assert!(csv.contains("8.4.1,Control flow operator skips a crucial part of code,\u{1F50E}"));
        assert!(csv.contains("IDX-1,8.4.1 Control flow operator skips a crucial part of code,return inside loop,"));
    }
}
