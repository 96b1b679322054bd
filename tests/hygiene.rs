//! Hygiene: enforces coding standards at test time.
//!
//! Scans the library source tree for patterns that crash the process or drop
//! errors on the floor. Each pattern has a budget of zero. Test files
//! (`*_test.rs`) are exempt.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const PANICS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "propagate with ? or handle the None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "propagate with ? or handle the None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "return an error variant instead" },
    Budget { pattern: "unreachable!(", max: 0, why: "make the match exhaustive" },
    Budget { pattern: "todo!(", max: 0, why: "no stubs in the engine" },
    Budget { pattern: "unimplemented!(", max: 0, why: "no stubs in the engine" },
];

const SILENT_LOSS: &[Budget] = &[
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the value" },
    Budget { pattern: ".ok()", max: 0, why: "inspect or log the error" },
];

const STRUCTURE: &[Budget] = &[Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" }];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Budget violations as human-readable lines; empty when everything is within budget.
fn violations(files: &[SourceFile], budgets: &[Budget]) -> Vec<String> {
    let mut found = Vec::new();
    for budget in budgets {
        let hits: Vec<(&str, usize)> = files
            .iter()
            .map(|f| (f.path.as_str(), f.content.lines().filter(|l| l.contains(budget.pattern)).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        let count: usize = hits.iter().map(|(_, n)| n).sum();
        if count > budget.max {
            found.push(format!("{} budget exceeded: found {count}, max {} ({})", budget.pattern, budget.max, budget.why));
            found.extend(hits.iter().map(|(path, n)| format!("  {path}: {n}")));
        }
    }
    found
}

#[test]
fn source_tree_is_scanned() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the crate root");
}

#[test]
fn panic_budget() {
    let found = violations(&source_files(), PANICS);
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn silent_loss_budget() {
    let found = violations(&source_files(), SILENT_LOSS);
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn structure_budget() {
    let found = violations(&source_files(), STRUCTURE);
    assert!(found.is_empty(), "{}", found.join("\n"));
}
