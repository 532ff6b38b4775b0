//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, services talk to ports only, infra never prints.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` item.
///
/// Braces inside string and char literals or after `//` are not counted. A
/// gated item without a body (`#[cfg(test)] mod x;`) ends at its `;`.
struct CfgTestTracker {
    in_test_block: bool,
    awaiting_body: bool,
    in_string: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            awaiting_body: false,
            in_string: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if any part of it is test-only.
    fn process_line(&mut self, line: &str) -> bool {
        let mut touched = self.in_test_block;
        if !self.in_string && line.trim().starts_with("#[cfg(test)]") {
            self.in_test_block = true;
            self.awaiting_body = true;
            self.test_block_start_depth = self.brace_depth;
            touched = true;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if self.in_string {
                match ch {
                    '\\' => i += 1,
                    '"' => self.in_string = false,
                    _ => {}
                }
                i += 1;
                continue;
            }
            match ch {
                '/' if chars.get(i + 1) == Some(&'/') => break,
                '"' => self.in_string = true,
                '\'' => i += char_literal_len(&chars[i..]).saturating_sub(1),
                '{' => {
                    self.brace_depth += 1;
                    self.awaiting_body = false;
                }
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                ';' if self.in_test_block
                    && self.awaiting_body
                    && self.brace_depth == self.test_block_start_depth =>
                {
                    self.in_test_block = false;
                    self.awaiting_body = false;
                }
                _ => {}
            }
            i += 1;
        }
        touched || self.in_test_block
    }
}

/// Length of a char literal starting at `chars[0] == '\''`, or 1 for a lifetime.
fn char_literal_len(chars: &[char]) -> usize {
    match chars {
        ['\'', '\\', rest @ ..] => rest
            .iter()
            .skip(1)
            .position(|&c| c == '\'')
            .map_or(1, |p| p + 4),
        ['\'', _, '\'', ..] => 3,
        _ => 1,
    }
}

/// Non-comment lines outside `#[cfg(test)]` items, with 1-based line numbers.
fn production_lines_of(content: &str) -> Vec<(usize, String)> {
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            let comment = trimmed.starts_with("//") || trimmed.starts_with("/*");
            (!in_test && !comment).then(|| (i + 1, line.to_string()))
        })
        .collect()
}

fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    // test_support.rs is itself gated behind #[cfg(test)] in services/mod.rs.
    if path.ends_with("test_support.rs") {
        return Vec::new();
    }
    production_lines_of(&content)
}

fn src_dir(parts: &[&str]) -> PathBuf {
    parts
        .iter()
        .fold(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), |p, part| {
            p.join(part)
        })
}

/// Report every production line under `dir` containing one of `forbidden`.
fn scan(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    violations.push(format!("{rel}:{lineno}: `{pattern}`: {line}"));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_io_layers() {
    let violations = scan(
        &src_dir(&["domain"]),
        &[
            "crate::infra",
            "crate::application",
            "crate::output",
            "tokio::",
            "std::fs",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_depends_only_on_domain_and_ports() {
    let violations = scan(
        &src_dir(&["application"]),
        &["crate::infra", "crate::output", "crate::cli", "std::fs"],
    );
    assert!(
        violations.is_empty(),
        "application/ must go through port traits:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_output() {
    let violations = scan(&src_dir(&["infra"]), &["crate::output", "crate::cli"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from output/ or cli:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = scan(
        &src_dir(&["infra"]),
        &["println!", "eprintln!", "print!("],
    );
    assert!(
        violations.is_empty(),
        "infra/ reports through tracing, not stdout:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_adapters_in_service_signatures() {
    let concrete = ["TokioCommandRunner", "LocalSiteStore", "FlockRunLock"];
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir(&["application", "services"])) {
        for (lineno, line) in production_lines(&file) {
            if !line.contains("fn ") {
                continue;
            }
            for name in concrete {
                if line.contains(name) {
                    violations.push(format!("{}:{lineno}: {line}", file.display()));
                }
            }
        }
    }
    assert!(
        violations.is_empty(),
        "use trait bounds instead of concrete adapters:\n{}",
        violations.join("\n")
    );
}

#[test]
fn renderers_print_only_through_output_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir(&["output"])) {
        if file.ends_with("mod.rs") {
            continue;
        }
        for (lineno, line) in production_lines(&file) {
            if line.contains("println!") || line.contains("print!(") {
                violations.push(format!("{}:{lineno}: {line}", file.display()));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "renderers must print through OutputContext so --quiet applies:\n{}",
        violations.join("\n")
    );
}

// ── Scanner self-checks ───────────────────────────────────────────────────────

#[test]
fn tracker_ignores_braces_inside_string_literals() {
    let source = r#"
fn prod() {}

#[cfg(test)]
mod tests {
    fn fixture() -> &'static str {
        "emerg: unexpected \"}\""
    }

    fn after() {
        std::fs::write("x", "y");
    }
}

fn also_prod() {}
"#;
    let lines: Vec<String> = production_lines_of(source)
        .into_iter()
        .map(|(_, l)| l)
        .collect();
    assert!(lines.iter().any(|l| l.contains("fn prod")));
    assert!(lines.iter().any(|l| l.contains("fn also_prod")));
    assert!(
        !lines.iter().any(|l| l.contains("std::fs")),
        "test body leaked into production lines: {lines:?}"
    );
}

#[test]
fn tracker_ignores_brace_char_literals_and_comments() {
    let source = r#"
#[cfg(test)]
mod tests {
    // a stray } in a comment
    fn count(text: &str) -> usize { text.matches('}').count() }
    fn hidden() { std::fs::read("x"); }
}
fn prod() {}
"#;
    let lines: Vec<String> = production_lines_of(source)
        .into_iter()
        .map(|(_, l)| l)
        .collect();
    assert!(!lines.iter().any(|l| l.contains("std::fs")), "got: {lines:?}");
    assert!(lines.iter().any(|l| l.contains("fn prod")));
}

#[test]
fn tracker_ends_bodiless_test_item_at_semicolon() {
    let source = "#[cfg(test)]\npub(crate) mod test_support;\n\npub(crate) fn command_detail() {\n    std::fs::read(\"x\");\n}\n";
    let lines: Vec<String> = production_lines_of(source)
        .into_iter()
        .map(|(_, l)| l)
        .collect();
    assert!(!lines.iter().any(|l| l.contains("mod test_support")));
    assert!(lines.iter().any(|l| l.contains("fn command_detail")));
    assert!(lines.iter().any(|l| l.contains("std::fs")));
}
