//! Lint ARSDK schema files: bitfield widths, sentinel relocation, identifier collisions,
//! missing docs.
//!
//! Usage:
//!   lint_schema [OPTIONS] [FILE.schema ...]
//!   lint_schema < file.schema
//!
//! Options:
//!   --human, -H  Human-readable output
//!
//! If no files are given, reads from stdin. Exits with 1 when any file fails to parse or
//! has error-level findings.

use arsdkgen::lint::{lint, LintMessage, LintRule, Severity};
use arsdkgen::parse;
use std::io::{self, Read};
use std::path::Path;

fn rule_id(rule: LintRule) -> &'static str {
    match rule {
        LintRule::BitfieldWidthDiscrepancy => "bitfield-width-discrepancy",
        LintRule::BitfieldTooWide => "bitfield-too-wide",
        LintRule::BitfieldStorageTooNarrow => "bitfield-storage-too-narrow",
        LintRule::SentinelRelocated => "sentinel-relocated",
        LintRule::IdentifierCollision => "identifier-collision",
        LintRule::MissingDoc => "missing-doc",
    }
}

fn print_message(file: &str, m: &LintMessage, style: OutputStyle) {
    let severity_str = match m.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    match style {
        OutputStyle::Compact => {
            println!(
                "{}:{}: {}: {} [{}]",
                file,
                m.path,
                severity_str,
                m.message,
                rule_id(m.rule)
            );
        }
        OutputStyle::Human => {
            println!("  {} {}: {}", file, m.path, m.message);
            println!("    {}: {}", severity_str, rule_id(m.rule));
        }
    }
}

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

#[derive(Default)]
struct Totals {
    errors: usize,
    warnings: usize,
    failed: bool,
}

fn lint_source(file: &str, src: &str, style: OutputStyle, totals: &mut Totals) {
    let schema = match parse(src) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", file, e);
            totals.failed = true;
            return;
        }
    };
    let messages = lint(&schema);
    for m in &messages {
        match m.severity {
            Severity::Error => totals.errors += 1,
            Severity::Warning => totals.warnings += 1,
        }
        print_message(file, m, style);
    }
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let style = if let Some(pos) = args.iter().position(|a| a == "--human" || a == "-H") {
        args.remove(pos);
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };

    let mut totals = Totals::default();
    if args.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        lint_source("<stdin>", &src, style, &mut totals);
    } else {
        for path in &args {
            let path = Path::new(path);
            match std::fs::read_to_string(path) {
                Ok(src) => lint_source(&path.display().to_string(), &src, style, &mut totals),
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    totals.failed = true;
                }
            }
        }
    }

    if totals.errors > 0 || totals.warnings > 0 {
        eprintln!("lint: {} error(s), {} warning(s)", totals.errors, totals.warnings);
    }
    if totals.failed || totals.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
