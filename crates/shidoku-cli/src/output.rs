//! Text rendering of pipeline results

use crossterm::style::Stylize;
use shidoku_core::{CandidateRecord, Classification, PipelineReport, TraceReport};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(48));
    println!("{}", title.bold());
    println!("{}", "=".repeat(48));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{}:", key), value);
}

pub fn print_report(report: &PipelineReport, trace_limit: usize) {
    print_section("4x4 Sudoku symmetry classes");
    print_kv("complete grids", &report.solution_count.to_string());
    print_kv("relabel-only classes", &report.relabel_class_count.to_string());
    print_kv("full-symmetry classes", &report.full_class_count.to_string());
    if report.verified {
        print_kv("invariants", "verified");
    }

    print_section("Relabel-only representatives");
    for (i, class) in report.relabel_classes.iter().enumerate() {
        println!("  [{:2}] {}  ({} grids)", i, class.key, class.size);
    }

    print_section("Full-symmetry classes");
    for class in &report.full_classes {
        println!("  {}  ({} grids)", class.key.to_string().green(), class.size);
        println!("{}", indent(&class.key.grid().to_string(), 4));
        for relabel in &class.relabel_classes {
            println!("    absorbs {}", relabel);
        }
    }

    if let Some(trace) = &report.trace {
        print_trace(trace, trace_limit);
    }
}

pub fn print_trace(trace: &TraceReport, limit: usize) {
    print_section(&format!(
        "Canonicalization trace of representative {}",
        trace.index
    ));
    println!("{}", indent(&trace.representative.to_string(), 2));
    print_kv("candidates", &trace.candidates.len().to_string());
    print_kv("canonical key", &trace.best.to_string());
    println!();

    let mut shown = 0;
    for record in &trace.candidates {
        if shown < limit || record.is_best {
            println!("{}", format_candidate(record));
            shown += 1;
        }
    }
    let hidden = trace.candidates.len().saturating_sub(shown);
    if hidden > 0 {
        println!("  ... {} more candidates", hidden);
    }
}

pub fn print_classification(c: &Classification) {
    print_section("Classification");
    println!("{}", indent(&c.grid.to_string(), 2));
    print_kv("grid", &c.grid.serialize());
    print_kv("relabel-only key", &c.relabel_key.to_string());
    print_kv("full-symmetry key", &c.full_key.to_string());
}

fn format_candidate(record: &CandidateRecord) -> String {
    let line = format!(
        "  {:<26} {}  {}",
        record.geometry, record.permutation, record.serialized
    );
    if record.is_best {
        format!("{}  {}", line.green().bold(), "<- best".green())
    } else {
        line
    }
}

fn indent(block: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    block
        .lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
