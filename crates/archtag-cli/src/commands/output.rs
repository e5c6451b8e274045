//! Shared output formatting for results.

use anyhow::Result;
use archtag::{BatchReport, FileStatus, ResolvedArchitecture, Severity};

use crate::OutputFormat;

/// Print a batch report in the specified format.
pub fn print_report(report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &BatchReport) {
    for result in &report.results {
        if result.status == FileStatus::Pass && result.overridden_count == 0 {
            continue;
        }
        let status = match result.status {
            FileStatus::Fail => "\x1b[31mfail\x1b[0m",
            FileStatus::Warn => "\x1b[33mwarn\x1b[0m",
            FileStatus::Pass => "\x1b[32mpass\x1b[0m",
        };
        println!(
            "{} [{}] {}",
            status,
            result.arch_id.as_deref().unwrap_or("untagged"),
            result.file.display()
        );
        for v in result.violations.iter().chain(&result.warnings) {
            for line in v.format().lines() {
                println!("  {line}");
            }
        }
        if result.overridden_count > 0 {
            println!("  ({} overridden)", result.overridden_count);
        }
        if let Some(debt) = result.override_debt {
            println!(
                "  \x1b[33moverride debt: {} active, limit {}\x1b[0m",
                debt.active, debt.limit
            );
        }
        println!();
    }

    let summary_color = if report.failed > 0 {
        "\x1b[31m"
    } else if report.warned > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    println!("{}{}\x1b[0m", summary_color, report.summary());
}

fn print_compact(report: &BatchReport) {
    for result in &report.results {
        for v in result.violations.iter().chain(&result.warnings) {
            let (line, column) = v
                .location
                .as_ref()
                .map_or((1, 1), |loc| (loc.line, loc.column));
            let severity = match v.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!(
                "{}:{}:{}: {} [{}] {}",
                result.file.display(),
                line,
                column,
                severity,
                v.key,
                v.message,
            );
        }
    }
}

/// Print a resolved architecture in the specified format.
pub fn print_resolved(resolved: &ResolvedArchitecture, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(resolved)?),
        OutputFormat::Compact => {
            for c in &resolved.constraints {
                println!("{}", c.key);
            }
        }
        OutputFormat::Text => {
            println!("{}", resolved.arch_id);
            if let Some(description) = &resolved.description {
                println!("  {description}");
            }
            println!("  chain:  {}", resolved.chain.join(" -> "));
            if !resolved.applied_mixins.is_empty() {
                println!("  mixins: {}", resolved.applied_mixins.join(", "));
            }
            if resolved.singleton {
                println!("  singleton");
            }
            println!("\nConstraints:");
            for c in &resolved.constraints {
                println!(
                    "  {:<8} {:<40} (from {})",
                    c.constraint.severity.to_string(),
                    c.key,
                    c.source
                );
                if let Some(why) = &c.constraint.why {
                    println!("           why: {why}");
                }
            }
            if !resolved.hints.is_empty() {
                println!("\nHints:");
                for hint in &resolved.hints {
                    println!("  - {hint}");
                }
            }
        }
    }
    Ok(())
}
