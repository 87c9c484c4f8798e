//! Output formatters for dashboard reports

use anyhow::Result;
use colored::*;
use sheetdash_core::views::{Breakdown, ViewReport};
use sheetdash_core::{DashboardReport, Notice, NoticeScope, ParseDiagnostics, Severity};

/// Print the report with colors, notices first and then every view
pub fn print_human(report: &DashboardReport) {
    println!("{}", format!("Dashboard: {}", report.document).bold());
    println!();

    let notices = report.notices.sorted();
    if !notices.is_empty() {
        let mut current: Option<&NoticeScope> = None;
        for notice in notices {
            if current != Some(&notice.scope) {
                print_scope_header(&notice.scope);
                current = Some(&notice.scope);
            }
            print_notice(notice, 1);
        }
        println!();
    }

    print_diagnostics(&report.diagnostics);

    for view in &report.views {
        print_view(view);
    }

    // Print summary
    let all = report
        .notices
        .iter()
        .chain(report.views.iter().flat_map(|v| v.notices.iter()));
    let (mut errors, mut warnings, mut info) = (0, 0, 0);
    for notice in all {
        match notice.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Info => info += 1,
        }
    }

    if errors + warnings + info == 0 {
        println!("{}", "✓ All sheets loaded".green().bold());
        return;
    }
    println!("{}", "Summary:".bold().underline());
    if errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), errors);
    }
    if warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), warnings);
    }
    if info > 0 {
        println!("  {} {}", "Info:".blue().bold(), info);
    }
}

fn print_scope_header(scope: &NoticeScope) {
    match scope {
        NoticeScope::Document => println!("{}", "Document:".bold().underline()),
        NoticeScope::Sheet(name) => println!("{} {}", "Sheet:".bold(), name.cyan().bold()),
        NoticeScope::View(id) => println!("{} {}", "View:".bold(), id.cyan().bold()),
    }
}

fn print_notice(notice: &Notice, indent: usize) {
    let indent_str = "  ".repeat(indent);
    let severity_str = match notice.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARN".yellow().bold(),
        Severity::Info => "INFO".blue().bold(),
    };
    println!("{}{} {}", indent_str, severity_str, notice.message);
}

fn print_diagnostics(diagnostics: &ParseDiagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    println!("{}", "Cells read as defaults:".bold().underline());
    for (column, count) in diagnostics.iter() {
        println!("  {} {}", column.bright_black(), count);
    }
    println!();
}

fn print_view(view: &ViewReport) {
    println!("{}", view.title.cyan().bold().underline());

    for notice in &view.notices {
        print_notice(notice, 1);
    }

    let width = view
        .metrics
        .iter()
        .map(|m| m.label.chars().count())
        .max()
        .unwrap_or(0);
    for metric in &view.metrics {
        println!(
            "  {:<width$}  {}",
            metric.label,
            metric.value.to_string().bold(),
            width = width
        );
    }

    for breakdown in &view.breakdowns {
        print_breakdown(breakdown);
    }
    println!();
}

fn print_breakdown(breakdown: &Breakdown) {
    println!();
    println!("  {}", breakdown.title.bold());
    let width = breakdown
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);
    for row in &breakdown.rows {
        println!("    {:<width$}  {}", row.label, row.value, width = width);
    }
}

/// JSON document printed by `--format json`
pub fn json_report(report: &DashboardReport) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(report)?)
}

/// Print the report in JSON format
pub fn print_json(report: &DashboardReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&json_report(report)?)?);
    Ok(())
}
