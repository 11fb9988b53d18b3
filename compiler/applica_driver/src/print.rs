//! Prints reports to the console.

use applica_diagnostic::{Diagnostic, Severity};
use colored::{ColoredString, Colorize};

use crate::{Report, SiteReport};

fn header(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "[error]:".bright_red().bold(),
        Severity::Warning => "[warning]:".yellow().bold(),
        Severity::Info => "[info]:".bright_green().bold(),
    }
}

/// Prints a log message to the standard error stream.
pub fn log(severity: Severity, message: &str) {
    eprintln!("{} {}", header(severity), message.bold());
}

fn diagnostic(diagnostic: &Diagnostic) {
    println!(
        "{} {}",
        header(diagnostic.severity),
        diagnostic.message.bold()
    );

    for related in &diagnostic.related {
        println!("  {} {related}", "= note:".bright_cyan().bold());
    }

    if let Some(help_message) = &diagnostic.help_message {
        println!("  {} {help_message}", "= help:".bright_green().bold());
    }

    println!();
}

fn site(report: &SiteReport) {
    if report.diagnostics.is_empty() {
        return;
    }

    println!("{} {}", "-->".bright_cyan().bold(), report.site);

    for x in &report.diagnostics {
        diagnostic(x);
    }
}

/// Prints every diagnostic of the report followed by a summary.
pub fn report(report: &Report) {
    for x in &report.kinds {
        diagnostic(x);
    }

    for x in &report.sites {
        site(x);
    }

    let errors = report.error_count();
    let summary = format!(
        "checked {} site(s): {errors} error(s), {} warning(s)",
        report.sites.len(),
        report.count(Severity::Warning)
    );

    if errors == 0 {
        log(Severity::Info, &summary);
    } else {
        log(Severity::Error, &summary);
    }
}
