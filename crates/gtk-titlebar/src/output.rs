//! Rendering propagation reports.

use std::io::{self, Write};

use console::style;
use gtk_titlebar_core::{PropagationReport, WindowStatus};

use crate::cli::OutputFormat;

pub fn write_report<W: Write + ?Sized>(
    out: &mut W,
    report: &PropagationReport,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            writeln!(out, "{}", json)
        }
        OutputFormat::Text => write_text(out, report),
    }
}

fn write_text<W: Write + ?Sized>(out: &mut W, report: &PropagationReport) -> io::Result<()> {
    let tagged = report.tagged().count();
    writeln!(
        out,
        "Applied {} to {} of {} windows ({} editor processes)",
        style(report.variant).bold(),
        tagged,
        report.windows.len(),
        report.processes.len()
    )?;

    for outcome in &report.windows {
        let owner = outcome
            .owner
            .map(|pid| format!("pid {}", pid))
            .unwrap_or_else(|| "unknown owner".to_string());
        match &outcome.status {
            WindowStatus::Tagged => {
                writeln!(out, "  {} {} ({})", style("✓").green(), outcome.window, owner)?
            }
            WindowStatus::ForeignOwner => writeln!(
                out,
                "  {} {} ({}, not the editor)",
                style("·").dim(),
                outcome.window,
                owner
            )?,
            WindowStatus::UnknownOwner { reason } => writeln!(
                out,
                "  {} {} ({}: {})",
                style("?").yellow(),
                outcome.window,
                owner,
                reason
            )?,
            WindowStatus::Failed { error } => writeln!(
                out,
                "  {} {} ({}): {}",
                style("✗").red(),
                outcome.window,
                owner,
                error
            )?,
        }
    }

    for warning in &report.warnings {
        writeln!(out, "{} {}", style("warning:").yellow().bold(), warning)?;
    }

    Ok(())
}
