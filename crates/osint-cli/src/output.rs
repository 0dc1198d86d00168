//! Rendering for `ScanEvent`s: machine-readable JSON, or a colored
//! human-readable summary line per event.

use clap::ValueEnum;
use colored::Colorize;
use osint_model::{LogLevel, RiskLevel, ScanEvent, Severity};

/// Output format for the `scan` command.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// One colored summary line per event.
    #[default]
    Human,
    /// One JSON object per event, newline-delimited.
    Json,
}

/// Render one event to stdout/stderr according to `format`.
pub fn print_event(format: OutputFormat, event: &ScanEvent) {
    match format {
        OutputFormat::Json => print_json(event),
        OutputFormat::Human => print_human(event),
    }
}

fn print_json(event: &ScanEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => eprintln!("{} failed to serialize event: {err}", "ERROR:".bright_red().bold()),
    }
}

fn print_human(event: &ScanEvent) {
    match event {
        ScanEvent::Start { depth, timestamp } => {
            println!(
                "{} scan started at depth {} ({})",
                "▶".bright_green().bold(),
                depth,
                timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        ScanEvent::Finding { finding } => {
            println!(
                "{} {} {} — {}",
                "finding".dimmed(),
                severity_badge(finding.severity()),
                finding.title().bold(),
                finding.source().bright_black()
            );
        }
        ScanEvent::Progress {
            progress,
            finding_count,
            elapsed_seconds,
        } => {
            println!(
                "{} {progress}% ({finding_count} findings, {elapsed_seconds:.1}s elapsed)",
                "progress".dimmed()
            );
        }
        ScanEvent::Log { level, message, .. } => {
            println!("{} {message}", log_badge(*level));
        }
        ScanEvent::Complete {
            scan_time_seconds,
            risk_score,
            risk_level,
            stats,
            ..
        } => {
            println!(
                "{} risk {} ({risk_score}/100), {} findings, {} usernames, {} accounts, {} breaches, {scan_time_seconds:.1}s",
                "✓ complete".bright_green().bold(),
                risk_badge(*risk_level),
                stats.finding_count,
                stats.username_count,
                stats.account_count,
                stats.breach_count
            );
        }
        ScanEvent::Timeout { scan_time_seconds, findings, .. } => {
            println!(
                "{} deadline reached after {scan_time_seconds:.1}s with {} findings collected",
                "⏱ timeout".bright_yellow().bold(),
                findings.len()
            );
        }
        ScanEvent::Error { error_kind, message } => {
            println!("{} [{error_kind}] {message}", "✗ error".bright_red().bold());
        }
    }
}

fn severity_badge(severity: Severity) -> String {
    match severity {
        Severity::Low => "LOW".dimmed().to_string(),
        Severity::Medium => "MEDIUM".yellow().to_string(),
        Severity::High => "HIGH".bright_red().to_string(),
        Severity::Critical => "CRITICAL".bright_red().bold().to_string(),
    }
}

fn risk_badge(level: RiskLevel) -> String {
    match level {
        RiskLevel::Low => "LOW".green().to_string(),
        RiskLevel::Medium => "MEDIUM".yellow().to_string(),
        RiskLevel::High => "HIGH".bright_red().to_string(),
        RiskLevel::Critical => "CRITICAL".bright_red().bold().to_string(),
    }
}

fn log_badge(level: LogLevel) -> String {
    match level {
        LogLevel::Info => "info".blue().to_string(),
        LogLevel::Success => "ok".green().to_string(),
        LogLevel::Warn => "warn".yellow().to_string(),
        LogLevel::Error => "error".bright_red().to_string(),
    }
}
