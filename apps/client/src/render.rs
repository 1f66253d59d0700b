//! Plain-text rendering of session state for the command line.

use std::fmt::Write;

use crate::models::{AiSuggestionResult, HistoryEntry, ScanResult};
use crate::session::Session;

/// Keyword lists longer than this are cut for display.
pub const KEYWORD_DISPLAY_LIMIT: usize = 80;

const BAR_WIDTH: usize = 20;

pub fn score_label(score: i32) -> &'static str {
    if score >= 80 {
        "Strong"
    } else if score >= 60 {
        "Good"
    } else if score >= 40 {
        "Fair"
    } else {
        "Low"
    }
}

pub fn clamp_score(score: i32) -> i32 {
    score.clamp(0, 100)
}

fn bar(score: i32) -> String {
    let filled = clamp_score(score) as usize * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn keyword_block(out: &mut String, title: &str, noun: &str, keywords: &[String]) {
    let _ = writeln!(out, "{title} ({})", keywords.len());
    if keywords.is_empty() {
        return;
    }
    let shown = &keywords[..keywords.len().min(KEYWORD_DISPLAY_LIMIT)];
    let _ = writeln!(out, "  {}", shown.join(", "));
    if keywords.len() > KEYWORD_DISPLAY_LIMIT {
        let _ = writeln!(
            out,
            "  Showing first {KEYWORD_DISPLAY_LIMIT} {noun} keywords."
        );
    }
}

pub fn render_scan(result: &ScanResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total Score    {:>3}/100 {} {} • {}/100",
        result.total_score,
        bar(result.total_score),
        score_label(result.total_score),
        result.total_score
    );
    let _ = writeln!(out, "Keyword Score  {:>3}/100", result.keyword_score);
    let _ = writeln!(out, "Section Score  {:>3}/100", result.section_score);

    if !result.section_checks.is_empty() {
        let _ = writeln!(out, "\nSection Checks");
        for (section, present) in &result.section_checks {
            let status = if *present { "Present" } else { "Missing" };
            let _ = writeln!(out, "  {section:<20} {status}");
        }
    }

    out.push('\n');
    keyword_block(&mut out, "Matched Keywords", "matched", &result.matched_keywords);
    keyword_block(&mut out, "Missing Keywords", "missing", &result.missing_keywords);

    if !result.suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggestions");
        for suggestion in &result.suggestions {
            let _ = writeln!(out, "  - {suggestion}");
        }
    }
    out
}

pub fn render_ai(report: &AiSuggestionResult) -> String {
    let mut out = String::new();
    if let Some(summary) = report.summary() {
        let _ = writeln!(out, "Improved Summary\n  {summary}");
    }
    for (title, items) in report.sections() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{title}");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }
    out
}

pub fn render_history(entries: &[HistoryEntry], limit: usize) -> String {
    if entries.is_empty() {
        return "No scans yet.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries.iter().take(limit) {
        let _ = writeln!(
            out,
            "{}  {:>3}/100 (kw {:>3}, sec {:>3})  {}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.total_score,
            entry.keyword_score,
            entry.section_score,
            entry.resume_filename.as_deref().unwrap_or("(unnamed)"),
            entry.id
        );
    }
    out
}

/// Everything the session currently has on display: scan result or error,
/// history-open error, AI report or error.
pub fn render_session(session: &Session) -> String {
    let mut out = String::new();

    if let Some(error) = session.scan_error() {
        let _ = writeln!(out, "Scan error: {error}");
    }
    if let Some(error) = session.history().open_error() {
        let _ = writeln!(out, "History error: {error}");
    }
    if let Some(result) = session.current_scan() {
        out.push_str(&render_scan(result));
    }

    if session.ai_error().is_some() || session.current_ai().is_some() {
        let _ = writeln!(out, "\n== AI Suggestions ==");
        if let Some(error) = session.ai_error() {
            let _ = writeln!(out, "{error}");
        }
        if let Some(report) = session.current_ai() {
            out.push_str(&render_ai(report));
        }
    }
    out
}
