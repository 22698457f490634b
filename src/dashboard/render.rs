use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::navigation::NavigationState;
use crate::types::InvestigationReport;

use super::app::Dashboard;
use super::notice::Severity;

const TITLE: &str = "Alert Investigation Dashboard";
const ALERT_COLUMN: usize = 36;
const STATUS_COLUMN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Header,
    Normal,
    Selected,
    Muted,
    Notice(Severity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self { text: text.into(), style }
    }

    fn blank() -> Self {
        Self::new("", LineStyle::Normal)
    }
}

/// Lay out one frame as styled lines. Pure so screens can be checked in tests.
pub fn render_lines(app: &Dashboard, width: usize, height: usize) -> Vec<Line> {
    let width = width.max(20);
    let mut footer: Vec<Line> = app
        .notices()
        .iter()
        .map(|n| Line::new(clip(&n.message, width), LineStyle::Notice(n.severity)))
        .collect();

    let (mut lines, body, offset, hints) = match app.state() {
        NavigationState::Table => {
            let mut head = header_lines(app, width);
            head.push(Line::new(
                clip(&table_row("Alert ID", "Status", "ID"), width),
                LineStyle::Header,
            ));
            let rows: Vec<Line> = if app.cache().is_empty() {
                vec![Line::new("No investigations yet", LineStyle::Muted)]
            } else {
                app.cache()
                    .rows()
                    .enumerate()
                    .map(|(i, r)| {
                        let style = if i == app.cursor() { LineStyle::Selected } else { LineStyle::Normal };
                        Line::new(clip(&report_row(r), width), style)
                    })
                    .collect()
            };
            (head, rows, app.cursor(), "q Quit  r Refresh  enter Open  x Dismiss")
        }
        NavigationState::Detail(report) => (
            child_header("Investigation Details", report),
            body_lines(report, width),
            app.scroll(),
            "b/esc Back  r Refresh  q Quit",
        ),
        NavigationState::Report(report) => (
            child_header("Investigation Report", report),
            body_lines(report, width),
            app.scroll(),
            "h Home  r Refresh  q Quit",
        ),
    };
    footer.push(Line::new(clip(hints, width), LineStyle::Muted));

    let available = height.saturating_sub(lines.len() + footer.len()).max(1);
    let start = if app.state().is_table() {
        // keep the cursor row on screen
        (offset + 1).saturating_sub(available)
    } else {
        offset.min(body.len().saturating_sub(available))
    };
    lines.extend(body.into_iter().skip(start).take(available));
    lines.extend(footer);
    lines
}

fn header_lines(app: &Dashboard, width: usize) -> Vec<Line> {
    let mut lines = vec![Line::new(TITLE, LineStyle::Title)];
    match app.credentials() {
        Some(creds) => {
            lines.push(Line::new(
                clip(&format!("User ID: {} | Webhook URL: {}", creds.user_id, creds.webhook_url), width),
                LineStyle::Muted,
            ));
            lines.push(Line::new(
                clip(
                    &format!("(Can't copy? URL is located in {})", app.credentials_path().display()),
                    width,
                ),
                LineStyle::Muted,
            ));
        }
        None => lines.push(Line::new("Not authenticated", LineStyle::Muted)),
    }
    let refreshed = match app.last_refresh() {
        Some(at) => format!("Last refresh: {}", at.format("%H:%M:%S")),
        None => "Waiting for first refresh".to_string(),
    };
    lines.push(Line::new(refreshed, LineStyle::Muted));
    lines.push(Line::blank());
    lines
}

/// Largest offset a child screen can scroll to at this terminal size.
pub fn max_scroll(app: &Dashboard, width: usize, height: usize) -> usize {
    let report = match app.state() {
        NavigationState::Table => return 0,
        NavigationState::Detail(report) | NavigationState::Report(report) => report,
    };
    let chrome = child_header("", report).len() + app.notices().len() + 1;
    let available = height.saturating_sub(chrome).max(1);
    body_lines(report, width.max(20)).len().saturating_sub(available)
}

fn child_header(title: &str, report: &InvestigationReport) -> Vec<Line> {
    vec![
        Line::new(format!("{} - Alert ID: {}", title, report.alert_id), LineStyle::Title),
        Line::new(format!("Status: {}", report.status), LineStyle::Normal),
        Line::blank(),
    ]
}

fn body_lines(report: &InvestigationReport, width: usize) -> Vec<Line> {
    let body = report.report.as_deref().unwrap_or("No report available");
    wrap(body, width)
        .into_iter()
        .map(|text| Line::new(text, LineStyle::Normal))
        .collect()
}

fn table_row(alert_id: &str, status: &str, id: &str) -> String {
    format!(
        "{:<aw$} {:<sw$} {}",
        clip(alert_id, ALERT_COLUMN),
        clip(status, STATUS_COLUMN),
        id,
        aw = ALERT_COLUMN,
        sw = STATUS_COLUMN
    )
}

fn report_row(report: &InvestigationReport) -> String {
    table_row(&report.alert_id, report.status.as_str(), &report.id.to_string())
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Hard-wrap on character count, preserving blank lines.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

pub fn draw<W: Write>(out: &mut W, lines: &[Line]) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (y, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, u16::try_from(y).unwrap_or(u16::MAX)))?;
        queue_style(out, line.style)?;
        queue!(out, Print(&line.text), SetAttribute(Attribute::Reset))?;
    }
    out.flush()
}

fn queue_style<W: Write>(out: &mut W, style: LineStyle) -> io::Result<()> {
    match style {
        LineStyle::Title => queue!(out, SetAttribute(Attribute::Bold), SetForegroundColor(Color::Cyan)),
        LineStyle::Header => queue!(out, SetAttribute(Attribute::Underlined)),
        LineStyle::Normal => Ok(()),
        LineStyle::Selected => queue!(out, SetAttribute(Attribute::Reverse)),
        LineStyle::Muted => queue!(out, SetForegroundColor(Color::DarkGrey)),
        LineStyle::Notice(Severity::Info) => queue!(out, SetForegroundColor(Color::Green)),
        LineStyle::Notice(Severity::Warning) => queue!(out, SetForegroundColor(Color::Yellow)),
        LineStyle::Notice(Severity::Error) => queue!(out, SetForegroundColor(Color::Red)),
    }
}
