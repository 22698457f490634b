use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::cache::{reconcile_cursor, ReportCache};
use crate::navigation::{transition, NavigationEffect, NavigationEvent, NavigationState};
use crate::polling::{PollStart, PollStatus};
use crate::types::Credentials;

use super::notice::{Notices, Severity};

/// Terminal-independent key presses the dashboard reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Interrupt,
}

/// Work the event loop has to do on behalf of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    Refresh,
    Quit,
}

/// Everything the dashboard shows, passed explicitly instead of living in
/// globals so it can be driven from tests without a terminal.
pub struct Dashboard {
    credentials: Option<Credentials>,
    credentials_path: PathBuf,
    cache: ReportCache,
    state: NavigationState,
    cursor: usize,
    scroll: usize,
    notices: Notices,
    last_refresh: Option<DateTime<Local>>,
    manual_refresh_pending: bool,
    quitting: bool,
}

impl Dashboard {
    pub fn new(
        credentials: Option<Credentials>,
        credentials_path: PathBuf,
        notice_ttl: Duration,
        max_notices: usize,
    ) -> Self {
        Self {
            credentials,
            credentials_path,
            cache: ReportCache::new(),
            state: NavigationState::Table,
            cursor: 0,
            scroll: 0,
            notices: Notices::new(notice_ttl, max_notices),
            last_refresh: None,
            manual_refresh_pending: false,
            quitting: false,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ReportCache {
        &mut self.cache
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Pull the child-screen scroll back once it runs past the last page.
    pub fn clamp_scroll(&mut self, max: usize) {
        self.scroll = self.scroll.min(max);
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn last_refresh(&self) -> Option<&DateTime<Local>> {
        self.last_refresh.as_ref()
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(severity, message, Instant::now());
    }

    pub fn expire_notices(&mut self, now: Instant) -> bool {
        self.notices.expire(now)
    }

    pub fn handle_key(&mut self, key: Key) -> Command {
        match key {
            Key::Interrupt | Key::Char('q') => return self.navigate(NavigationEvent::Quit),
            Key::Char('r') => return Command::Refresh,
            Key::Char('x') => {
                self.notices.dismiss_all();
                return Command::None;
            }
            _ => {}
        }

        if self.state.is_table() {
            match key {
                Key::Up | Key::Char('k') => self.cursor = self.cursor.saturating_sub(1),
                Key::Down | Key::Char('j') => {
                    if self.cursor + 1 < self.cache.len() {
                        self.cursor += 1;
                    }
                }
                Key::Enter => {
                    if let Some(report) = self.cache.row(self.cursor) {
                        let alert_id = report.alert_id.clone();
                        return self.navigate(NavigationEvent::Select(alert_id));
                    }
                }
                _ => {}
            }
        } else {
            match key {
                Key::Esc | Key::Backspace | Key::Char('b') => return self.navigate(NavigationEvent::Back),
                Key::Char('h') => return self.navigate(NavigationEvent::Home),
                Key::Up | Key::Char('k') => self.scroll = self.scroll.saturating_sub(1),
                Key::Down | Key::Char('j') => self.scroll += 1,
                _ => {}
            }
        }

        Command::None
    }

    fn navigate(&mut self, event: NavigationEvent) -> Command {
        let previous = std::mem::replace(&mut self.state, NavigationState::Table);
        let was_table = previous.is_table();
        let result = transition(previous, event, &self.cache);
        if was_table != result.state.is_table() {
            self.scroll = 0;
        }
        self.state = result.state;

        match result.effect {
            NavigationEffect::None => Command::None,
            NavigationEffect::Notice(message) => {
                self.notify(Severity::Error, message);
                Command::None
            }
            NavigationEffect::Exit => {
                self.quitting = true;
                Command::Quit
            }
        }
    }

    /// Feedback for a manual refresh request.
    pub fn on_refresh_requested(&mut self, start: PollStart) {
        match start {
            PollStart::Started | PollStart::Coalesced => {
                self.manual_refresh_pending = true;
                self.notify(Severity::Info, "Refreshing…");
            }
            PollStart::Unauthenticated => self.notify(
                Severity::Warning,
                "Not authenticated. Run `lert auth login` to set up credentials.",
            ),
            PollStart::ShutDown => {}
        }
    }

    pub fn on_poll(&mut self, status: PollStatus) {
        match status {
            PollStatus::Merged { .. } => {
                self.cursor = reconcile_cursor(self.cursor, self.cache.len());
                self.last_refresh = Some(Local::now());
                if self.manual_refresh_pending {
                    self.notify(Severity::Info, "Data refreshed");
                }
            }
            PollStatus::Failed(message) => self.notify(Severity::Warning, message),
            PollStatus::Discarded => {}
        }
        self.manual_refresh_pending = false;
    }
}
