pub mod app;
pub mod notice;
pub mod render;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event as TerminalEvent, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use futures::StreamExt;
use tracing::info;

use crate::client::ReportClient;
use crate::config::AppConfig;
use crate::credentials::CredentialStore;
use crate::polling::{PollOutcome, PollTrigger, PollingScheduler};

use app::{Command, Dashboard, Key};
use notice::Severity;

const NOTICE_SWEEP_INTERVAL: Duration = Duration::from_millis(500);

enum LoopEvent {
    Tick,
    Polled(PollOutcome),
    Input(Option<io::Result<TerminalEvent>>),
    Sweep,
}

/// Run the dashboard until the user quits. Polling stays idle when the store
/// holds no credentials.
pub async fn run(config: &AppConfig, store: &CredentialStore) -> anyhow::Result<()> {
    let credentials = store.load();
    let client = Arc::new(ReportClient::new(config.api.host_url.clone(), credentials.clone()));
    let mut scheduler = PollingScheduler::new(client);

    let mut app = Dashboard::new(
        credentials,
        store.path(),
        config.notice_ttl(),
        config.dashboard.max_notices,
    );
    if app.credentials().is_some() {
        app.notify(Severity::Info, "Loaded existing credentials");
    } else {
        app.notify(
            Severity::Warning,
            "No existing credentials found. Run `lert auth login` to set up.",
        );
    }

    let mut session = TerminalSession::enter().context("enter terminal mode")?;
    let mut events = EventStream::new();
    // The first tick completes immediately, which gives the initial fetch
    let mut ticker = PollingScheduler::<ReportClient>::ticker(config.poll_interval());
    let mut sweep = tokio::time::interval(NOTICE_SWEEP_INTERVAL);

    info!("Dashboard started, polling every {:?}", config.poll_interval());
    let mut dirty = true;

    let result = loop {
        if dirty {
            let (width, height) = terminal::size().context("read terminal size")?;
            let (width, height) = (usize::from(width), usize::from(height));
            app.clamp_scroll(render::max_scroll(&app, width, height));
            let lines = render::render_lines(&app, width, height);
            render::draw(&mut session.stdout, &lines).context("render frame")?;
            dirty = false;
        }

        if app.quitting() {
            break Ok(());
        }

        let event = tokio::select! {
            _ = ticker.tick() => LoopEvent::Tick,
            outcome = scheduler.next_outcome() => LoopEvent::Polled(outcome),
            input = events.next() => LoopEvent::Input(input),
            _ = sweep.tick() => LoopEvent::Sweep,
        };

        match event {
            LoopEvent::Tick => {
                scheduler.trigger(PollTrigger::Tick);
            }
            LoopEvent::Polled(outcome) => {
                let status = scheduler.apply(outcome, app.cache_mut());
                app.on_poll(status);
                dirty = true;
            }
            LoopEvent::Input(Some(Ok(event))) => {
                if let Some(key) = map_terminal_event(&event) {
                    match app.handle_key(key) {
                        Command::Refresh => {
                            let start = scheduler.trigger(PollTrigger::Manual);
                            app.on_refresh_requested(start);
                        }
                        Command::Quit | Command::None => {}
                    }
                }
                dirty = true;
            }
            LoopEvent::Input(Some(Err(e))) => break Err(anyhow::Error::new(e).context("read terminal event")),
            LoopEvent::Input(None) => break Ok(()),
            LoopEvent::Sweep => {
                dirty |= app.expire_notices(Instant::now());
            }
        }
    };

    scheduler.shutdown();
    drop(session);
    info!("Dashboard stopped");
    result
}

fn map_terminal_event(event: &TerminalEvent) -> Option<Key> {
    let TerminalEvent::Key(key_event) = event else {
        return None;
    };
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    let key = match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => return None,
    };
    Some(key)
}

struct TerminalSession {
    stdout: io::Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            LeaveAlternateScreen,
            Show,
            MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}
