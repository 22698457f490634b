use crate::cache::ReportCache;
use crate::types::InvestigationReport;

pub const LOAD_FAILED_NOTICE: &str = "Failed to load investigation details";

/// Which screen is showing. Child screens carry the report they display.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    Table,
    Detail(InvestigationReport),
    Report(InvestigationReport),
}

impl NavigationState {
    pub fn is_table(&self) -> bool {
        matches!(self, NavigationState::Table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Select(String),
    Back,
    Home,
    Quit,
}

/// Side effects the caller must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEffect {
    None,
    Notice(String),
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: NavigationState,
    pub effect: NavigationEffect,
}

impl Transition {
    fn stay(state: NavigationState) -> Self {
        Self { state, effect: NavigationEffect::None }
    }
}

/// Pure transition function over (state, event).
pub fn transition(state: NavigationState, event: NavigationEvent, cache: &ReportCache) -> Transition {
    match (state, event) {
        (state, NavigationEvent::Quit) => Transition {
            state,
            effect: NavigationEffect::Exit,
        },
        (NavigationState::Table, NavigationEvent::Select(alert_id)) => match cache.lookup(&alert_id) {
            Some(report) => Transition::stay(screen_for(report.clone())),
            None => {
                tracing::warn!("Selected alert {} is not cached", alert_id);
                Transition {
                    state: NavigationState::Table,
                    effect: NavigationEffect::Notice(LOAD_FAILED_NOTICE.to_string()),
                }
            }
        },
        (NavigationState::Detail(_) | NavigationState::Report(_), NavigationEvent::Back | NavigationEvent::Home) => {
            Transition::stay(NavigationState::Table)
        }
        (state, _) => Transition::stay(state),
    }
}

fn screen_for(report: InvestigationReport) -> NavigationState {
    if report.has_final_report() {
        NavigationState::Report(report)
    } else {
        NavigationState::Detail(report)
    }
}
