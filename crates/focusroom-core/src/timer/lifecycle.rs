//! Foreground/background tracking for the host application.

use serde::{Deserialize, Serialize};

/// Host application state as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

/// Edge between two consecutive app states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEdge {
    /// `Active` to anything else.
    WentAway,
    /// Anything else back to `Active`.
    CameBack,
    /// No foreground change (repeat or `Inactive` <-> `Background`).
    Unchanged,
}

/// Remembers the last reported state so that each report can be turned into an
/// edge. One watch exists per attached timer.
#[derive(Debug, Clone)]
pub struct LifecycleWatch {
    last: AppState,
}

impl LifecycleWatch {
    /// The host is assumed to be in the foreground when the watch is created.
    pub fn new() -> Self {
        Self::starting_at(AppState::Active)
    }

    /// Watch a host that is currently in `current`.
    pub fn starting_at(current: AppState) -> Self {
        Self { last: current }
    }

    pub fn last(&self) -> AppState {
        self.last
    }

    pub fn observe(&mut self, next: AppState) -> LifecycleEdge {
        let edge = match (self.last, next) {
            (AppState::Active, AppState::Active) => LifecycleEdge::Unchanged,
            (AppState::Active, _) => LifecycleEdge::WentAway,
            (_, AppState::Active) => LifecycleEdge::CameBack,
            _ => LifecycleEdge::Unchanged,
        };
        self.last = next;
        edge
    }
}

impl Default for LifecycleWatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_leaving_active_counts_as_went_away() {
        let mut watch = LifecycleWatch::new();
        assert_eq!(watch.observe(AppState::Inactive), LifecycleEdge::WentAway);
        assert_eq!(watch.observe(AppState::Background), LifecycleEdge::Unchanged);
        assert_eq!(watch.observe(AppState::Active), LifecycleEdge::CameBack);
        assert_eq!(watch.observe(AppState::Active), LifecycleEdge::Unchanged);
        assert_eq!(watch.observe(AppState::Background), LifecycleEdge::WentAway);
        assert_eq!(watch.last(), AppState::Background);
    }

    #[test]
    fn watch_started_in_background_sees_no_edge_on_repeat() {
        let mut watch = LifecycleWatch::starting_at(AppState::Background);
        assert_eq!(watch.observe(AppState::Background), LifecycleEdge::Unchanged);
        assert_eq!(watch.observe(AppState::Active), LifecycleEdge::CameBack);
    }
}
