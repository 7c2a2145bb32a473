//! Effective theme tracking.

use serde::Serialize;
use tokio::sync::watch;

use super::{OsSignal, Palette, ThemePreference};

/// Resolved theme as sent to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub is_dark: bool,
    pub root_class: &'static str,
    pub palette: Palette,
}

impl ThemeState {
    #[must_use]
    pub fn resolve(preference: ThemePreference, os: OsSignal) -> Self {
        let is_dark = preference.resolve(os.prefers_dark());
        Self {
            preference,
            is_dark,
            root_class: preference.root_class(os.prefers_dark()),
            palette: Palette::for_theme(is_dark),
        }
    }
}

/// Follows a preference and an OS signal and reports the effective theme.
///
/// If the OS signal source goes away the last reported signal stays in
/// effect. Once the preference source goes away the tracker is finished.
#[derive(Debug)]
pub struct ThemeTracker {
    preference: watch::Receiver<ThemePreference>,
    os: watch::Receiver<OsSignal>,
    os_open: bool,
    state: ThemeState,
}

impl ThemeTracker {
    pub fn new(
        mut preference: watch::Receiver<ThemePreference>,
        mut os: watch::Receiver<OsSignal>,
    ) -> Self {
        let state = ThemeState::resolve(*preference.borrow_and_update(), *os.borrow_and_update());
        Self {
            preference,
            os,
            os_open: true,
            state,
        }
    }

    /// Track a preference against a fixed OS signal.
    pub fn with_fixed_os(preference: watch::Receiver<ThemePreference>, os: OsSignal) -> Self {
        let (_tx, rx) = watch::channel(os);
        let mut tracker = Self::new(preference, rx);
        tracker.os_open = false;
        tracker
    }

    #[must_use]
    pub fn state(&self) -> ThemeState {
        self.state
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.state.is_dark
    }

    /// Wait for the resolved theme to change.
    ///
    /// Returns `None` when the preference source has been dropped.
    pub async fn changed(&mut self) -> Option<ThemeState> {
        loop {
            let os_open = self.os_open;
            tokio::select! {
                res = self.preference.changed() => {
                    if res.is_err() {
                        return None;
                    }
                }
                res = self.os.changed(), if os_open => {
                    if res.is_err() {
                        self.os_open = false;
                        continue;
                    }
                }
            }

            let next = ThemeState::resolve(
                *self.preference.borrow_and_update(),
                *self.os.borrow_and_update(),
            );
            if next != self.state {
                self.state = next;
                return Some(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_follows_os_signal() {
        let (_pref_tx, pref_rx) = watch::channel(ThemePreference::System);
        let (os_tx, os_rx) = watch::channel(OsSignal::Light);
        let mut tracker = ThemeTracker::new(pref_rx, os_rx);
        assert!(!tracker.is_dark());

        os_tx.send(OsSignal::Dark).unwrap();
        let state = tracker.changed().await.unwrap();
        assert!(state.is_dark);
        assert_eq!(state.root_class, "dark");
    }

    #[tokio::test]
    async fn test_fixed_preference_ignores_os_signal() {
        let (pref_tx, pref_rx) = watch::channel(ThemePreference::Light);
        let (os_tx, os_rx) = watch::channel(OsSignal::Light);
        let mut tracker = ThemeTracker::new(pref_rx, os_rx);

        os_tx.send(OsSignal::Dark).unwrap();
        pref_tx.send(ThemePreference::Dark).unwrap();
        let state = tracker.changed().await.unwrap();
        assert_eq!(state.preference, ThemePreference::Dark);
        assert!(state.is_dark);
    }

    #[tokio::test]
    async fn test_dropped_os_source_keeps_tracking_preference() {
        let (pref_tx, pref_rx) = watch::channel(ThemePreference::System);
        let mut tracker = ThemeTracker::with_fixed_os(pref_rx, OsSignal::Dark);
        assert!(tracker.is_dark());

        pref_tx.send(ThemePreference::Light).unwrap();
        let state = tracker.changed().await.unwrap();
        assert!(!state.is_dark);
        assert_eq!(state.root_class, "theme-light");

        drop(pref_tx);
        assert!(tracker.changed().await.is_none());
    }
}
