//! Persisted visual theme selection.

use std::{fmt, str::FromStr};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::persist::KeyValueStore;

/// One of the three interchangeable storefront themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// `theme1`
    #[default]
    Theme1,
    /// `theme2`
    Theme2,
    /// `theme3`
    Theme3,
}

impl Theme {
    /// Every theme, in display order.
    pub const ALL: [Theme; 3] = [Theme::Theme1, Theme::Theme2, Theme::Theme3];

    /// Identifier as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Theme1 => "theme1",
            Theme::Theme2 => "theme2",
            Theme::Theme3 => "theme3",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted value is not a known theme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0:?}")]
pub struct ThemeParseError(pub String);

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| ThemeParseError(s.to_string()))
    }
}

/// Persists the selected theme as a bare string and publishes the current
/// value to readers.
///
/// Unlike the cart, the theme is not reconciled across contexts.
pub struct ThemeStore<S> {
    medium: S,
    key: String,
    current: watch::Sender<Theme>,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Loads the saved theme, falling back to [`Theme::Theme1`].
    pub fn open(medium: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let theme = load_theme(&medium, &key);
        let (current, _) = watch::channel(theme);
        Self {
            medium,
            key,
            current,
        }
    }

    /// Theme presentation code should render with.
    pub fn current(&self) -> Theme {
        *self.current.borrow()
    }

    /// Receiver that observes every later [`ThemeStore::set_theme`].
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.current.subscribe()
    }

    /// Persists `theme` and publishes it to subscribers.
    pub fn set_theme(&self, theme: Theme) {
        if let Err(err) = self.medium.set_item(&self.key, theme.as_str()) {
            error!(key = %self.key, error = %err, "failed to persist theme");
        }
        self.current.send_replace(theme);
    }
}

fn load_theme<S: KeyValueStore>(medium: &S, key: &str) -> Theme {
    match medium.get_item(key) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|err: ThemeParseError| {
            warn!(key, error = %err, "ignoring saved theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(key, error = %err, "theme read failed");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{persist::memory::MemoryStore, types::THEME_KEY};

    use super::*;

    #[test]
    fn defaults_when_absent_or_invalid() {
        let medium = Arc::new(MemoryStore::new());
        assert_eq!(ThemeStore::open(Arc::clone(&medium), THEME_KEY).current(), Theme::Theme1);

        medium.set_item(THEME_KEY, "neon").unwrap();
        assert_eq!(ThemeStore::open(Arc::clone(&medium), THEME_KEY).current(), Theme::Theme1);

        medium.set_item(THEME_KEY, "theme3").unwrap();
        assert_eq!(ThemeStore::open(medium, THEME_KEY).current(), Theme::Theme3);
    }

    #[test]
    fn set_theme_persists_bare_string_and_notifies() {
        let medium = Arc::new(MemoryStore::new());
        let store = ThemeStore::open(Arc::clone(&medium), THEME_KEY);
        let mut rx = store.subscribe();

        store.set_theme(Theme::Theme2);

        assert_eq!(store.current(), Theme::Theme2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Theme2);
        assert_eq!(medium.get_item(THEME_KEY).unwrap().as_deref(), Some("theme2"));

        let reopened = ThemeStore::open(medium, THEME_KEY);
        assert_eq!(reopened.current(), Theme::Theme2);
    }

    #[test]
    fn parse_round_trips_every_theme() {
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
        assert!("Theme1".parse::<Theme>().is_err());
    }
}
