use ajaxkit_config::config;
use ajaxkit_shared::traits::dom::Insertion;
use log::warn;
use std::time::Duration;

/// Tunables of the updater and its effects. [`UpdaterSettings::default`] holds the stock values,
/// [`UpdaterSettings::from_config`] reads the config store.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdaterSettings {
    /// Used when neither target nor caller name a strategy
    pub default_insertion: Insertion,
    /// Length of the background fade of a highlight
    pub highlight_duration: Duration,
    /// Time between two frames of the fade
    pub highlight_frame: Duration,
    /// How long a blinked node stays dimmed
    pub blink_duration: Duration,
    /// Opacity of a blinked node while dimmed
    pub blink_opacity: f32,
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            default_insertion: Insertion::Inside,
            highlight_duration: Duration::from_millis(1000),
            highlight_frame: Duration::from_millis(50),
            blink_duration: Duration::from_millis(600),
            blink_opacity: 0.2,
        }
    }
}

impl UpdaterSettings {
    pub fn from_config() -> Self {
        let stock = Self::default();

        let name = config!(string "updater.default_insertion");
        let default_insertion = name.parse().unwrap_or_else(|err| {
            warn!("updater: {err} in updater.default_insertion, using {}", stock.default_insertion);
            stock.default_insertion
        });

        let millis = |key: &str, fallback: Duration| match config!(uint key) {
            0 => fallback,
            ms => Duration::from_millis(ms as u64),
        };

        Self {
            default_insertion,
            highlight_duration: millis("effects.highlight.duration_ms", stock.highlight_duration),
            highlight_frame: millis("effects.highlight.frame_ms", stock.highlight_frame),
            blink_duration: millis("effects.blink.duration_ms", stock.blink_duration),
            blink_opacity: (config!(uint "effects.blink.opacity_percent").min(100) as f32) / 100.0,
        }
    }
}
