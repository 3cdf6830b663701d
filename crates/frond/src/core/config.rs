//! Page configuration, loadable from TOML. Every field has a default, so an
//! empty document is a valid configuration.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    core::navigation::SearchConfig,
    error::{Error, Result},
};

/// Viewport breakpoints in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Widest viewport treated as mobile.
    pub mobile_max: f64,
    /// Narrowest viewport treated as desktop.
    pub desktop_min: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile_max: 767.0,
            desktop_min: 1024.0,
        }
    }
}

impl Breakpoints {
    /// Is this width mobile?
    pub fn is_mobile(&self, width: f64) -> bool {
        width <= self.mobile_max
    }

    /// Is this width desktop?
    pub fn is_desktop(&self, width: f64) -> bool {
        width >= self.desktop_min
    }
}

/// Delays and animation durations, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Quiet period before a resize is broadcast.
    pub resize_debounce: u64,
    /// Delay before scroll behaviour is restored after unlocking.
    pub scroll_behavior_restore: u64,
    /// Interval between animated window scroll steps.
    pub scroll_step: u64,
    /// Slider button cooldown after a scroll.
    pub slider_cooldown: u64,
    /// Carousel autoplay interval.
    pub autoplay_interval: u64,
    /// Carousel slide animation.
    pub slide_transition: u64,
    /// Accordion expand animation.
    pub accordion_expand: u64,
    /// Accordion collapse animation.
    pub accordion_collapse: u64,
    /// Dropdown open animation on desktop.
    pub dropdown_open: u64,
    /// Dropdown close animation on desktop.
    pub dropdown_close: u64,
    /// Dropdown open animation on smaller screens.
    pub dropdown_open_mobile: u64,
    /// Dropdown close animation on smaller screens.
    pub dropdown_close_mobile: u64,
    /// Modal open animation.
    pub modal_open: u64,
    /// Modal close animation.
    pub modal_close: u64,
    /// Snackbar lifetime.
    pub snackbar: u64,
    /// Toast lifetime.
    pub toast: u64,
    /// Delay before a viewed product is recorded.
    pub recent_record: u64,
    /// Per-child delay in stagger groups.
    pub stagger_step: u64,
    /// Placeholder animation delay per typed character.
    pub placeholder_type: u64,
    /// Placeholder animation delay per deleted character.
    pub placeholder_delete: u64,
    /// Pause once a placeholder suggestion is fully typed.
    pub placeholder_pause: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            resize_debounce: 200,
            scroll_behavior_restore: 200,
            scroll_step: 10,
            slider_cooldown: 100,
            autoplay_interval: 4000,
            slide_transition: 400,
            accordion_expand: 200,
            accordion_collapse: 100,
            dropdown_open: 200,
            dropdown_close: 100,
            dropdown_open_mobile: 300,
            dropdown_close_mobile: 0,
            modal_open: 300,
            modal_close: 200,
            snackbar: 4000,
            toast: 2000,
            recent_record: 500,
            stagger_step: 100,
            placeholder_type: 200,
            placeholder_delete: 100,
            placeholder_pause: 1500,
        }
    }
}

/// Convert a millisecond setting.
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Slider visibility thresholds and layout defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Fraction of a card that must be visible for it to count as shown.
    pub card_threshold: f64,
    /// Fraction of the card list visible before cards are tracked.
    pub list_threshold: f64,
    /// Fraction of an autoplaying component visible for playback to run.
    pub autoplay_threshold: f64,
    /// Cards advanced per click on wide viewports.
    pub cards_per_slide: usize,
    /// Fraction of a tab visible for it to count as shown.
    pub tab_threshold: f64,
    /// Fraction of a page section visible for its nav link to be active.
    pub section_threshold: f64,
    /// Fraction of a section nav card visible for it to count as shown.
    pub nav_card_threshold: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            card_threshold: 0.99,
            list_threshold: 0.1,
            autoplay_threshold: 0.5,
            cards_per_slide: 2,
            tab_threshold: 0.9,
            section_threshold: 0.3,
            nav_card_threshold: 0.75,
        }
    }
}

/// Recently viewed product storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentConfig {
    /// Storage key.
    pub key: String,
    /// Maximum number of products kept.
    pub capacity: usize,
    /// Path fragment identifying a product page.
    pub product_marker: String,
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            key: "recentlyViewedProducts".into(),
            capacity: 13,
            product_marker: "/p/".into(),
        }
    }
}

/// Download interception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Site base path prepended to the proxy path.
    pub base_path: String,
    /// Same-origin endpoint that streams remote files.
    pub proxy_path: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            proxy_path: "/api/download-file.php".into(),
        }
    }
}

/// Entrance animation root margins, in pixels (negative shrinks the
/// viewport bottom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Margin on desktop viewports.
    pub margin: f64,
    /// Margin on mobile viewports and short desktop viewports.
    pub margin_compact: f64,
    /// Margin for stagger groups on desktop.
    pub stagger_margin: f64,
    /// Viewport heights that count as short.
    pub short_heights: (f64, f64),
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            margin: -150.0,
            margin_compact: -50.0,
            stagger_margin: -100.0,
            short_heights: (600.0, 680.0),
        }
    }
}

/// Complete page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Breakpoints.
    pub breakpoints: Breakpoints,
    /// Timings.
    pub timing: Timing,
    /// Slider settings.
    pub slider: SliderConfig,
    /// Results per pagination page.
    pub page_size: Option<usize>,
    /// Recently viewed products.
    pub recent: RecentConfig,
    /// Search redirect.
    pub search: SearchConfig,
    /// Download proxy.
    pub download: DownloadConfig,
    /// Entrance animations.
    pub motion: MotionConfig,
    /// Text typed before each animated placeholder suggestion.
    pub placeholder_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            timing: Timing::default(),
            slider: SliderConfig::default(),
            page_size: None,
            recent: RecentConfig::default(),
            search: SearchConfig::default(),
            download: DownloadConfig::default(),
            motion: MotionConfig::default(),
            placeholder_prefix: "Search by ".into(),
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(src: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(src)?;
        if cfg.page_size == Some(0) {
            return Err(Error::Config("page_size must be positive".into()));
        }
        Ok(cfg)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&src)
    }

    /// Results per pagination page.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty() -> Result<()> {
        let cfg = Config::from_toml("")?;
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.page_size(), 10);
        assert_eq!(cfg.timing.resize_debounce, 200);
        assert_eq!(cfg.recent.capacity, 13);
        assert_eq!(cfg.placeholder_prefix, "Search by ");
        assert_eq!(cfg.slider.section_threshold, 0.3);
        Ok(())
    }

    #[test]
    fn partial_override() -> Result<()> {
        let cfg = Config::from_toml(
            r#"
            page_size = 20

            [timing]
            toast = 1500

            [search]
            regions = ["europe"]
            "#,
        )?;
        assert_eq!(cfg.page_size(), 20);
        assert_eq!(cfg.timing.toast, 1500);
        assert_eq!(cfg.timing.snackbar, 4000);
        assert_eq!(cfg.search.regions, vec!["europe".to_string()]);
        assert_eq!(cfg.search.deployments.len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Config::from_toml("page_size = 0").is_err());
        assert!(matches!(Config::from_toml("timing = 3"), Err(Error::Config(_))));
    }
}
