use serde::{Serialize, Deserialize};

mod controller;

pub use controller::{
    FrameGate, FrameScheduler, NavbarElement, NavbarVisibilityController, TriggerSection,
    ViewportMetrics,
};

// ===== NAVBAR STATE =====

/// The two mutually exclusive looks of the navigation bar.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarState {
    Transparent,
    Solid,
}

impl NavbarState {
    pub const TRANSPARENT_MARKER: &'static str = "transparent-bar";
    pub const SOLID_MARKER: &'static str = "solid-bar";

    pub fn from_transparent(want_transparent: bool) -> Self {
        if want_transparent {
            NavbarState::Transparent
        } else {
            NavbarState::Solid
        }
    }

    pub fn is_transparent(self) -> bool {
        self == NavbarState::Transparent
    }

    /// Style marker (CSS class) carried by the bar while in this state
    pub fn marker(self) -> &'static str {
        match self {
            NavbarState::Transparent => Self::TRANSPARENT_MARKER,
            NavbarState::Solid => Self::SOLID_MARKER,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            NavbarState::Transparent => NavbarState::Solid,
            NavbarState::Solid => NavbarState::Transparent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NavbarState::Transparent => "transparent",
            NavbarState::Solid => "solid",
        }
    }
}

// ===== GEOMETRY =====

/// Vertical extent of a trigger section in viewport coordinates.
///
/// Read fresh on every evaluation; scrolling and resizing invalidate it continuously.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionRect {
    pub top: f64,
    pub bottom: f64,
}

impl SectionRect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Overlap with the viewport's vertical extent `[0, viewport_height]`.
    /// Negative when the section lies entirely outside.
    pub fn visible_height(&self, viewport_height: f64) -> f64 {
        self.bottom.min(viewport_height) - self.top.max(0.0)
    }

    /// At least `visible_fraction` of the section's height is inside the viewport.
    /// Zero-height sections never qualify.
    pub fn is_sufficiently_visible(&self, viewport_height: f64, visible_fraction: f64) -> bool {
        let visible = self.visible_height(viewport_height);
        visible > 0.0 && visible >= self.height() * visible_fraction
    }

    /// The section touches or spans the horizontal line at `line_y` (inclusive both ends).
    pub fn straddles(&self, line_y: f64) -> bool {
        self.top <= line_y && self.bottom >= line_y
    }
}

pub fn any_sufficiently_visible<I>(rects: I, viewport_height: f64, config: &VisibilityConfig) -> bool
where
    I: IntoIterator<Item = SectionRect>,
{
    rects
        .into_iter()
        .any(|rect| rect.is_sufficiently_visible(viewport_height, config.visible_fraction))
}

pub fn any_straddles_probe<I>(rects: I, config: &VisibilityConfig) -> bool
where
    I: IntoIterator<Item = SectionRect>,
{
    rects.into_iter().any(|rect| rect.straddles(config.offset))
}

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NavbarConfig {
    pub visibility: VisibilityConfig,
    pub dom: DomSection,
}

impl NavbarConfig {
    /// Parse and validate a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        let config: NavbarConfig = toml::from_str(content)
            .map_err(|error| format!("Failed to parse navbar config: {error}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.visibility.validate()?;
        self.dom.validate()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Fraction of a section's height that must be inside the viewport
    pub visible_fraction: f64,
    /// Scroll probe line, in pixels below the viewport top
    pub offset: f64,
    /// Pixels shaved off the top of the observed region for the intersection signal
    pub top_margin: f64,
}

impl VisibilityConfig {
    pub const DEFAULT_VISIBLE_FRACTION: f64 = 0.6;
    pub const DEFAULT_OFFSET: f64 = 80.0;
    pub const DEFAULT_TOP_MARGIN: f64 = 80.0;

    /// `rootMargin` for the intersection observer: top shrunk, other sides untouched.
    pub fn root_margin(&self) -> String {
        if self.top_margin == 0.0 {
            "0px 0px 0px 0px".to_string()
        } else {
            format!("-{}px 0px 0px 0px", self.top_margin)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.visible_fraction > 0.0 && self.visible_fraction <= 1.0) {
            return Err(format!(
                "visible_fraction must be in (0, 1], got {}",
                self.visible_fraction
            ));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(format!("offset must be a non-negative number, got {}", self.offset));
        }
        if !self.top_margin.is_finite() || self.top_margin < 0.0 {
            return Err(format!(
                "top_margin must be a non-negative number, got {}",
                self.top_margin
            ));
        }
        Ok(())
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            visible_fraction: Self::DEFAULT_VISIBLE_FRACTION,
            offset: Self::DEFAULT_OFFSET,
            top_margin: Self::DEFAULT_TOP_MARGIN,
        }
    }
}

// Where the controller finds its elements in the page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DomSection {
    pub navbar_id: String,
    pub section_class: String,
}

impl DomSection {
    pub const DEFAULT_NAVBAR_ID: &'static str = "barreNavigation";
    pub const DEFAULT_SECTION_CLASS: &'static str = "section-img-transparente";

    pub fn validate(&self) -> Result<(), String> {
        if self.navbar_id.trim().is_empty() {
            return Err("navbar_id must not be empty".to_string());
        }
        if self.section_class.trim().is_empty() || self.section_class.contains(char::is_whitespace) {
            return Err(format!(
                "section_class must be a single class name, got {:?}",
                self.section_class
            ));
        }
        Ok(())
    }
}

impl Default for DomSection {
    fn default() -> Self {
        Self {
            navbar_id: Self::DEFAULT_NAVBAR_ID.to_string(),
            section_class: Self::DEFAULT_SECTION_CLASS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_markers() {
        assert_eq!(NavbarState::from_transparent(true).marker(), "transparent-bar");
        assert_eq!(NavbarState::from_transparent(false).marker(), "solid-bar");
        assert_eq!(NavbarState::Transparent.opposite(), NavbarState::Solid);
        assert!(!NavbarState::Solid.is_transparent());
    }

    #[test]
    fn test_visible_height_is_clipped_to_viewport() {
        let rect = SectionRect::new(100.0, 900.0);
        assert_eq!(rect.height(), 800.0);
        assert_eq!(rect.visible_height(800.0), 700.0);

        let scrolled = SectionRect::new(-750.0, 50.0);
        assert_eq!(scrolled.visible_height(800.0), 50.0);

        let below = SectionRect::new(1000.0, 1200.0);
        assert!(below.visible_height(800.0) < 0.0);
    }

    #[test]
    fn test_visibility_threshold_is_inclusive() {
        // 800px section aligned with the top; the viewport height controls the visible part
        let rect = SectionRect::new(0.0, 800.0);
        assert!(rect.is_sufficiently_visible(480.0, 0.6));
        assert!(!rect.is_sufficiently_visible(479.0, 0.6));
    }

    #[test]
    fn test_zero_height_section_is_never_visible() {
        let rect = SectionRect::new(200.0, 200.0);
        assert!(!rect.is_sufficiently_visible(800.0, 0.6));
    }

    #[test]
    fn test_probe_boundaries() {
        assert!(SectionRect::new(80.0, 80.0).straddles(80.0));
        assert!(SectionRect::new(0.0, 80.0).straddles(80.0));
        assert!(SectionRect::new(80.0, 400.0).straddles(80.0));
        assert!(!SectionRect::new(81.0, 400.0).straddles(80.0));
        assert!(!SectionRect::new(-400.0, 79.0).straddles(80.0));
    }

    #[test]
    fn test_any_section_decides() {
        let config = VisibilityConfig::default();
        let rects = [SectionRect::new(-2000.0, -1000.0), SectionRect::new(100.0, 900.0)];
        assert!(any_sufficiently_visible(rects, 800.0, &config));
        assert!(!any_straddles_probe(rects, &config));
        assert!(!any_sufficiently_visible(std::iter::empty(), 800.0, &config));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NavbarConfig::from_toml_str("").unwrap();
        assert_eq!(config, NavbarConfig::default());
        assert_eq!(config.visibility.visible_fraction, 0.6);
        assert_eq!(config.visibility.offset, 80.0);
        assert_eq!(config.visibility.top_margin, 80.0);
        assert_eq!(config.dom.navbar_id, "barreNavigation");
    }

    #[test]
    fn test_partial_config_overrides_only_given_keys() {
        let config = NavbarConfig::from_toml_str(
            r#"
            [visibility]
            offset = 64

            [dom]
            section_class = "hero"
            "#,
        )
        .unwrap();
        assert_eq!(config.visibility.offset, 64.0);
        assert_eq!(config.visibility.visible_fraction, 0.6);
        assert_eq!(config.dom.section_class, "hero");
        assert_eq!(config.dom.navbar_id, "barreNavigation");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let error = NavbarConfig::from_toml_str("[visibility]\nvisible_fraction = 1.5").unwrap_err();
        assert!(error.contains("visible_fraction"));

        assert!(NavbarConfig::from_toml_str("[visibility]\nvisible_fraction = 0.0").is_err());
        assert!(NavbarConfig::from_toml_str("[visibility]\ntop_margin = -1.0").is_err());
        assert!(NavbarConfig::from_toml_str("[dom]\nsection_class = \"a b\"").is_err());
        assert!(NavbarConfig::from_toml_str("[visibility\n").is_err());
    }

    #[test]
    fn test_root_margin() {
        let mut config = VisibilityConfig::default();
        assert_eq!(config.root_margin(), "-80px 0px 0px 0px");

        config.top_margin = 12.5;
        assert_eq!(config.root_margin(), "-12.5px 0px 0px 0px");

        config.top_margin = 0.0;
        assert_eq!(config.root_margin(), "0px 0px 0px 0px");
    }

    #[test]
    fn test_config_serializes_with_section_names() {
        let json = serde_json::to_value(NavbarConfig::default()).unwrap();
        assert_eq!(json["visibility"]["visible_fraction"], 0.6);
        assert_eq!(json["dom"]["section_class"], "section-img-transparente");
    }
}
