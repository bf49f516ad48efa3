//! Render configuration.
//!
//! Every field has a default, so `{}` is a valid configuration and callers
//! only spell out what they change.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::font::FontFamily;
use crate::layout::page_break::BreakPolicy;
use crate::model::PageConfig;
use crate::style::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub page: PageConfig,
    /// Line height in page units per point of font size.
    pub line_height_factor: f64,
    pub break_policy: BreakPolicy,
    /// Open the first content page with title, meta line and divider.
    pub include_lead: bool,
    /// Paint the header band on content pages.
    pub header_band: bool,
    /// Brand name shown in the header and footer bands.
    pub brand: String,
    /// Fixed label right-aligned in the header band.
    pub header_label: String,
    pub font_family: FontFamily,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            line_height_factor: 0.4,
            break_policy: BreakPolicy::default(),
            include_lead: true,
            header_band: true,
            brand: "QuestMeraki".to_string(),
            header_label: "Premium Blog Content".to_string(),
            font_family: FontFamily::Helvetica,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// First y a content line may occupy.
    pub fn content_top(&self) -> f64 {
        if self.header_band {
            self.page
                .margin
                .top
                .max(Theme::HEADER_HEIGHT + Theme::HEADER_GAP)
        } else {
            self.page.margin.top
        }
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.page.size.dimensions();
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(FolioError::Config(format!(
                "page size must be positive, got {w} x {h}"
            )));
        }
        let m = &self.page.margin;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(FolioError::Config("margins must be non-negative".to_string()));
        }
        if self.page.content_width() <= 0.0 {
            return Err(FolioError::Config(format!(
                "margins ({}) leave no content width on a {w} wide page",
                m.horizontal()
            )));
        }
        if self.content_top() >= self.page.bottom_limit() {
            return Err(FolioError::Config(format!(
                "content area is empty: top {} is below bottom limit {}",
                self.content_top(),
                self.page.bottom_limit()
            )));
        }
        if !self.line_height_factor.is_finite() || self.line_height_factor <= 0.0 {
            return Err(FolioError::Config(format!(
                "line height factor must be positive, got {}",
                self.line_height_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edges, PageSize};

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = RenderConfig::from_json("{}").unwrap();
        assert_eq!(config.line_height_factor, 0.4);
        assert!(config.include_lead);
        assert_eq!(config.brand, "QuestMeraki");
        assert_eq!(config.content_top(), 45.0);
    }

    #[test]
    fn test_content_top_without_header_is_top_margin() {
        let config = RenderConfig {
            header_band: false,
            ..Default::default()
        };
        assert_eq!(config.content_top(), 20.0);
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let config = RenderConfig::from_json(
            r#"{"brand": "Acme", "page": {"size": "Letter"}, "breakPolicy": "keepTogether"}"#,
        )
        .unwrap();
        assert_eq!(config.brand, "Acme");
        assert_eq!(config.page.width(), 215.9);
        assert_eq!(config.page.margin.left, 20.0);
    }

    #[test]
    fn test_margins_wider_than_page_rejected() {
        let mut config = RenderConfig::default();
        config.page = PageConfig {
            size: PageSize::Custom {
                width: 30.0,
                height: 297.0,
            },
            margin: Edges::uniform(20.0),
        };
        assert!(matches!(config.validate(), Err(FolioError::Config(_))));
    }

    #[test]
    fn test_bad_json_is_invalid_record() {
        assert!(matches!(
            RenderConfig::from_json("{\"brand\": 3}"),
            Err(FolioError::InvalidRecord { .. })
        ));
    }
}
