//! # Document Rendering
//!
//! Turns placed pages into drawable pages: paints the cover, the header band
//! on every content page, the per-block styling, and finally the footer
//! band.
//!
//! Footers need the total page count, so they are painted in a post-pass
//! once pagination is final, the same way headers and footers of fixed
//! elements are injected after layout rather than during it.

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::font::{FontContext, StandardFont};
use crate::layout::{Pagination, PlacedLine, PlacedPage};
use crate::model::{BlogRecord, PageConfig};
use crate::style::{Color, RuleStyle, TextStyle, Theme};
use crate::text::TextMeasurer;

/// What the cover page shows.
#[derive(Debug, Clone)]
pub struct CoverMeta {
    pub title: String,
    pub author: String,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl CoverMeta {
    pub fn from_record(record: &BlogRecord) -> Self {
        Self {
            title: record.display_title().to_string(),
            author: record.display_author().to_string(),
            category: record.display_category().to_string(),
            date: record.created_at,
        }
    }
}

/// Document-level metadata written into the PDF Info dictionary.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

/// A primitive drawing operation in page units, y measured from the top.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle; `y` is its top edge.
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// A stroked straight line.
    Stroke {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
    /// A single line of text drawn on `baseline`.
    Text {
        x: f64,
        baseline: f64,
        text: String,
        font: StandardFont,
        font_size: f64,
        color: Color,
    },
}

/// Running text of a band: left and right aligned parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bands {
    pub header: Option<Band>,
    pub footer: Option<Band>,
}

/// A drawable page.
///
/// `index` is 0 for the cover and 1-based for content pages. `content`
/// keeps the placed lines for inspection; `elements` is what gets drawn, in
/// painting order.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub bands: Bands,
    pub content: Vec<PlacedLine>,
    pub elements: Vec<DrawCommand>,
}

/// A fully rendered document. `pages` holds at least one content page.
#[derive(Debug, Clone)]
pub struct Document {
    pub cover_page: Page,
    pub pages: Vec<Page>,
    pub metadata: Metadata,
}

impl Document {
    /// Cover first, then the content pages.
    pub fn all_pages(&self) -> impl Iterator<Item = &Page> {
        std::iter::once(&self.cover_page).chain(self.pages.iter())
    }
}

/// Paints pages for one render.
pub struct DocumentRenderer<'a> {
    config: &'a RenderConfig,
    measurer: TextMeasurer,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        let measurer = TextMeasurer::new(
            FontContext::new(config.font_family),
            config.page.pt_to_unit(),
        );
        Self { config, measurer }
    }

    pub fn render(&self, pagination: &Pagination, cover: &CoverMeta) -> Result<Document> {
        let cover_page = self.render_cover(cover)?;

        let mut pages = pagination
            .pages
            .iter()
            .map(|placed| self.render_content_page(placed))
            .collect::<Result<Vec<_>>>()?;

        self.inject_footers(&mut pages)?;

        debug!("rendered cover and {} content pages", pages.len());

        Ok(Document {
            cover_page,
            pages,
            metadata: Metadata {
                title: cover.title.clone(),
                author: cover.author.clone(),
                subject: cover.category.clone(),
                created_at: cover.date,
            },
        })
    }

    fn page_config(&self) -> &PageConfig {
        &self.config.page
    }

    fn render_cover(&self, cover: &CoverMeta) -> Result<Page> {
        let page = self.page_config();
        let center = page.width() / 2.0;
        let mut elements = Vec::new();

        let title_lines = self.measurer.wrap(
            &cover.title,
            Theme::COVER_TITLE.bold,
            Theme::COVER_TITLE.font_size,
            page.content_width(),
        )?;
        let title_top = page.height() / 3.0;
        for (i, line) in title_lines.iter().enumerate() {
            elements.push(self.text(
                &line.text,
                center - line.width / 2.0,
                title_top + i as f64 * Theme::COVER_TITLE_LEADING,
                &Theme::COVER_TITLE,
            ));
        }
        let y = title_top + title_lines.len() as f64 * Theme::COVER_TITLE_LEADING;

        let byline = format!("By {}", cover.author);
        let date = cover.date.format("%B %-d, %Y").to_string();
        elements.push(self.centered(&byline, center, y + 15.0, &Theme::COVER_BYLINE)?);
        elements.push(self.centered(&date, center, y + 30.0, &Theme::COVER_BYLINE)?);

        Ok(Page {
            index: 0,
            width: page.width(),
            height: page.height(),
            bands: Bands::default(),
            content: Vec::new(),
            elements,
        })
    }

    fn render_content_page(&self, placed: &PlacedPage) -> Result<Page> {
        let page = self.page_config();
        let mut elements = Vec::new();
        let mut bands = Bands::default();

        if self.config.header_band {
            elements.push(DrawCommand::Fill {
                x: 0.0,
                y: 0.0,
                width: page.width(),
                height: Theme::HEADER_HEIGHT,
                color: Theme::HEADER_FILL,
            });
            elements.push(self.text(
                &self.config.brand,
                page.margin.left,
                Theme::HEADER_BASELINE,
                &Theme::HEADER_BRAND,
            ));
            elements.push(self.right_aligned(
                &self.config.header_label,
                Theme::HEADER_BASELINE,
                &Theme::HEADER_LABEL,
            )?);
            bands.header = Some(Band {
                left: self.config.brand.clone(),
                right: self.config.header_label.clone(),
            });
        }

        for rule in &placed.rules {
            elements.push(stroke(rule.x1, rule.y, rule.x2, rule.y, &rule.style));
        }
        for line in &placed.lines {
            elements.push(self.line(line));
        }

        Ok(Page {
            index: placed.index,
            width: page.width(),
            height: page.height(),
            bands,
            content: placed.lines.clone(),
            elements,
        })
    }

    /// Paint `Page i of N` on every content page once `N` is known.
    fn inject_footers(&self, pages: &mut [Page]) -> Result<()> {
        let page = self.page_config();
        let total = pages.len();
        let rule_y = page.height() - Theme::FOOTER_RULE_OFFSET;
        let baseline = page.height() - Theme::FOOTER_BASELINE_OFFSET;

        for p in pages.iter_mut() {
            let counter = format!("Page {} of {}", p.index, total);
            p.elements.push(stroke(
                page.margin.left,
                rule_y,
                page.width() - page.margin.right,
                rule_y,
                &Theme::FOOTER_RULE,
            ));
            p.elements.push(self.text(
                &self.config.brand,
                page.margin.left,
                baseline,
                &Theme::FOOTER_TEXT,
            ));
            p.elements
                .push(self.right_aligned(&counter, baseline, &Theme::FOOTER_TEXT)?);
            p.bands.footer = Some(Band {
                left: self.config.brand.clone(),
                right: counter,
            });
        }
        Ok(())
    }

    fn line(&self, line: &PlacedLine) -> DrawCommand {
        let font = self.measurer.fonts().resolve(line.style.bold);
        let ascent = font.metrics().ascender as f64 / 1000.0
            * line.style.font_size
            * self.page_config().pt_to_unit();
        DrawCommand::Text {
            x: line.x,
            baseline: line.y + ascent,
            text: line.text.clone(),
            font,
            font_size: line.style.font_size,
            color: line.style.color,
        }
    }

    fn text(&self, text: &str, x: f64, baseline: f64, style: &TextStyle) -> DrawCommand {
        DrawCommand::Text {
            x,
            baseline,
            text: text.to_string(),
            font: self.measurer.fonts().resolve(style.bold),
            font_size: style.font_size,
            color: style.color,
        }
    }

    fn centered(
        &self,
        text: &str,
        center: f64,
        baseline: f64,
        style: &TextStyle,
    ) -> Result<DrawCommand> {
        let width = self.measurer.measure(text, style.bold, style.font_size)?;
        Ok(self.text(text, center - width / 2.0, baseline, style))
    }

    /// Text ending at the right margin.
    fn right_aligned(&self, text: &str, baseline: f64, style: &TextStyle) -> Result<DrawCommand> {
        let page = self.page_config();
        let width = self.measurer.measure(text, style.bold, style.font_size)?;
        Ok(self.text(
            text,
            page.width() - page.margin.right - width,
            baseline,
            style,
        ))
    }
}

fn stroke(x1: f64, y1: f64, x2: f64, y2: f64, style: &RuleStyle) -> DrawCommand {
    DrawCommand::Stroke {
        x1,
        y1,
        x2,
        y2,
        color: style.color,
        line_width: style.line_width,
    }
}
