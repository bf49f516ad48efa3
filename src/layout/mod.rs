//! # Pagination
//!
//! Places the flow (the article lead followed by the extracted blocks) onto
//! fixed-size pages.
//!
//! There is no infinite canvas that gets sliced afterwards. A cursor walks
//! down the current page, and before anything is placed the engine asks
//! whether it fits in what is left:
//!
//! ```text
//! AwaitingBlock ──next item──▶ MeasuringFit ──fits──▶ Placing ──▶ AwaitingBlock
//!       │                           │
//!       │                           └─doesn't fit──▶ Overflowing ──new page──▶ (retry)
//!       └──flow exhausted──▶ Done
//! ```
//!
//! A block that does not fit even on an empty page is placed anyway, from
//! the top of a fresh page, with its lines flagged as overflowing. It is
//! never dropped and never retried forever.

pub mod page_break;

use log::{debug, warn};

use crate::config::RenderConfig;
use crate::error::Result;
use crate::font::FontContext;
use crate::model::{Block, BlogRecord};
use crate::style::{RuleStyle, TextStyle, Theme};
use crate::text::{Line, TextMeasurer};

use page_break::{decide_break, BreakDecision};

/// Parts of the article lead printed before the first block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadPart {
    Title,
    Subtitle,
    Meta,
    Divider,
}

/// Where a placed line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSource {
    Lead(LeadPart),
    /// Index into the extracted block list.
    Block(usize),
}

/// One item of the vertical flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowItem {
    Text {
        source: LineSource,
        text: String,
        style: TextStyle,
    },
    /// A full-width horizontal rule followed by `spacing_after`.
    Rule {
        source: LineSource,
        style: RuleStyle,
        spacing_after: f64,
    },
}

impl FlowItem {
    pub fn block(index: usize, block: &Block) -> Self {
        FlowItem::Text {
            source: LineSource::Block(index),
            text: block.text.clone(),
            style: Theme::block(block.kind),
        }
    }

    pub fn source(&self) -> LineSource {
        match self {
            FlowItem::Text { source, .. } | FlowItem::Rule { source, .. } => *source,
        }
    }
}

/// Build the flow for a record: the lead (when enabled) then every block.
pub fn build_flow(record: &BlogRecord, blocks: &[Block], include_lead: bool) -> Vec<FlowItem> {
    let mut flow = Vec::with_capacity(blocks.len() + 4);

    if include_lead {
        flow.push(FlowItem::Text {
            source: LineSource::Lead(LeadPart::Title),
            text: record.display_title().to_string(),
            style: Theme::LEAD_TITLE,
        });
        if let Some(subtitle) = record.display_subtitle() {
            flow.push(FlowItem::Text {
                source: LineSource::Lead(LeadPart::Subtitle),
                text: subtitle.to_string(),
                style: Theme::LEAD_SUBTITLE,
            });
        }
        flow.push(FlowItem::Text {
            source: LineSource::Lead(LeadPart::Meta),
            text: meta_line(record),
            style: Theme::LEAD_META,
        });
        flow.push(FlowItem::Rule {
            source: LineSource::Lead(LeadPart::Divider),
            style: Theme::DIVIDER,
            spacing_after: Theme::DIVIDER_SPACING,
        });
    }

    flow.extend(
        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| FlowItem::block(i, block)),
    );
    flow
}

/// `Author: A | Category: C | Date: M/D/YYYY`
pub fn meta_line(record: &BlogRecord) -> String {
    format!(
        "Author: {} | Category: {} | Date: {}",
        record.display_author(),
        record.display_category(),
        record.created_at.format("%-m/%-d/%Y")
    )
}

// ── Placed output ──────────────────────────────────────────────

/// A wrapped line at its final position. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub line_height: f64,
    pub style: TextStyle,
    pub source: LineSource,
    /// Set for lines of a block too tall for any page; such lines may
    /// cross the bottom margin.
    pub overflow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRule {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub style: RuleStyle,
    pub source: LineSource,
}

/// The content of one page. `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPage {
    pub index: usize,
    pub lines: Vec<PlacedLine>,
    pub rules: Vec<PlacedRule>,
}

/// Result of a pagination run. Always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub pages: Vec<PlacedPage>,
    /// Items that were taller than a fresh page and overflow its bottom.
    pub oversized: Vec<LineSource>,
}

// ── Engine ─────────────────────────────────────────────────────

/// A flow item after wrapping.
#[derive(Debug, Clone)]
struct Measured {
    lines: Vec<Line>,
    line_height: f64,
    spacing_after: f64,
}

impl Measured {
    fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }
}

#[derive(Debug)]
enum State {
    AwaitingBlock,
    MeasuringFit { item: usize },
    Placing { item: usize, measured: Measured },
    Overflowing { item: usize, measured: Measured },
    Done,
}

/// Tracks the state of the page currently being filled.
struct PageCursor {
    index: usize,
    content_top: f64,
    bottom_limit: f64,
    y: f64,
    lines: Vec<PlacedLine>,
    rules: Vec<PlacedRule>,
}

impl PageCursor {
    fn new(index: usize, content_top: f64, bottom_limit: f64) -> Self {
        Self {
            index,
            content_top,
            bottom_limit,
            y: content_top,
            lines: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Negative once spacing has pushed the cursor past the bottom limit.
    fn remaining_height(&self) -> f64 {
        self.bottom_limit - self.y
    }

    fn capacity(&self) -> f64 {
        self.bottom_limit - self.content_top
    }

    fn fits(&self, height: f64) -> bool {
        self.y + height <= self.bottom_limit
    }

    /// Nothing placed yet, so moving on cannot gain any room.
    fn is_fresh(&self) -> bool {
        self.lines.is_empty() && self.rules.is_empty()
    }

    fn finalize(&self) -> PlacedPage {
        PlacedPage {
            index: self.index,
            lines: self.lines.clone(),
            rules: self.rules.clone(),
        }
    }

    fn new_page(&self) -> Self {
        PageCursor::new(self.index + 1, self.content_top, self.bottom_limit)
    }
}

/// Places flow items onto pages for one render.
pub struct PaginationEngine<'a> {
    config: &'a RenderConfig,
    measurer: TextMeasurer,
}

impl<'a> PaginationEngine<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        let measurer = TextMeasurer::new(
            FontContext::new(config.font_family),
            config.page.pt_to_unit(),
        );
        Self { config, measurer }
    }

    pub fn paginate(&self, flow: &[FlowItem]) -> Result<Pagination> {
        let mut pages = Vec::new();
        let mut oversized = Vec::new();
        let mut cursor = PageCursor::new(
            1,
            self.config.content_top(),
            self.config.page.bottom_limit(),
        );

        let mut next = 0;
        let mut state = State::AwaitingBlock;

        loop {
            state = match state {
                State::AwaitingBlock => {
                    if next < flow.len() {
                        next += 1;
                        State::MeasuringFit { item: next - 1 }
                    } else {
                        State::Done
                    }
                }

                State::MeasuringFit { item } => {
                    let measured = self.measure(&flow[item])?;
                    Self::fit(&cursor, item, measured)
                }

                State::Placing { item, measured } => {
                    self.place(
                        &mut cursor,
                        &flow[item],
                        &measured.lines,
                        measured.line_height,
                        false,
                    );
                    cursor.y += measured.height() + measured.spacing_after;
                    State::AwaitingBlock
                }

                State::Overflowing { item, mut measured } => {
                    let heights = vec![measured.line_height; measured.lines.len()];
                    let decision =
                        decide_break(cursor.remaining_height(), &heights, self.config.break_policy);

                    match decision {
                        BreakDecision::Place => State::Placing { item, measured },
                        BreakDecision::MoveToNextPage if cursor.is_fresh() => {
                            let source = flow[item].source();
                            warn!(
                                "{source:?} is taller than a page ({:.1} > {:.1}); placing it overflowing",
                                measured.height(),
                                cursor.capacity()
                            );
                            self.place(
                                &mut cursor,
                                &flow[item],
                                &measured.lines,
                                measured.line_height,
                                true,
                            );
                            cursor.y += measured.height() + measured.spacing_after;
                            oversized.push(source);
                            State::AwaitingBlock
                        }
                        BreakDecision::MoveToNextPage => {
                            pages.push(cursor.finalize());
                            cursor = cursor.new_page();
                            Self::fit(&cursor, item, measured)
                        }
                        BreakDecision::Split { lines_on_current_page } => {
                            let rest = measured.lines.split_off(lines_on_current_page);
                            self.place(
                                &mut cursor,
                                &flow[item],
                                &measured.lines,
                                measured.line_height,
                                false,
                            );
                            pages.push(cursor.finalize());
                            cursor = cursor.new_page();
                            measured.lines = rest;
                            Self::fit(&cursor, item, measured)
                        }
                    }
                }

                State::Done => break,
            };
        }

        pages.push(cursor.finalize());

        debug!(
            "paginated {} flow items onto {} pages ({} oversized)",
            flow.len(),
            pages.len(),
            oversized.len()
        );

        Ok(Pagination { pages, oversized })
    }

    fn fit(cursor: &PageCursor, item: usize, measured: Measured) -> State {
        if cursor.fits(measured.height()) {
            State::Placing { item, measured }
        } else {
            State::Overflowing { item, measured }
        }
    }

    fn measure(&self, item: &FlowItem) -> Result<Measured> {
        match item {
            FlowItem::Text { text, style, .. } => Ok(Measured {
                lines: self.measurer.wrap(
                    text,
                    style.bold,
                    style.font_size,
                    self.config.page.content_width(),
                )?,
                line_height: style.font_size * self.config.line_height_factor,
                spacing_after: style.spacing_after,
            }),
            FlowItem::Rule { spacing_after, .. } => Ok(Measured {
                lines: Vec::new(),
                line_height: 0.0,
                spacing_after: *spacing_after,
            }),
        }
    }

    fn place(
        &self,
        cursor: &mut PageCursor,
        item: &FlowItem,
        lines: &[Line],
        line_height: f64,
        overflow: bool,
    ) {
        let margin = &self.config.page.margin;
        match item {
            FlowItem::Text { source, style, .. } => {
                for (i, line) in lines.iter().enumerate() {
                    cursor.lines.push(PlacedLine {
                        text: line.text.clone(),
                        x: margin.left,
                        y: cursor.y + i as f64 * line_height,
                        width: line.width,
                        line_height,
                        style: *style,
                        source: *source,
                        overflow,
                    });
                }
            }
            FlowItem::Rule { source, style, .. } => {
                cursor.rules.push(PlacedRule {
                    x1: margin.left,
                    x2: self.config.page.width() - margin.right,
                    y: cursor.y,
                    style: *style,
                    source: *source,
                });
            }
        }
    }
}
