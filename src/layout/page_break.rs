//! # Page Break Decisions
//!
//! What to do with a block whose lines do not fit in the space left on the
//! current page. A render uses exactly one [`BreakPolicy`] for every block.

use serde::{Deserialize, Serialize};

/// How blocks behave at a page boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakPolicy {
    /// Blocks are atomic: a block that does not fit moves to the next page
    /// whole.
    #[default]
    KeepTogether,
    /// Blocks may split between lines, keeping at least `min_orphan_lines`
    /// at the bottom of the current page and `min_widow_lines` at the top of
    /// the next.
    #[serde(rename_all = "camelCase")]
    SplitLines {
        min_orphan_lines: usize,
        min_widow_lines: usize,
    },
}

/// Outcome for one block at the current cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// All lines fit.
    Place,
    /// Nothing goes on this page.
    MoveToNextPage,
    /// The first `lines_on_current_page` lines stay, the rest continue on
    /// the next page.
    Split { lines_on_current_page: usize },
}

/// Decide how a block with the given line heights breaks when
/// `remaining_height` is left on the page.
pub fn decide_break(
    remaining_height: f64,
    line_heights: &[f64],
    policy: BreakPolicy,
) -> BreakDecision {
    let total: f64 = line_heights.iter().sum();
    if total <= remaining_height {
        return BreakDecision::Place;
    }

    let (min_orphan_lines, min_widow_lines) = match policy {
        BreakPolicy::KeepTogether => return BreakDecision::MoveToNextPage,
        BreakPolicy::SplitLines {
            min_orphan_lines,
            min_widow_lines,
        } => (min_orphan_lines, min_widow_lines),
    };

    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in line_heights {
        if running + h > remaining_height {
            break;
        }
        running += h;
        fit_count += 1;
    }

    let total_lines = line_heights.len();

    // Too few lines would stay behind (orphan).
    if fit_count < min_orphan_lines && fit_count < total_lines {
        return BreakDecision::MoveToNextPage;
    }

    // Too few lines would carry over (widow): pull some back.
    let carried = total_lines - fit_count;
    if carried < min_widow_lines && carried > 0 {
        let adjusted = fit_count.saturating_sub(min_widow_lines - carried);
        if adjusted == 0 || adjusted < min_orphan_lines {
            return BreakDecision::MoveToNextPage;
        }
        return BreakDecision::Split {
            lines_on_current_page: adjusted,
        };
    }

    if fit_count == 0 {
        return BreakDecision::MoveToNextPage;
    }

    BreakDecision::Split {
        lines_on_current_page: fit_count,
    }
}
