//! Row geometry of the scrolled page content.
//!
//! ```text
//! heading block      HEADING_ROWS
//! card 0             CARD_ROWS
//! gap                CARD_GAP
//! card 1 ...
//! closing block      CLOSING_ROWS
//! ```

use crate::viewport::Span;

pub const HEADING_ROWS: usize = 4;
pub const CARD_ROWS: usize = 9;
pub const CARD_GAP: usize = 1;
pub const CLOSING_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    card_count: usize,
}

impl PageLayout {
    pub fn new(card_count: usize) -> Self {
        Self { card_count }
    }

    pub fn card_span(&self, index: usize) -> Span {
        Span {
            top: HEADING_ROWS + index * (CARD_ROWS + CARD_GAP),
            height: CARD_ROWS,
        }
    }

    pub fn spans(&self) -> Vec<Span> {
        (0..self.card_count).map(|i| self.card_span(i)).collect()
    }

    pub fn closing_top(&self) -> usize {
        HEADING_ROWS + self.card_count * (CARD_ROWS + CARD_GAP)
    }

    pub fn content_height(&self) -> usize {
        self.closing_top() + CLOSING_ROWS
    }

    pub fn max_scroll(&self, view_height: usize) -> usize {
        self.content_height().saturating_sub(view_height)
    }

    /// Card whose rows contain content row `row`, if any.
    pub fn card_at_row(&self, row: usize) -> Option<usize> {
        if row < HEADING_ROWS {
            return None;
        }
        let offset = row - HEADING_ROWS;
        let index = offset / (CARD_ROWS + CARD_GAP);
        let within = offset % (CARD_ROWS + CARD_GAP);
        (index < self.card_count && within < CARD_ROWS).then_some(index)
    }
}
