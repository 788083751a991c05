//! The scrolling page of reason cards.

mod layout;
mod model;
mod reveal;

use tracing::debug;

use crate::media::{MediaElement, MediaNotice};
use crate::viewport::ScrollViewport;

pub use layout::*;
pub use model::*;
pub use reveal::*;

pub struct Page<M> {
    pub cards: Vec<ReasonCard<M>>,
    pub focused: usize,
    pub scroll: usize,
    pub layout: PageLayout,
    view_height: usize,
    viewport: ScrollViewport,
}

impl<M: MediaElement> Page<M> {
    pub fn new(cards: Vec<ReasonCard<M>>) -> Self {
        let layout = PageLayout::new(cards.len());
        Self {
            cards,
            focused: 0,
            scroll: 0,
            layout,
            view_height: 0,
            viewport: ScrollViewport::new(),
        }
    }

    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn mount_all(&mut self) {
        for rc in self.cards.iter_mut() {
            rc.card.mount(&self.viewport);
        }
        debug!(cards = self.cards.len(), "page mounted");
    }

    pub fn unmount_all(&mut self) {
        for rc in self.cards.iter_mut() {
            rc.card.unmount();
        }
    }

    pub fn focused_card(&self) -> Option<&ReasonCard<M>> {
        self.cards.get(self.focused)
    }

    pub fn focused_card_mut(&mut self) -> Option<&mut ReasonCard<M>> {
        self.cards.get_mut(self.focused)
    }

    pub fn focus_next(&mut self) {
        if !self.has_cards() {
            return;
        }
        self.focused = (self.focused + 1) % self.cards.len();
        self.ensure_focused_visible();
    }

    pub fn focus_prev(&mut self) {
        if !self.has_cards() {
            return;
        }
        self.focused = if self.focused == 0 {
            self.cards.len() - 1
        } else {
            self.focused - 1
        };
        self.ensure_focused_visible();
    }

    pub fn focus_first(&mut self) {
        self.set_focused(0);
    }

    pub fn focus_last(&mut self) {
        self.set_focused(self.cards.len().saturating_sub(1));
    }

    pub fn set_focused(&mut self, index: usize) {
        if index < self.cards.len() {
            self.focused = index;
            self.ensure_focused_visible();
        }
    }

    /// Scroll so the focused card is fully on screen. The first card also
    /// brings the heading back into view.
    pub fn ensure_focused_visible(&mut self) {
        if !self.has_cards() || self.view_height == 0 {
            return;
        }
        if self.focused == 0 {
            self.scroll = 0;
            return;
        }

        let span = self.layout.card_span(self.focused);
        let bottom = span.top + span.height;
        if span.top < self.scroll {
            self.scroll = span.top;
        } else if bottom > self.scroll + self.view_height {
            self.scroll = if span.height > self.view_height {
                span.top
            } else {
                bottom - self.view_height
            };
        }
        self.scroll = self.scroll.min(self.layout.max_scroll(self.view_height));
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.layout.max_scroll(self.view_height);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Recompute card visibility for a view of `view_height` rows.
    pub fn refresh_viewport(&mut self, view_height: usize) {
        self.view_height = view_height;
        self.scroll = self.scroll.min(self.layout.max_scroll(view_height));
        self.viewport
            .set_geometry(self.layout.spans(), self.scroll, view_height);
        self.viewport.refresh();
    }

    pub fn view_height(&self) -> usize {
        self.view_height
    }

    /// Route a runtime notice to the element it belongs to.
    pub fn deliver(&self, notice: &MediaNotice) {
        if let Some(media) = self.cards.get(notice.id).and_then(|rc| rc.card.media()) {
            media.notifier().emit(&notice.event);
        }
    }
}
