//! UI rendering helpers for the terminal user interface.
//!
//! The page is drawn as a column of pre-built lines sliced at the scroll
//! offset. Drawing also returns a `HitMap` so mouse clicks can be routed back to
//! the card control under the cursor.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, rc::Rc, sync::LazyLock, time::Instant};

use crate::config::{PageSettings, Settings};
use crate::media::MediaElement;
use crate::page::{CARD_GAP, CARD_ROWS, Page, ReasonCard, Reveal, RevealStage};

const MAX_CARD_WIDTH: u16 = 72;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "next/prev card".to_string());
    map.insert("gg/G".to_string(), "first/last".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("m".to_string(), "mute".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek to N0%".to_string());
    map.insert("wheel".to_string(), "scroll".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating skip seconds.
fn controls_text(skip_seconds: u64) -> String {
    let order = ["j/k", "space/p", "m", "H/L", "0-9", "gg/G", "wheel", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] skip -/+{}s", skip_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `MM:SS`. Negative or non-finite input shows `00:00`.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Truncate `s` to `width` characters, marking the cut with an ellipsis.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Split `text` on `*` and emphasize every odd run.
fn emphasized(text: &str) -> Vec<Span<'static>> {
    text.split('*')
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            if i % 2 == 1 {
                Span::styled(
                    part.to_string(),
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::ITALIC | Modifier::BOLD),
                )
            } else {
                Span::styled(part.to_string(), Style::default().add_modifier(Modifier::BOLD))
            }
        })
        .collect()
}

/// What a click on a card region does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAction {
    TogglePlay,
    SkipBack,
    SkipForward,
    ToggleMute,
    Scrub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub card: usize,
    pub action: HitAction,
    pub rect: Rect,
}

impl Hit {
    /// Horizontal position of `col` inside the region, in `[0, 1]`.
    pub fn fraction_at(&self, col: u16) -> f64 {
        let span = self.rect.width.saturating_sub(1).max(1) as f64;
        (col.saturating_sub(self.rect.x) as f64 / span).clamp(0.0, 1.0)
    }
}

/// Clickable regions of the last drawn frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    /// Area the page content was drawn into.
    pub content: Rect,
    hits: Vec<Hit>,
}

impl HitMap {
    fn push(&mut self, card: usize, action: HitAction, rect: Rect) {
        self.hits.push(Hit { card, action, rect });
    }

    pub fn at(&self, col: u16, row: u16) -> Option<Hit> {
        self.hits.iter().copied().find(|h| {
            col >= h.rect.x
                && col < h.rect.x + h.rect.width
                && row >= h.rect.y
                && row < h.rect.y + h.rect.height
        })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// A card rendered to lines, plus its clickable spans as
/// `(row, col, width, action)` relative to the card's top-left corner.
struct CardRender {
    lines: Vec<Line<'static>>,
    hits: Vec<(usize, u16, u16, HitAction)>,
}

fn boxed(content: Vec<Span<'static>>, used: usize, inner: usize, border: Style) -> Line<'static> {
    let mut spans = Vec::with_capacity(content.len() + 3);
    spans.push(Span::styled("│", border));
    spans.extend(content);
    spans.push(Span::raw(" ".repeat(inner.saturating_sub(used))));
    spans.push(Span::styled("│", border));
    Line::from(spans)
}

fn centered_in(text: String, style: Style, inner: usize, border: Style) -> Line<'static> {
    let text = fit(&text, inner);
    let w = text.chars().count();
    let left = (inner - w) / 2;
    boxed(
        vec![Span::raw(" ".repeat(left)), Span::styled(text, style)],
        left + w,
        inner,
        border,
    )
}

fn card_lines<M: MediaElement>(
    rc: &ReasonCard<M>,
    focused: bool,
    stage: RevealStage,
    skip_seconds: u64,
    width: u16,
) -> CardRender {
    let inner = width.saturating_sub(2) as usize;
    let state = rc.card.state();

    let base = match stage {
        RevealStage::Hidden => Style::default().fg(Color::DarkGray),
        RevealStage::Entering(_) => Style::default().add_modifier(Modifier::DIM),
        RevealStage::Shown => Style::default(),
    };
    let border = if focused && stage != RevealStage::Hidden {
        base.fg(Color::Magenta)
    } else {
        base
    };

    let mut lines = Vec::with_capacity(CARD_ROWS);
    let mut hits = Vec::new();

    // Title bar with the asset name.
    let title = fit(&format!(" {} ", rc.item.video), inner.saturating_sub(2));
    let fill = inner.saturating_sub(1 + title.chars().count());
    lines.push(Line::from(Span::styled(
        format!("╭─{title}{}╮", "─".repeat(fill)),
        border,
    )));

    // Video panel with the play/pause overlay.
    let overlay = if !rc.card.has_media() {
        ("media unavailable".to_string(), base.add_modifier(Modifier::ITALIC))
    } else if state.is_playing {
        ("❚❚".to_string(), base.add_modifier(Modifier::DIM))
    } else {
        ("▶  paused".to_string(), base.add_modifier(Modifier::BOLD))
    };
    lines.push(boxed(Vec::new(), 0, inner, border));
    lines.push(centered_in(overlay.0, overlay.1, inner, border));
    lines.push(boxed(Vec::new(), 0, inner, border));
    for row in 1..=3 {
        hits.push((row, 1, inner as u16, HitAction::TogglePlay));
    }

    // Control bar.
    let play = if state.is_playing { "[pause]" } else { "[play] " };
    let back = format!("[-{skip_seconds}s]");
    let fwd = format!("[+{skip_seconds}s]");
    let mute = if state.is_muted { "[muted]" } else { "[sound]" };
    let time = format!(
        "{} / {}",
        format_mmss(state.position),
        format_mmss(state.duration)
    );
    let fixed = 1 + play.len() + 1 + back.len() + 1 + fwd.len() + 1 + 1 + time.len() + 1
        + mute.len()
        + 1;
    let bar_w = inner.saturating_sub(fixed);
    let filled = ((state.progress() * bar_w as f64).round() as usize).min(bar_w);

    let mut col = 2u16;
    for (w, action) in [
        (play.len(), HitAction::TogglePlay),
        (back.len(), HitAction::SkipBack),
        (fwd.len(), HitAction::SkipForward),
        (bar_w, HitAction::Scrub),
    ] {
        if w > 0 {
            hits.push((4, col, w as u16, action));
            col += w as u16 + 1;
        }
    }
    col += time.len() as u16 + 1;
    hits.push((4, col, mute.len() as u16, HitAction::ToggleMute));

    let button = base.add_modifier(Modifier::BOLD);
    let controls = vec![
        Span::raw(" "),
        Span::styled(play.to_string(), button),
        Span::raw(" "),
        Span::styled(back, button),
        Span::raw(" "),
        Span::styled(fwd, button),
        Span::raw(" "),
        Span::styled("━".repeat(filled), base.fg(Color::Magenta)),
        Span::styled("─".repeat(bar_w - filled), base),
        Span::raw(if bar_w > 0 { " " } else { "" }),
        Span::styled(time, base),
        Span::raw(" "),
        Span::styled(mute.to_string(), button),
        Span::raw(" "),
    ];
    let used = if bar_w > 0 { fixed + bar_w } else { fixed - 1 };
    lines.push(boxed(controls, used.min(inner), inner, border));

    // Heart, reason and subtext.
    let heart = if stage == RevealStage::Hidden {
        base
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(centered_in("♥".to_string(), heart, inner, border));
    lines.push(centered_in(
        rc.item.reason.clone(),
        base.add_modifier(Modifier::BOLD),
        inner,
        border,
    ));
    lines.push(centered_in(
        rc.item.subtext.clone(),
        base.add_modifier(Modifier::ITALIC),
        inner,
        border,
    ));

    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(inner)),
        border,
    )));

    // Not yet revealed: one row lower, as if still sliding in.
    if stage == RevealStage::Hidden {
        lines.pop();
        lines.insert(0, Line::default());
        hits = hits
            .into_iter()
            .map(|(row, c, w, a)| (row + 1, c, w, a))
            .filter(|(row, ..)| *row < CARD_ROWS)
            .collect();
    }

    CardRender { lines, hits }
}

fn heading_lines(page: &PageSettings) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(emphasized(&page.heading)).centered(),
        Line::from(Span::styled(
            page.subheading.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .centered(),
        Line::default(),
    ]
}

fn closing_lines(page: &PageSettings) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled("♥", Style::default().fg(Color::Red))).centered(),
        Line::from(Span::styled(
            page.closing.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .centered(),
        Line::default(),
    ]
}

fn indent(line: Line<'static>, pad: u16) -> Line<'static> {
    if pad == 0 {
        return line;
    }
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(Span::raw(" ".repeat(pad as usize)));
    spans.extend(line.spans);
    Line::from(spans)
}

fn screen_chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area)
}

/// Area the scrolled page occupies inside a terminal of size `area`.
pub fn content_area(area: Rect) -> Rect {
    screen_chunks(area)[1]
}

/// Render the entire UI into `frame`. Returns the clickable regions.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    page: &Page<M>,
    settings: &Settings,
    reveal: &Reveal,
    now: Instant,
) -> HitMap {
    let chunks = screen_chunks(frame.area());

    // Header
    let header = Paragraph::new(settings.page.title.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" reasons ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Page content
    let area = chunks[1];
    let mut hits = HitMap {
        content: area,
        ..HitMap::default()
    };
    let card_width = area.width.min(MAX_CARD_WIDTH);
    let pad = (area.width - card_width) / 2;
    let view_end = page.scroll + area.height as usize;

    let mut content: Vec<Line<'static>> = Vec::with_capacity(page.layout.content_height());
    content.extend(heading_lines(&settings.page));
    for (i, rc) in page.cards.iter().enumerate() {
        let stage = reveal.stage(i, rc.card.visible_since(), now);
        let render = card_lines(
            rc,
            i == page.focused,
            stage,
            settings.controls.skip_seconds,
            card_width,
        );

        let top = page.layout.card_span(i).top;
        for (row, col, width, action) in render.hits {
            let content_row = top + row;
            if content_row < page.scroll || content_row >= view_end {
                continue;
            }
            let rect = Rect {
                x: area.x + pad + col,
                y: area.y + (content_row - page.scroll) as u16,
                width,
                height: 1,
            };
            hits.push(i, action, rect);
        }

        content.extend(render.lines.into_iter().map(|l| indent(l, pad)));
        content.extend((0..CARD_GAP).map(|_| Line::default()));
    }
    content.extend(closing_lines(&settings.page));

    let visible: Vec<Line<'static>> = content
        .into_iter()
        .skip(page.scroll)
        .take(area.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible), area);

    // Footer
    let footer = Paragraph::new(controls_text(settings.controls.skip_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    hits
}
