use std::time::{Duration, Instant};

/// How far a card's fade/slide-in has progressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealStage {
    /// Not visible, or still waiting out its stagger delay.
    Hidden,
    /// Fading in; carries progress in `[0, 1)`.
    Entering(f32),
    Shown,
}

/// Timing of the scroll-triggered fade-in. Card `i` starts `i * stagger` after
/// becoming visible and takes `duration` to complete.
#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    pub duration: Duration,
    pub stagger: Duration,
}

impl Default for Reveal {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(700),
            stagger: Duration::from_millis(120),
        }
    }
}

impl Reveal {
    pub fn stage(&self, index: usize, visible_since: Option<Instant>, now: Instant) -> RevealStage {
        let Some(since) = visible_since else {
            return RevealStage::Hidden;
        };

        let delay = self.stagger * index.min(u32::MAX as usize) as u32;
        let elapsed = now.saturating_duration_since(since);
        if elapsed < delay {
            return RevealStage::Hidden;
        }

        let t = elapsed - delay;
        if self.duration.is_zero() || t >= self.duration {
            RevealStage::Shown
        } else {
            RevealStage::Entering(t.as_secs_f32() / self.duration.as_secs_f32())
        }
    }
}
