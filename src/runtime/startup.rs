use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::assets::AssetIndex;
use crate::card::{CardOptions, MediaCard};
use crate::config;
use crate::media::{MediaElement, MediaRuntime, RodioElement};
use crate::page::{Page, ReasonCard, ReasonItem, Reveal};

pub fn card_options(settings: &config::Settings) -> CardOptions {
    CardOptions {
        threshold: settings.viewport.threshold,
        autoplay: settings.media.autoplay,
        start_muted: settings.media.start_muted,
    }
}

pub fn reveal(settings: &config::Settings) -> Reveal {
    Reveal {
        duration: Duration::from_millis(settings.reveal.duration_ms),
        stagger: Duration::from_millis(settings.reveal.stagger_ms),
    }
}

/// Pair each reason with a card. `open` creates the element for card `i` from its
/// resolved asset path.
pub fn build_cards<M: MediaElement>(
    reasons: Vec<ReasonItem>,
    assets: &AssetIndex,
    options: CardOptions,
    mut open: impl FnMut(usize, &Path) -> M,
) -> Vec<ReasonCard<M>> {
    reasons
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let path = assets.resolve(&item.video);
            let media = match path.as_ref() {
                Some(p) => {
                    debug!(card = i, path = %p.display(), "asset resolved");
                    Some(open(i, p))
                }
                None => {
                    warn!(card = i, video = %item.video, "asset not found, card has no media");
                    None
                }
            };
            ReasonCard {
                item,
                path,
                card: MediaCard::new(i, media, options),
            }
        })
        .collect()
}

pub fn build_page(
    settings: &config::Settings,
    assets: &AssetIndex,
    media: &MediaRuntime,
) -> Page<RodioElement> {
    let cards = build_cards(
        settings.effective_reasons(),
        assets,
        card_options(settings),
        |i, path| media.element(i, path),
    );
    Page::new(cards)
}
