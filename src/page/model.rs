use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::card::MediaCard;

/// One reason on the page and the video that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonItem {
    pub id: u32,
    /// Asset name, resolved against the media directory.
    pub video: String,
    pub reason: String,
    pub subtext: String,
}

impl ReasonItem {
    fn new(id: u32, video: &str, reason: &str, subtext: &str) -> Self {
        Self {
            id,
            video: video.to_string(),
            reason: reason.to_string(),
            subtext: subtext.to_string(),
        }
    }
}

/// The reasons shown when the config does not list any.
pub fn default_reasons() -> Vec<ReasonItem> {
    vec![
        ReasonItem::new(
            1,
            "anni.MP4",
            "Because we've built so many memories",
            "Each moment with you is a treasure I never want to lose",
        ),
        ReasonItem::new(
            2,
            "pp.MP4",
            "Because you understand me like no one else",
            "You see the real me and love me anyway",
        ),
        ReasonItem::new(
            3,
            "chatruamu.mov",
            "Because I can't imagine my future without you",
            "Every dream I have includes you by my side",
        ),
        ReasonItem::new(
            4,
            "hand.MOV",
            "Because you make me want to be better",
            "You inspire me to grow every single day",
        ),
    ]
}

/// A reason paired with the card playing its video.
pub struct ReasonCard<M> {
    pub item: ReasonItem,
    /// Resolved asset file, `None` when the video was not found.
    pub path: Option<PathBuf>,
    pub card: MediaCard<M>,
}
