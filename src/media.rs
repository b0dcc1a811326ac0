//! Before/after media references attached to maintenance events.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::{event::MaintenanceEvent, record::present};

const DRIVE_HOST: &str = "drive.google.com";
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".webm", ".m4v", ".avi"];

/// File-id patterns for shared Drive links, tried in order.
fn drive_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"/file/d/([A-Za-z0-9_-]+)",
            r"/d/([A-Za-z0-9_-]+)",
            r"[?&]id=([A-Za-z0-9_-]+)",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    })
}

/// Rewrites a shared Google Drive link into its direct-view form. Other URLs,
/// and Drive URLs with no recognizable file id, are returned unchanged.
pub fn convert_drive_url(url: &str) -> String {
    if !url.contains(DRIVE_HOST) {
        return url.to_string();
    }
    drive_id_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(url).and_then(|caps| caps.get(1)))
        .map(|id| format!("https://{DRIVE_HOST}/uc?export=view&id={}", id.as_str()))
        .unwrap_or_else(|| url.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Video for common video file extensions, image otherwise.
    pub fn detect(url: &str) -> MediaKind {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase();
        if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub title: String,
    pub kind: MediaKind,
    /// Display URL, after Drive link conversion.
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventMedia {
    /// Problem records ("before").
    pub event: Vec<MediaItem>,
    /// Solution records ("after").
    pub solution: Vec<MediaItem>,
}

impl EventMedia {
    pub fn is_empty(&self) -> bool {
        self.event.is_empty() && self.solution.is_empty()
    }
}

pub fn event_media(event: &MaintenanceEvent) -> EventMedia {
    EventMedia {
        event: collect(&event.before_media, "Registro del Problema"),
        solution: collect(&event.after_media, "Registro de la Solución"),
    }
}

fn collect(references: &[String; 3], title: &str) -> Vec<MediaItem> {
    references
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let url = present(raw)?;
            Some(MediaItem {
                title: format!("{title} {}", idx + 1),
                kind: MediaKind::detect(url),
                url: convert_drive_url(url),
            })
        })
        .collect()
}
