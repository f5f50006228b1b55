use std::sync::LazyLock;

use regex::Regex;

use crate::incident::Incident;

/// Length of a canonical video id.
pub const VIDEO_ID_LEN: usize = 11;

/// Matches URLs on a YouTube host (`youtube.com`, its subdomains,
/// `youtube-nocookie.com` and `youtu.be`), with or without a scheme.
static RE_VIDEO_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[a-z][a-z0-9+.-]*://)?(?:[\w-]+\.)*(?:youtube(?:-nocookie)?\.com|youtu\.be)(?::\d+)?/",
    )
    .unwrap()
});

/// Matches the short-link (`youtu.be/<id>`), `v/<id>`, user-embed
/// (`u/<x>/<id>`), `embed/<id>` and query-parameter (`v=<id>`) URL
/// shapes. The last marker in the URL wins.
static RE_VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)")
        .unwrap()
});

/// The result of [repair].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub record: Incident,
    pub repaired: bool,
}

/// Returns `true` if `value` looks like a URL rather than a bare video
/// id.
pub fn is_url(value: &str) -> bool {
    let value = value.trim();
    value.contains("://")
        || value.starts_with("www.")
        || value.starts_with("youtu.be/")
        || value.starts_with("youtube.com/")
}

/// Extracts the canonical video id from a YouTube URL. URLs of any
/// other host yield `None`.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let url = url.trim();
    if !RE_VIDEO_HOST.is_match(&url.to_ascii_lowercase()) {
        return None;
    }

    let id = RE_VIDEO_URL.captures(url)?.get(1)?.as_str();

    if id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Some(id)
    } else {
        None
    }
}

/// Folds the secondary embed reference of `incident` into its
/// canonical video reference.
///
/// If the embed is a URL with an extractable id, the embed is cleared
/// and the id becomes the canonical reference, unless the record
/// already has one from a dedicated video source. Anything else is
/// returned unchanged.
pub fn repair(mut incident: Incident) -> Repaired {
    if !is_url(&incident.embed) {
        return Repaired {
            record: incident,
            repaired: false,
        };
    }

    let Some(id) = extract_video_id(&incident.embed).map(str::to_string)
    else {
        log::debug!(
            "unable to repair embed of incident {} ({})",
            incident.id,
            incident.embed
        );

        return Repaired {
            record: incident,
            repaired: false,
        };
    };

    if incident.video.trim().is_empty() {
        incident.video = id;
    }

    incident.embed.clear();

    Repaired {
        record: incident,
        repaired: true,
    }
}
