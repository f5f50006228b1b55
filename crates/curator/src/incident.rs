use serde::{Deserialize, Serialize};

/// The canonical record of a single incident.
///
/// Apart from `id`, every field may be empty (or `null`); a value is
/// only present, if one of the sources supplied it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,
    pub name: String,
    pub age: Option<u32>,
    /// The raw race code of the primary source, e.g. `"B"`.
    pub race: String,
    pub gender: String,
    /// The raw weapon description of the primary source.
    pub armed: String,
    /// The location in the form `"<city>, <state>"`.
    pub location: String,
    pub date: String,
    pub description: String,
    /// The URL of a photo.
    pub photo: String,
    /// The canonical video reference (a bare video id).
    pub video: String,
    /// A secondary video reference, which couldn't be folded into
    /// `video`.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub embed: String,
    /// A link to a news article.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub news: String,
}

impl Incident {
    /// Returns `true` if the record carries any video reference.
    #[inline]
    pub fn has_video(&self) -> bool {
        !self.video.trim().is_empty() || !self.embed.trim().is_empty()
    }
}
