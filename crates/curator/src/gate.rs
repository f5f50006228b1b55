use crate::incident::Incident;

/// Returns `true` if the incident carries enough content to be
/// published in full: a photo, a video reference (canonical or
/// secondary) and a description.
#[inline]
pub fn is_sufficient(incident: &Incident) -> bool {
    !incident.photo.trim().is_empty()
        && incident.has_video()
        && !incident.description.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(photo: &str, video: &str, embed: &str, desc: &str) -> Incident {
        Incident {
            id: 1,
            photo: photo.into(),
            video: video.into(),
            embed: embed.into(),
            description: desc.into(),
            ..Default::default()
        }
    }

    #[test]
    fn is_sufficient_requires_all_content() {
        assert!(is_sufficient(&incident("p", "v", "", "d")));
        assert!(is_sufficient(&incident("p", "", "https://vimeo.com/1", "d")));

        assert!(!is_sufficient(&incident("", "v", "", "d")));
        assert!(!is_sufficient(&incident("p", "", "", "d")));
        assert!(!is_sufficient(&incident("p", "v", "", "")));
        assert!(!is_sufficient(&incident("p", "v", "", "   ")));
        assert!(!is_sufficient(&Incident::default()));
    }
}
