use crate::collate::{JoinedTuple, Source, PRIMARY_KEY};
use crate::error::{CuratorError, CuratorResult};
use crate::incident::Incident;
use crate::period::normalize_date;

/// An ordered list of `(source, field)` pairs. The first non-empty
/// value wins.
pub type Precedence = &'static [(Source, &'static str)];

pub const DESCRIPTION: Precedence = &[
    (Source::Overrides, "description"),
    (Source::Descriptions, "description"),
    (Source::Videos, "mpv_description"),
];

pub const PHOTO: Precedence = &[
    (Source::Overrides, "photo"),
    (Source::Descriptions, "photo"),
];

pub const VIDEO: Precedence = &[
    (Source::Overrides, "video"),
    (Source::Videos, "video_id"),
];

pub const EMBED: Precedence = &[(Source::News, "video")];

pub const NEWS: Precedence = &[
    (Source::Overrides, "news"),
    (Source::News, "news"),
    (Source::Descriptions, "news_link"),
];

/// Returns the first non-empty value according to `precedence`.
pub fn resolve(tuple: &JoinedTuple<'_>, precedence: Precedence) -> String {
    precedence
        .iter()
        .flat_map(|&(source, field)| {
            tuple.slot(source).iter().map(move |&row| row.get(field))
        })
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[inline]
fn primary(tuple: &JoinedTuple<'_>, field: &str) -> String {
    tuple.primary.get(field).trim().to_string()
}

fn location(tuple: &JoinedTuple<'_>) -> String {
    let city = tuple.primary.get("city").trim();
    let state = tuple.primary.get("state").trim();

    match (city.is_empty(), state.is_empty()) {
        (false, false) => format!("{city}, {state}"),
        (false, true) => city.to_string(),
        (true, false) => state.to_string(),
        (true, true) => String::new(),
    }
}

/// Collapses a joined tuple into a single [Incident].
///
/// Identity and demographic fields are taken from the primary row
/// only; the media and narrative fields are resolved through the
/// precedence tables of this module. A primary row without a valid
/// numeric id yields [CuratorError::InvalidId].
pub fn merge(tuple: &JoinedTuple<'_>) -> CuratorResult<Incident> {
    let raw_id = tuple.primary.get(PRIMARY_KEY);
    let id = raw_id
        .trim()
        .parse::<u64>()
        .map_err(|_| CuratorError::InvalidId(raw_id.to_string()))?;

    Ok(Incident {
        id,
        name: primary(tuple, "name"),
        age: tuple.primary.get("age").trim().parse::<u32>().ok(),
        race: primary(tuple, "race"),
        gender: primary(tuple, "gender"),
        armed: primary(tuple, "armed"),
        location: location(tuple),
        date: normalize_date(tuple.primary.get("date")),
        description: resolve(tuple, DESCRIPTION),
        photo: resolve(tuple, PHOTO),
        video: resolve(tuple, VIDEO),
        embed: resolve(tuple, EMBED),
        news: resolve(tuple, NEWS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;
    use crate::table::Row;

    type TestResult = anyhow::Result<()>;

    fn tuple<'a>(primary: &'a Row) -> JoinedTuple<'a> {
        JoinedTuple {
            primary,
            descriptions: vec![],
            news: vec![],
            videos: vec![],
            overrides: vec![],
        }
    }

    #[test]
    fn merge_primary_only() -> TestResult {
        let primary = row! {
            "id" => "12",
            "date" => "3/4/2019",
            "race" => "B",
            "armed" => "unarmed",
        };

        let incident = merge(&tuple(&primary))?;
        assert_eq!(incident.id, 12);
        assert_eq!(incident.race, "B");
        assert_eq!(incident.armed, "unarmed");
        assert_eq!(incident.date, "2019-03-04");
        assert_eq!(incident.age, None);
        assert!(incident.photo.is_empty());
        assert!(incident.video.is_empty());
        assert!(incident.description.is_empty());
        Ok(())
    }

    #[test]
    fn merge_invalid_id() {
        for raw in ["", "abc", "-1", "1.5"] {
            let primary = row! { "id" => raw };
            assert_eq!(
                merge(&tuple(&primary)),
                Err(CuratorError::InvalidId(raw.into()))
            );
        }
    }

    #[test]
    fn merge_location_and_age() -> TestResult {
        let primary = row! {
            "id" => "1",
            "age" => "34",
            "city" => "Portland",
            "state" => "OR",
        };

        let incident = merge(&tuple(&primary))?;
        assert_eq!(incident.location, "Portland, OR");
        assert_eq!(incident.age, Some(34));

        let primary = row! { "id" => "1", "age" => "unknown", "state" => "OR" };
        let incident = merge(&tuple(&primary))?;
        assert_eq!(incident.location, "OR");
        assert_eq!(incident.age, None);
        Ok(())
    }

    #[test]
    fn merge_field_precedence() -> TestResult {
        let primary = row! { "id" => "7", "race" => "W" };
        let description = row! {
            "wapo_id" => "7",
            "photo" => "https://example.org/p.jpg",
            "description" => "",
            "news_link" => "https://example.org/mpv",
        };
        let video = row! {
            "wapo_id" => "7",
            "video_id" => "dQw4w9WgXcQ",
            "mpv_description" => "fallback",
        };
        let news = row! {
            "wapo_id" => "7",
            "video" => "https://youtu.be/aaaaaaaaaaa",
            "news" => "https://example.org/news",
        };

        let mut tuple = tuple(&primary);
        tuple.descriptions.push(&description);
        tuple.videos.push(&video);
        tuple.news.push(&news);

        let incident = merge(&tuple)?;
        assert_eq!(incident.photo, "https://example.org/p.jpg");
        assert_eq!(incident.description, "fallback");
        assert_eq!(incident.video, "dQw4w9WgXcQ");
        assert_eq!(incident.embed, "https://youtu.be/aaaaaaaaaaa");
        assert_eq!(incident.news, "https://example.org/news");
        Ok(())
    }

    #[test]
    fn merge_override_wins_except_core_fields() -> TestResult {
        let primary = row! { "id" => "7", "race" => "W", "name" => "X" };
        let description = row! { "wapo_id" => "7", "photo" => "a.jpg" };
        let manual = row! {
            "id" => "7",
            "photo" => "b.jpg",
            "race" => "B",
            "name" => "Y",
            "unrelated" => "leak",
        };

        let mut tuple = tuple(&primary);
        tuple.descriptions.push(&description);
        tuple.overrides.push(&manual);

        let incident = merge(&tuple)?;
        assert_eq!(incident.photo, "b.jpg");
        assert_eq!(incident.race, "W");
        assert_eq!(incident.name, "X");
        Ok(())
    }

    #[test]
    fn resolve_skips_blank_values() {
        let primary = row! { "id" => "1" };
        let first = row! { "wapo_id" => "1", "photo" => "  " };
        let second = row! { "wapo_id" => "1", "photo" => "p.jpg" };

        let mut tuple = tuple(&primary);
        tuple.descriptions.push(&first);
        tuple.descriptions.push(&second);

        assert_eq!(resolve(&tuple, PHOTO), "p.jpg");
        assert_eq!(resolve(&tuple, NEWS), "");
    }
}
