//! Catalog records as served by the content backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Reciter with one or more recorded collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reciter {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arabic_name: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub moshaf: Vec<Moshaf>,
}

impl Reciter {
    /// Collection used to build the reciter's queue
    pub fn primary_moshaf(&self) -> Option<&Moshaf> {
        self.moshaf.first()
    }
}

/// One recorded collection (riwayah) of a reciter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moshaf {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Base URL; surah files live at `<server>NNN.mp3`
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub surah_total: u16,
    #[serde(default)]
    pub moshaf_type: u32,
    /// Comma-separated surah numbers, e.g. `"1,2,3,114"`
    #[serde(default)]
    pub surah_list: String,
}

/// Mood tags a nasheed can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NasheedKind {
    All,
    Beautiful,
    NightReflection,
    Kids,
    Motivation,
}

/// Nasheed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nasheed {
    pub id: String,
    pub title_en: String,
    #[serde(default)]
    pub title_ar: String,
    /// Direct URL or storage-relative path
    #[serde(default)]
    pub audio_path: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub kind: Vec<NasheedKind>,
    #[serde(default)]
    pub popularity_score: f64,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciter_id_accepts_numbers_and_strings() {
        let numeric: Reciter =
            serde_json::from_str(r#"{"id": 7, "name": "Mishary Alafasy"}"#).unwrap();
        assert_eq!(numeric.id, "7");
        assert!(numeric.primary_moshaf().is_none());

        let text: Reciter = serde_json::from_str(r#"{"id": "abc", "name": "Reciter"}"#).unwrap();
        assert_eq!(text.id, "abc");
    }

    #[test]
    fn nasheed_document() {
        let nasheed: Nasheed = serde_json::from_str(
            r#"{
                "id": "n1",
                "title_en": "Tala al Badru",
                "title_ar": "طلع البدر",
                "audio_path": "nasheeds/tala.mp3",
                "is_active": true,
                "kind": ["beautiful", "night_reflection"],
                "popularity_score": 12.5,
                "publishedAt": "2024-03-01"
            }"#,
        )
        .unwrap();

        assert_eq!(
            nasheed.kind,
            vec![NasheedKind::Beautiful, NasheedKind::NightReflection]
        );
        assert_eq!(nasheed.published_at.as_deref(), Some("2024-03-01"));
    }
}
