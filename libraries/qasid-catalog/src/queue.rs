//! Queue building
//!
//! Turns catalog records into playable [`Track`] lists with canonical
//! composite ids, ready for `PlayerController::set_queue`.

use crate::surahs::surah_title;
use crate::types::{Moshaf, Nasheed, Reciter};
use qasid_core::{AudioReference, Track, TrackId};
use tracing::debug;

/// Artist shown for nasheeds without an Arabic title
pub const DEFAULT_NASHEED_ARTIST: &str = "Nasheed";

/// Surah numbers of a moshaf's `surah_list`, in listed order
///
/// Entries that are not positive integers are skipped.
pub fn parse_surah_list(list: &str) -> Vec<u16> {
    list.split(',')
        .filter_map(|entry| entry.trim().parse::<u16>().ok())
        .filter(|number| *number > 0)
        .collect()
}

/// Audio URL of one surah in a moshaf
pub fn surah_audio_url(moshaf: &Moshaf, surah_number: u16) -> String {
    let server = moshaf.server.trim();
    let separator = if server.ends_with('/') { "" } else { "/" };
    format!("{server}{separator}{surah_number:03}.mp3")
}

/// Track for one surah recited by `reciter`
pub fn surah_track(reciter: &Reciter, moshaf: &Moshaf, surah_number: u16) -> Track {
    let mut track = Track::new(
        TrackId::recitation(&reciter.id, surah_number),
        surah_title(surah_number),
        AudioReference::from_raw(surah_audio_url(moshaf, surah_number)),
    )
    .with_artist(reciter.name.clone());

    if let Some(image) = reciter.image_path.as_deref().filter(|path| !path.is_empty()) {
        track = track.with_artwork(AudioReference::from_raw(image));
    }
    track
}

/// Queue of every surah in the reciter's primary moshaf
///
/// Empty when the reciter has no moshaf, or the moshaf lacks a server or a
/// surah list.
pub fn reciter_queue(reciter: &Reciter) -> Vec<Track> {
    let Some(moshaf) = reciter.primary_moshaf() else {
        debug!("Reciter {} has no moshaf", reciter.id);
        return Vec::new();
    };
    if moshaf.server.trim().is_empty() || moshaf.surah_list.trim().is_empty() {
        debug!("Moshaf {} of reciter {} is incomplete", moshaf.id, reciter.id);
        return Vec::new();
    }

    parse_surah_list(&moshaf.surah_list)
        .into_iter()
        .map(|number| surah_track(reciter, moshaf, number))
        .collect()
}

/// Track for a nasheed, `None` when it has no audio
pub fn nasheed_track(nasheed: &Nasheed) -> Option<Track> {
    let audio = nasheed.audio_path.trim();
    if audio.is_empty() {
        return None;
    }

    let artist = match nasheed.title_ar.trim() {
        "" => DEFAULT_NASHEED_ARTIST,
        title => title,
    };

    Some(
        Track::new(
            TrackId::nasheed(&nasheed.id),
            nasheed.title_en.clone(),
            AudioReference::from_raw(audio),
        )
        .with_artist(artist),
    )
}

/// Queue of active, playable nasheeds in the given order
pub fn nasheed_queue(nasheeds: &[Nasheed]) -> Vec<Track> {
    nasheeds
        .iter()
        .filter(|nasheed| nasheed.is_active)
        .filter_map(nasheed_track)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reciter(server: &str, surah_list: &str) -> Reciter {
        Reciter {
            id: "7".to_string(),
            name: "Mishary Alafasy".to_string(),
            arabic_name: None,
            image_path: Some("reciters/7.jpg".to_string()),
            description: None,
            moshaf: vec![Moshaf {
                id: 1,
                name: Some("Hafs".to_string()),
                server: server.to_string(),
                surah_total: 114,
                moshaf_type: 11,
                surah_list: surah_list.to_string(),
            }],
        }
    }

    fn nasheed(id: &str, title_ar: &str, audio_path: &str, is_active: bool) -> Nasheed {
        Nasheed {
            id: id.to_string(),
            title_en: format!("Nasheed {id}"),
            title_ar: title_ar.to_string(),
            audio_path: audio_path.to_string(),
            is_active,
            kind: Vec::new(),
            popularity_score: 0.0,
            published_at: None,
        }
    }

    #[test]
    fn surah_list_skips_garbage() {
        assert_eq!(parse_surah_list("1, 2,x,,114, 0"), vec![1, 2, 114]);
        assert!(parse_surah_list("").is_empty());
    }

    #[test]
    fn reciter_queue_builds_padded_urls() {
        let queue = reciter_queue(&reciter("https://server8.mp3quran.net/afs/", "1,2,114"));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue[0].id.as_str(), "quran:7:1");
        assert_eq!(queue[0].title, "Al-Fatihah");
        assert_eq!(queue[0].artist.as_deref(), Some("Mishary Alafasy"));
        assert_eq!(
            queue[2].audio,
            AudioReference::Url("https://server8.mp3quran.net/afs/114.mp3".to_string())
        );
        assert_eq!(
            queue[0].artwork,
            Some(AudioReference::StoragePath("reciters/7.jpg".to_string()))
        );
    }

    #[test]
    fn server_without_trailing_slash() {
        let queue = reciter_queue(&reciter("https://server.example.com/afs", "9"));
        assert_eq!(queue[0].audio.as_str(), "https://server.example.com/afs/009.mp3");
    }

    #[test]
    fn incomplete_moshaf_yields_empty_queue() {
        assert!(reciter_queue(&reciter("", "1,2")).is_empty());
        assert!(reciter_queue(&reciter("https://server.example.com/", " ")).is_empty());

        let mut without_moshaf = reciter("https://server.example.com/", "1");
        without_moshaf.moshaf.clear();
        assert!(reciter_queue(&without_moshaf).is_empty());
    }

    #[test]
    fn nasheed_queue_filters_and_falls_back() {
        let nasheeds = vec![
            nasheed("a", "طلع البدر", "nasheeds/a.mp3", true),
            nasheed("b", "", "https://cdn.example.com/b.mp3", true),
            nasheed("c", "", "", true),
            nasheed("d", "", "nasheeds/d.mp3", false),
        ];

        let queue = nasheed_queue(&nasheeds);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].id.as_str(), "nasheed:a");
        assert_eq!(queue[0].artist.as_deref(), Some("طلع البدر"));
        assert!(queue[0].audio.needs_resolution());
        assert_eq!(queue[1].artist.as_deref(), Some(DEFAULT_NASHEED_ARTIST));
        assert!(!queue[1].audio.needs_resolution());
    }

    proptest! {
        #[test]
        fn queue_ids_are_unique(numbers in proptest::collection::btree_set(1u16..=114, 0..40)) {
            let list = numbers.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
            let queue = reciter_queue(&reciter("https://server.example.com/", &list));

            let ids: std::collections::HashSet<_> = queue.iter().map(|track| track.id.clone()).collect();
            prop_assert_eq!(ids.len(), numbers.len());
        }
    }
}
