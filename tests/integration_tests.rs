//! # Integration Tests for Cadence
//!
//! End-to-end checks of playlist construction through the public API:
//! config-built scorers, seeded builds, prefix handling and stopping rules.

use anyhow::Result;
use cadence::composite::CompositeScorer;
use cadence::config::PlaylistConfig;
use cadence::item::{AttributeValue, Item, Song};
use cadence::playlist::{PlaylistRequest, RatedLibrary, StopReason};
use cadence::scorer::{PreferenceScorer, RepetitionRule, RepetitionScorer, Scorer, TempoScorer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Test helper: a varied library of `count` songs
fn create_test_library(count: usize) -> Vec<Song> {
    let genres = ["Rock", "Jazz", "Folk", "Soul"];
    (0..count)
        .map(|i| {
            Song::new(format!("Song {i:03}"), 150.0 + (i % 7) as f64 * 20.0)
                .with_artist(format!("Artist {}", i % 9))
                .with_genre(genres[i % genres.len()])
                .with_bpm(60.0 + (i % 13) as f64 * 6.0)
                .with_rating(((i * 37) % 100) as f64 / 100.0)
        })
        .collect()
}

fn default_scorer() -> CompositeScorer<Song> {
    PlaylistConfig::default()
        .build_scorer()
        .expect("default config is valid")
}

#[cfg(test)]
mod build_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_playlist() -> Result<()> {
        let songs = create_test_library(60);
        let rated = RatedLibrary::new(&songs, default_scorer());
        let request = PlaylistRequest::default().with_play_length(3600.0);

        for seed in 0..10 {
            let first = rated.create_playlist(&[], &request, &mut StdRng::seed_from_u64(seed))?;
            let second = rated.create_playlist(&[], &request, &mut StdRng::seed_from_u64(seed))?;

            assert_eq!(first.len(), second.len());
            assert!(first
                .items
                .iter()
                .zip(&second.items)
                .all(|(a, b)| std::ptr::eq(*a, *b)));
        }
        Ok(())
    }

    #[test]
    fn test_prefix_never_returned() -> Result<()> {
        let songs = create_test_library(40);
        let rated = RatedLibrary::new(&songs, default_scorer());
        let prefix: Vec<&Song> = songs.iter().step_by(5).collect();

        for seed in 0..10 {
            let result = rated.create_playlist(
                &prefix,
                &PlaylistRequest::default(),
                &mut StdRng::seed_from_u64(seed),
            )?;
            for song in &result.items {
                assert!(
                    prefix.iter().all(|queued| !std::ptr::eq(*queued, *song)),
                    "queued song {} was selected again",
                    song.title
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_no_song_selected_twice() -> Result<()> {
        let songs = create_test_library(30);
        let rated = RatedLibrary::new(&songs, default_scorer());

        let result = rated.create_playlist(
            &[],
            &PlaylistRequest::default(),
            &mut StdRng::seed_from_u64(99),
        )?;

        let mut seen: HashMap<*const Song, usize> = HashMap::new();
        for song in &result.items {
            *seen.entry(*song as *const Song).or_default() += 1;
        }
        assert!(seen.values().all(|&count| count == 1));
        Ok(())
    }

    #[test]
    fn test_length_goal_overshoots_by_at_most_one_song() -> Result<()> {
        let songs = create_test_library(80);
        let rated = RatedLibrary::new(&songs, default_scorer());
        let goal = 2400.0;
        let longest = songs.iter().map(|s| s.length).fold(0.0, f64::max);

        for seed in 0..20 {
            let result = rated.create_playlist(
                &[],
                &PlaylistRequest::default().with_play_length(goal),
                &mut StdRng::seed_from_u64(seed),
            )?;

            let lengths: Vec<f64> = result.items.iter().map(|s| s.length).collect();
            let before_last: f64 = lengths[..lengths.len() - 1].iter().sum();

            match result.stop {
                StopReason::LengthReached => {
                    assert!(result.total_length >= goal);
                    assert!(before_last < goal, "loop continued past the goal");
                    assert!(result.total_length < goal + longest);
                }
                StopReason::NothingAcceptable | StopReason::PoolExhausted => {
                    assert!(result.total_length < goal);
                }
                other => panic!("unexpected stop reason {other}"),
            }
        }
        Ok(())
    }

    #[test]
    fn test_item_limit_yields_one_extra_song() -> Result<()> {
        let songs: Vec<Song> = (0..30)
            .map(|i| Song::new(format!("Song {i}"), 200.0).with_rating(0.5))
            .collect();
        let scorer = CompositeScorer::new().with_scorer(1.0, PreferenceScorer::default());
        let rated = RatedLibrary::new(&songs, scorer);

        let result = rated.create_playlist(
            &[],
            &PlaylistRequest::default().with_num_items(10),
            &mut StdRng::seed_from_u64(1),
        )?;
        assert_eq!(result.len(), 11);
        assert_eq!(result.stop, StopReason::ItemLimit);

        let small = &songs[..4];
        let rated = RatedLibrary::new(
            small,
            CompositeScorer::new().with_scorer(1.0, PreferenceScorer::default()),
        );
        let result = rated.create_playlist(
            &[],
            &PlaylistRequest::default().with_num_items(10),
            &mut StdRng::seed_from_u64(1),
        )?;
        assert_eq!(result.len(), 4);
        assert_eq!(result.stop, StopReason::PoolExhausted);
        Ok(())
    }

    #[test]
    fn test_prefix_consuming_whole_library() -> Result<()> {
        let songs = create_test_library(3);
        let rated = RatedLibrary::new(&songs, default_scorer());
        let prefix: Vec<&Song> = songs.iter().collect();

        let result = rated.create_playlist_default(&prefix, &PlaylistRequest::default())?;
        assert!(result.is_empty());
        assert_eq!(result.total_length, songs.iter().map(|s| s.length).sum::<f64>());
        Ok(())
    }

    #[test]
    fn test_generated_playlist_respects_repetition_rules() -> Result<()> {
        let songs = create_test_library(60);
        let scorer = CompositeScorer::new()
            .with_scorer(1.0, PreferenceScorer::default())
            .with_scorer(0.5, TempoScorer::default())
            .with_modifier(
                1.0,
                RepetitionScorer::new(vec![
                    RepetitionRule::new("genre", 1, 0.5),
                    RepetitionRule::new("artist", 0, 0.5),
                ]),
            );
        let rated = RatedLibrary::new(&songs, scorer);

        for seed in 0..10 {
            let result = rated.create_playlist(
                &[],
                &PlaylistRequest::default(),
                &mut StdRng::seed_from_u64(seed),
            )?;

            for window in result.items.windows(3) {
                let genres: Vec<_> = window.iter().map(|s| s.genre.as_deref()).collect();
                assert!(
                    !(genres[0] == genres[1] && genres[1] == genres[2]),
                    "three songs of one genre in a row"
                );
            }
            // Artist repeats are vetoed once two songs of history exist.
            for (index, pair) in result.items.windows(2).enumerate().skip(1) {
                assert_ne!(pair[0].artist, pair[1].artist, "artist repeated at {index}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_debug_records_every_selection() -> Result<()> {
        let songs = create_test_library(25);
        let rated = RatedLibrary::new(&songs, default_scorer());

        let result = rated.create_playlist(
            &[],
            &PlaylistRequest::default().with_num_items(5).with_debug(true),
            &mut StdRng::seed_from_u64(17),
        )?;

        assert_eq!(result.diagnostics.len(), result.len());
        for record in result.diagnostics.records() {
            let tags = record.score_tags();
            assert!(tags.contains_key("score_preference"));
            assert!(tags.contains_key("score_tempo"));
            assert!(tags.contains_key("score_repetition"));
            assert_eq!(tags["score_total"], record.score);
            assert!(record.score > 0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod host_item_tests {
    use super::*;

    /// A host track type that keeps every tag as a string.
    struct HostTrack {
        tags: HashMap<&'static str, &'static str>,
    }

    impl Item for HostTrack {
        fn attribute(&self, name: &str) -> Option<AttributeValue> {
            self.tags.get(name).map(|value| AttributeValue::from(*value))
        }
    }

    fn track(title: &'static str, bpm: &'static str, length: &'static str) -> HostTrack {
        HostTrack {
            tags: HashMap::from([("title", title), ("bpm", bpm), ("length", length)]),
        }
    }

    #[test]
    fn test_string_tagged_items_are_scored_and_timed() -> Result<()> {
        let tracks = vec![
            track("Slow", "70", "240"),
            track("Fast", "160", "180"),
            track("Broken", "n/a", "200"),
        ];

        let tempo = TempoScorer::default();
        assert_eq!(tempo.rate(&tracks[0], &[]), 1.25);
        assert_eq!(tempo.rate(&tracks[1], &[]), 0.0);
        assert_eq!(tempo.rate(&tracks[2], &[]), 0.0);

        let rated = RatedLibrary::new(&tracks, CompositeScorer::new().with_scorer(1.0, tempo));
        let result = rated.create_playlist(
            &[],
            &PlaylistRequest::default(),
            &mut StdRng::seed_from_u64(3),
        )?;

        assert_eq!(result.len(), 1);
        assert_eq!(result.items[0].label(), "Slow");
        assert_eq!(result.total_length, 240.0);
        assert_eq!(result.stop, StopReason::NothingAcceptable);
        Ok(())
    }
}
