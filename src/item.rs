//! Candidate items and the attribute capability the scorers read through.
//!
//! The scoring engine never assumes a concrete song representation. Anything
//! that can answer `attribute(name)` can be rated and placed in a playlist,
//! which lets a host library wrap its own track type without copying it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tempo in beats per minute.
pub const TEMPO: &str = "bpm";
/// User rating, already normalized by the host library.
pub const RATING: &str = "rating";
/// Play length in seconds.
pub const DURATION: &str = "length";
pub const GENRE: &str = "genre";
pub const ARTIST: &str = "artist";
pub const TITLE: &str = "title";

/// A single attribute value as stored by the host library.
///
/// Hosts commonly keep every tag as text, so numeric reads go through
/// [`AttributeValue::as_number`], which accepts text that parses as a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric view of the value, `None` when it cannot be coerced.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        number.filter(|n| n.is_finite())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Named attribute lookup for a playlist candidate.
///
/// Items are identified by address, not by value: two songs with identical
/// tags are still two different candidates.
pub trait Item {
    /// Look up an attribute by name. Absence is a normal answer, not an error.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Numeric attribute, `None` if absent or not coercible.
    fn number(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(|value| value.as_number())
    }

    /// Human-readable label used in logs and diagnostics.
    fn label(&self) -> String {
        self.attribute(TITLE)
            .map_or_else(|| "<untitled>".to_string(), |value| value.to_string())
    }
}

impl<T: Item + ?Sized> Item for &T {
    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        (**self).attribute(name)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

/// A song as read from a JSON library file.
///
/// Well-known fields map onto the attribute names above; anything else lives
/// in `tags` and is reachable through [`Item::attribute`] as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub length: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, AttributeValue>,
}

impl Song {
    #[must_use]
    pub fn new(title: impl Into<String>, length: f64) -> Self {
        Self {
            title: title.into(),
            length,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }
}

impl Item for Song {
    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            TITLE => Some(AttributeValue::Text(self.title.clone())),
            ARTIST => self.artist.clone().map(AttributeValue::Text),
            GENRE => self.genre.clone().map(AttributeValue::Text),
            TEMPO => self.bpm.map(AttributeValue::Number),
            RATING => self.rating.map(AttributeValue::Number),
            DURATION => Some(AttributeValue::Number(self.length)),
            other => self.tags.get(other).cloned(),
        }
    }

    fn label(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{artist} - {}", self.title),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_attributes_coerce_to_numbers() {
        assert_eq!(AttributeValue::from("120").as_number(), Some(120.0));
        assert_eq!(AttributeValue::from(" 98.5 ").as_number(), Some(98.5));
        assert_eq!(AttributeValue::from("fast").as_number(), None);
        assert_eq!(AttributeValue::from("NaN").as_number(), None);
    }

    #[test]
    fn test_song_exposes_fields_and_tags() {
        let song = Song::new("Blue in Green", 337.0)
            .with_artist("Miles Davis")
            .with_genre("Jazz")
            .with_bpm(62.0)
            .with_tag("album", "Kind of Blue");

        assert_eq!(song.number(TEMPO), Some(62.0));
        assert_eq!(song.number(DURATION), Some(337.0));
        assert_eq!(song.attribute(GENRE), Some(AttributeValue::from("Jazz")));
        assert_eq!(song.attribute("album"), Some(AttributeValue::from("Kind of Blue")));
        assert_eq!(song.attribute(RATING), None);
        assert_eq!(song.label(), "Miles Davis - Blue in Green");
    }

    #[test]
    fn test_song_deserializes_from_library_json() {
        let json = r#"{"title": "So What", "bpm": 136, "length": 562, "tags": {"year": "1959"}}"#;
        let song: Song = serde_json::from_str(json).expect("valid song json");

        assert_eq!(song.bpm, Some(136.0));
        assert_eq!(song.number("year"), Some(1959.0));
        assert!(song.artist.is_none());
    }
}
