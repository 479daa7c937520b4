//! Party scoring and mood-driven track selection.

use serde::{Deserialize, Serialize};

/// Mood assumed when no reading is available.
pub const DEFAULT_MOOD: f64 = 0.5;

const MIN_TEMPO_BPM: f64 = 60.0;
const MAX_TEMPO_BPM: f64 = 200.0;

/// Audio features reported for one playlist track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    pub name: String,
    pub artists: Vec<String>,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
}

/// Body of `GET /get_mood`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodReading {
    pub current_mood: f64,
}

/// Linear map of `value` from `[min, max]` onto `[0, 1]`; values outside the range
/// land outside `[0, 1]`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Mean of tempo normalized over 60..200 BPM and energy normalized over 0..1.
pub fn party_score(tempo_bpm: f64, energy: f64) -> f64 {
    let tempo = normalize(tempo_bpm, MIN_TEMPO_BPM, MAX_TEMPO_BPM);
    let energy = normalize(energy, 0.0, 1.0);
    (tempo + energy) / 2.0
}

/// [`party_score`] scaled by 100 and truncated toward zero.
pub fn party_score_percent(tempo_bpm: f64, energy: f64) -> i64 {
    (party_score(tempo_bpm, energy) * 100.0) as i64
}

pub fn average_mood(samples: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (count, sum) = samples
        .into_iter()
        .fold((0usize, 0.0), |(count, sum), sample| (count + 1, sum + sample));
    (count > 0).then(|| sum / count as f64)
}

/// Track whose energy is nearest to `mood`. Ties go to the earliest track.
pub fn closest_track(tracks: &[TrackFeatures], mood: f64) -> Option<&TrackFeatures> {
    tracks
        .iter()
        .min_by(|a, b| (a.energy - mood).abs().total_cmp(&(b.energy - mood).abs()))
}
