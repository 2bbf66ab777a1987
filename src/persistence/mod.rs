//! Progress bookkeeping
//!
//! The simulation never waits on storage. It emits [`GameEvent`]s, the frame
//! loop forwards the ones that matter to a [`PersistenceSink`], and the sink
//! decides what to keep and where.

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;
use crate::sim::GameEvent;

/// Coins a fresh player starts with
pub const STARTING_COINS: u64 = 100;

/// What a finished session reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub platforms_cleared: u32,
    pub combo: u32,
}

/// Receiver for progress the core hands out. Writes are fire-and-forget.
pub trait PersistenceSink {
    fn coins_earned(&mut self, coins_delta: u32);
    fn session_ended(&mut self, summary: &SessionSummary);
}

/// Route persistence-relevant events to `sink`; everything else is ignored
pub fn forward_events<S: PersistenceSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match event {
            GameEvent::CoinsEarned { coins_delta } => sink.coins_earned(*coins_delta),
            GameEvent::SessionEnded { summary, .. } => sink.session_ended(summary),
            _ => {}
        }
    }
}

/// Wall-clock time in ms for leaderboard entries
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Coins wallet, best score and leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressStore {
    pub coins: u64,
    pub best_score: u64,
    pub games_played: u32,
    pub high_scores: HighScores,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            best_score: 0,
            games_played: 0,
            high_scores: HighScores::new(),
        }
    }
}

impl PersistenceSink for ProgressStore {
    fn coins_earned(&mut self, coins_delta: u32) {
        self.coins += u64::from(coins_delta);
    }

    fn session_ended(&mut self, summary: &SessionSummary) {
        self.games_played += 1;
        if summary.score > self.best_score {
            log::info!("New best score: {}", summary.score);
            self.best_score = summary.score;
        }
        if let Some(rank) = self.high_scores.add_score(
            summary.score,
            summary.platforms_cleared,
            summary.combo,
            now_ms(),
        ) {
            log::info!("Leaderboard rank #{}", rank);
        }
        self.save();
    }
}

impl ProgressStore {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bounce_ball_progress";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<ProgressStore>(&json) {
                    Ok(progress) => {
                        log::info!(
                            "Loaded progress: {} coins, best {}",
                            progress.coins,
                            progress.best_score
                        );
                        return progress;
                    }
                    Err(e) => log::warn!("Stored progress unreadable ({}), starting fresh", e),
                }
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::new()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Progress saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EndReason;

    #[test]
    fn test_fresh_wallet() {
        let progress = ProgressStore::new();
        assert_eq!(progress.coins, STARTING_COINS);
        assert!(progress.high_scores.is_empty());
    }

    #[test]
    fn test_forward_events() {
        let summary = SessionSummary {
            score: 230,
            platforms_cleared: 3,
            combo: 3,
        };
        let events = vec![
            GameEvent::ChargeStarted,
            GameEvent::CoinsEarned { coins_delta: 10 },
            GameEvent::CoinsEarned { coins_delta: 13 },
            GameEvent::SessionEnded {
                reason: EndReason::LeftViewport,
                summary,
            },
        ];

        let mut progress = ProgressStore::new();
        forward_events(&events, &mut progress);
        assert_eq!(progress.coins, STARTING_COINS + 23);
        assert_eq!(progress.best_score, 230);
        assert_eq!(progress.games_played, 1);
        assert_eq!(progress.high_scores.top_score(), Some(230));
        assert_eq!(progress.high_scores.entries[0].platforms, 3);
    }

    #[test]
    fn test_best_score_only_rises() {
        let mut progress = ProgressStore::new();
        for score in [50, 20] {
            progress.session_ended(&SessionSummary {
                score,
                platforms_cleared: 1,
                combo: 1,
            });
        }
        assert_eq!(progress.best_score, 50);
        assert_eq!(progress.games_played, 2);
    }

    #[test]
    fn test_partial_json_loads() {
        let progress: ProgressStore = serde_json::from_str(r#"{"coins":7}"#).unwrap();
        assert_eq!(progress.coins, 7);
        assert_eq!(progress.best_score, 0);
    }
}
