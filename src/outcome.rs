//! Game-over consumers
//!
//! Gameplay events leave the session over a channel. The outcome handler
//! turns them into audio cues and, when a run ends, settles the reward into
//! the player store and records the run on the leaderboard.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{AudioCues, SoundEffect};
use crate::consts::REWARD_PER_EGG;
use crate::highscores::HighScores;
use crate::persistence::{LevelUpResult, PlayerRepository};
use crate::sim::{GameEvent, GameResult};

/// Points and experience granted for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub points: u64,
    pub experience: u64,
}

impl Reward {
    pub fn for_result(result: &GameResult) -> Self {
        Self {
            points: result.score + u64::from(result.bonus_eggs) * REWARD_PER_EGG,
            experience: result.score / 2,
        }
    }
}

/// Grant the reward for a run
pub fn settle(repo: &mut dyn PlayerRepository, result: &GameResult) -> (Reward, LevelUpResult) {
    let reward = Reward::for_result(result);
    repo.add_points(reward.points as i64);
    let level = repo.add_experience(reward.experience as i64);
    log::info!(
        "Reward settled: +{} points, +{} exp (level {}{})",
        reward.points,
        reward.experience,
        level.new_level,
        if level.leveled_up { ", level up" } else { "" }
    );
    (reward, level)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Reacts to gameplay events on behalf of audio, progress and leaderboard
pub struct OutcomeHandler {
    audio: Box<dyn AudioCues>,
    repo: Arc<Mutex<dyn PlayerRepository>>,
    scores: Option<Arc<Mutex<HighScores>>>,
    scores_path: Option<PathBuf>,
}

impl OutcomeHandler {
    pub fn new(audio: Box<dyn AudioCues>, repo: Arc<Mutex<dyn PlayerRepository>>) -> Self {
        Self {
            audio,
            repo,
            scores: None,
            scores_path: None,
        }
    }

    /// Record finished runs on a leaderboard, saving it to `path` if given
    pub fn with_high_scores(
        mut self,
        scores: Arc<Mutex<HighScores>>,
        path: Option<PathBuf>,
    ) -> Self {
        self.scores = Some(scores);
        self.scores_path = path;
        self
    }

    pub fn handle(&mut self, event: &GameEvent) {
        if let Some(cue) = SoundEffect::for_event(event) {
            self.audio.play(cue);
        }
        if let GameEvent::GameOver(result) = event {
            self.finish_run(result);
        }
    }

    fn finish_run(&mut self, result: &GameResult) {
        {
            let mut repo = self.repo.lock().unwrap_or_else(PoisonError::into_inner);
            settle(&mut *repo, result);
        }

        let Some(scores) = &self.scores else {
            return;
        };
        let mut scores = scores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rank) = scores.record(result, now_millis()) {
            log::info!("New high score #{}: {}", rank, result.score);
            if let Some(path) = &self.scores_path {
                if let Err(e) = scores.save(path) {
                    log::warn!("Failed to save high scores: {}", e);
                }
            }
        }
    }

    /// Handle events on a background thread until every sender is gone
    pub fn spawn(mut self, events: Receiver<GameEvent>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("game-outcome".to_string())
            .spawn(move || {
                for event in events {
                    self.handle(&event);
                }
                log::debug!("Outcome listener finished");
            })
    }
}
