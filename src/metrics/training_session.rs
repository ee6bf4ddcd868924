//! Bookkeeping for a training run
//!
//! Everything the training loop accumulates across episodes lives in one
//! [`TrainingSession`] owned by the loop.

use std::collections::VecDeque;

/// Per-run training statistics
///
/// # Example
///
/// ```rust
/// use snake_dqn::metrics::TrainingSession;
///
/// let mut session = TrainingSession::new(100);
///
/// assert!(session.record_game(3));
/// assert!(!session.record_game(1));
///
/// assert_eq!(session.games(), 2);
/// assert_eq!(session.record(), 3);
/// assert_eq!(session.mean_score(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct TrainingSession {
    /// Final score of every completed game
    scores: Vec<u32>,

    /// Running mean score after every completed game
    mean_scores: Vec<f32>,

    /// Most recent scores (rolling window)
    recent_scores: VecDeque<u32>,

    /// Sum of all scores
    total_score: u64,

    /// Best score so far
    record: u32,

    /// Best score whose model was persisted successfully
    saved_record: Option<u32>,

    /// Total environment steps
    total_steps: usize,

    /// Window size for the rolling mean
    window_size: usize,
}

impl TrainingSession {
    /// Create an empty session with a rolling window of `window_size` games
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: Vec::new(),
            mean_scores: Vec::new(),
            recent_scores: VecDeque::with_capacity(window_size),
            total_score: 0,
            record: 0,
            saved_record: None,
            total_steps: 0,
            window_size,
        }
    }

    /// Resume from the record of a loaded model
    pub fn with_record(mut self, record: u32) -> Self {
        self.record = record;
        self.saved_record = Some(record);
        self
    }

    /// Count one environment step
    pub fn record_step(&mut self) {
        self.total_steps += 1;
    }

    /// Record a finished game; returns true if it set a new record
    pub fn record_game(&mut self, score: u32) -> bool {
        self.scores.push(score);
        self.total_score += u64::from(score);
        self.mean_scores
            .push(self.total_score as f32 / self.scores.len() as f32);

        if self.recent_scores.len() >= self.window_size {
            self.recent_scores.pop_front();
        }
        self.recent_scores.push_back(score);

        let is_record = score > self.record;
        if is_record {
            self.record = score;
        }
        is_record
    }

    /// Note that the model reaching `record` was persisted
    pub fn mark_saved(&mut self, record: u32) {
        self.saved_record = Some(record);
    }

    /// Number of completed games
    pub fn games(&self) -> usize {
        self.scores.len()
    }

    /// Best score so far
    pub fn record(&self) -> u32 {
        self.record
    }

    /// Best score that is backed by a saved model
    pub fn saved_record(&self) -> Option<u32> {
        self.saved_record
    }

    /// Mean score over all games, or 0.0 before the first game
    pub fn mean_score(&self) -> f32 {
        self.mean_scores.last().copied().unwrap_or(0.0)
    }

    /// Mean score over the rolling window
    pub fn recent_mean_score(&self) -> f32 {
        if self.recent_scores.is_empty() {
            0.0
        } else {
            self.recent_scores.iter().sum::<u32>() as f32 / self.recent_scores.len() as f32
        }
    }

    /// Scores of all games, oldest first
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Running mean after each game, for plotting collaborators
    pub fn mean_scores(&self) -> &[f32] {
        &self.mean_scores
    }

    /// Total number of environment steps
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Format a summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Steps: {} | Record: {} | Mean: {:.2} | Recent({}): {:.2}",
            self.games(),
            self.total_steps,
            self.record,
            self.mean_score(),
            self.window_size,
            self.recent_mean_score(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let session = TrainingSession::new(100);
        assert_eq!(session.games(), 0);
        assert_eq!(session.total_steps(), 0);
        assert_eq!(session.record(), 0);
        assert_eq!(session.saved_record(), None);
        assert_eq!(session.mean_score(), 0.0);
        assert_eq!(session.recent_mean_score(), 0.0);
    }

    #[test]
    fn test_record_tracking() {
        let mut session = TrainingSession::new(10);

        assert!(!session.record_game(0));
        assert!(session.record_game(4));
        assert!(!session.record_game(4));
        assert!(!session.record_game(2));
        assert!(session.record_game(7));

        assert_eq!(session.record(), 7);
        assert_eq!(session.scores(), &[0, 4, 4, 2, 7]);
    }

    #[test]
    fn test_running_means() {
        let mut session = TrainingSession::new(10);
        for score in [2, 4, 6] {
            session.record_game(score);
        }

        assert_eq!(session.mean_scores(), &[2.0, 3.0, 4.0]);
        assert_eq!(session.mean_score(), 4.0);
    }

    #[test]
    fn test_rolling_window() {
        let mut session = TrainingSession::new(2);
        for score in [1, 2, 3] {
            session.record_game(score);
        }

        assert!((session.recent_mean_score() - 2.5).abs() < 1e-5);
        assert!((session.mean_score() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_saved_record_is_separate() {
        let mut session = TrainingSession::new(10);
        session.record_game(5);

        assert_eq!(session.record(), 5);
        assert_eq!(session.saved_record(), None);

        session.mark_saved(5);
        assert_eq!(session.saved_record(), Some(5));
    }

    #[test]
    fn test_resume_with_record() {
        let mut session = TrainingSession::new(10).with_record(9);
        assert!(!session.record_game(9));
        assert!(session.record_game(10));
        assert_eq!(session.saved_record(), Some(9));
    }

    #[test]
    fn test_steps_and_summary() {
        let mut session = TrainingSession::new(100);
        for _ in 0..150 {
            session.record_step();
        }
        session.record_game(5);

        let summary = session.format_summary();
        assert!(summary.contains("Games: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Record: 5"));
        assert!(summary.contains("Mean: 5.00"));
    }
}
