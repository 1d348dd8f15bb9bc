use gate_puzzle::PuzzleConfig;

/// Minimum seconds a session spends in the queue
pub const WAIT_SECONDS: i64 = 20;
/// Seconds of inactivity after which a session is discarded
pub const IDLE_TIMEOUT_SECONDS: i64 = 300;

/// Flow controller configuration
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Queue dwell time before the captcha unlocks
    pub wait_seconds: i64,
    /// Maximum gap between requests before the session restarts
    pub idle_timeout_seconds: i64,
    /// Replace the puzzle when a submission is malformed, not just wrong
    pub regenerate_on_format_error: bool,
    /// Puzzle generation settings
    pub puzzle: PuzzleConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            wait_seconds: WAIT_SECONDS,
            idle_timeout_seconds: IDLE_TIMEOUT_SECONDS,
            regenerate_on_format_error: false,
            puzzle: PuzzleConfig::default(),
        }
    }
}

impl FlowConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_wait_seconds(mut self, seconds: i64) -> Self {
        self.wait_seconds = seconds;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_idle_timeout(mut self, seconds: i64) -> Self {
        self.idle_timeout_seconds = seconds;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_regenerate_on_format_error(mut self, enabled: bool) -> Self {
        self.regenerate_on_format_error = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_puzzle(mut self, puzzle: PuzzleConfig) -> Self {
        self.puzzle = puzzle;
        self
    }
}
