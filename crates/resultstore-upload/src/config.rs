//! Tuning knobs for upload behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exponential-backoff schedule for retrying remote calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backoff {
    /// Delay before the first retry.
    #[serde(with = "duration_ms")]
    pub initial: Duration,
    /// Multiplier applied to the delay after each attempt.
    pub factor: f64,
    /// Upper bound for any single delay.
    #[serde(with = "duration_ms")]
    pub cap: Duration,
    /// Maximum number of attempts, counting the first.
    pub steps: u32,
    /// Fraction of each delay added or subtracted at random.
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            factor: 2.0,
            cap: Duration::from_secs(30),
            steps: 8,
            jitter: 0.2,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (1-based), without jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1) as i32;
        let base = self.initial.as_secs_f64() * self.factor.powi(exponent);
        Duration::from_secs_f64(base.min(self.cap.as_secs_f64()))
    }

    /// Delay before retry number `attempt` with jitter applied.
    pub(crate) fn jittered(&self, attempt: u32) -> Duration {
        use rand::Rng as _;

        let base = self.delay(attempt);
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = rand::thread_rng().gen_range(-self.jitter..=self.jitter);
        base.mul_f64(1.0 + spread)
    }
}

/// Tuning for one writer instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Envelopes per batch; the pending buffer is flushed at this size.
    pub batch_size: usize,
    /// Retry schedule for each remote call.
    pub backoff: Backoff,
    /// Wall-clock budget for one call sequence (the open handshake or one
    /// flush), on top of the per-call step budget.
    #[serde(with = "duration_ms")]
    pub rpc_deadline: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            // Envelope count per batch recommended by the service operators.
            batch_size: 100,
            backoff: Backoff::default(),
            rpc_deadline: Duration::from_secs(300),
        }
    }
}

/// Helper for serializing Duration as milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
