//! Bounded exponential backoff around a single fallible call.

use std::{fmt::Display, future::Future, time::Duration};

use hitokoto_config::Retry;

pub struct RetryPolicy<E> {
	pub max_attempts: u32,
	pub initial_delay: Duration,
	pub multiplier: u32,
	retryable: fn(&E) -> bool,
	rate_limited: fn(&E) -> bool,
}
impl<E> RetryPolicy<E> {
	/// Every error is retryable and none is reported as a rate limit until configured otherwise.
	pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: u32) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			initial_delay,
			multiplier,
			retryable: |_| true,
			rate_limited: |_| false,
		}
	}

	pub fn from_config(cfg: &Retry) -> Self {
		Self::new(cfg.max_attempts, Duration::from_millis(cfg.initial_delay_ms), cfg.multiplier)
	}

	pub fn with_retryable(mut self, retryable: fn(&E) -> bool) -> Self {
		self.retryable = retryable;

		self
	}

	pub fn with_rate_limit_signal(mut self, rate_limited: fn(&E) -> bool) -> Self {
		self.rate_limited = rate_limited;

		self
	}

	/// Pause after the given failed attempt (1-based): `initial_delay * multiplier^(attempt - 1)`.
	pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
		let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));

		self.initial_delay.saturating_mul(factor)
	}

	pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, E>
	where
		E: Display,
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		let mut attempt = 1;

		loop {
			let err = match call().await {
				Ok(value) => return Ok(value),
				Err(err) => err,
			};

			if !(self.retryable)(&err) {
				tracing::warn!(operation, attempt, error = %err, "Error is not retryable.");

				return Err(err);
			}
			if attempt >= self.max_attempts {
				tracing::warn!(operation, attempt, error = %err, "Giving up after final attempt.");

				return Err(err);
			}

			let delay = self.backoff_for_attempt(attempt);
			let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);

			if (self.rate_limited)(&err) {
				tracing::warn!(
					operation,
					attempt,
					delay_ms,
					error = %err,
					"Rate limited; backing off."
				);
			} else {
				tracing::warn!(
					operation,
					attempt,
					delay_ms,
					error = %err,
					"Attempt failed; retrying."
				);
			}

			tokio::time::sleep(delay).await;

			attempt += 1;
		}
	}
}

impl<E> Clone for RetryPolicy<E> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<E> Copy for RetryPolicy<E> {}

impl<E> std::fmt::Debug for RetryPolicy<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RetryPolicy")
			.field("max_attempts", &self.max_attempts)
			.field("initial_delay", &self.initial_delay)
			.field("multiplier", &self.multiplier)
			.finish_non_exhaustive()
	}
}
