// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Solver configuration.
//!
//! `SolverConfig` collects the budgets and knobs of a solve with builder-style
//! setters. `validate` rejects invalid budgets before any search starts;
//! slide-dependent checks (unknown photos, out-of-range fixed start) happen in
//! `Solver::solve_slides`, once the slide set is known.

use slideshow_ls::{construction::StartStrategy, meta::MetaheuristicKind};
use slideshow_model::{
    generator::{DEFAULT_PAIRING_WINDOW, PairingStrategy},
    index::SlideIndex,
    slide::SlideError,
};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The time limit is not a positive, finite number of seconds.
    InvalidTimeLimit(f64),
    ZeroIterationLimit,
    ZeroStagnationLimit,
    ZeroWorkers,
    ZeroPairingWindow,
    /// The fixed start slide does not exist.
    StartOutOfRange { slide: SlideIndex, num_slides: usize },
    /// The slide set does not fit the catalog.
    InvalidSlides(SlideError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTimeLimit(secs) => {
                write!(f, "time limit must be a positive, finite number of seconds, got {secs}")
            }
            ConfigError::ZeroIterationLimit => write!(f, "iteration limit must be at least 1"),
            ConfigError::ZeroStagnationLimit => write!(f, "stagnation limit must be at least 1"),
            ConfigError::ZeroWorkers => write!(f, "at least one worker is required"),
            ConfigError::ZeroPairingWindow => write!(f, "pairing window must be at least 1"),
            ConfigError::StartOutOfRange { slide, num_slides } => write!(
                f,
                "start slide {} is out of range for {} slides",
                slide.get(),
                num_slides
            ),
            ConfigError::InvalidSlides(err) => write!(f, "invalid slide set: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidSlides(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SlideError> for ConfigError {
    fn from(err: SlideError) -> Self {
        ConfigError::InvalidSlides(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    time_limit_secs: f64,
    iteration_limit: Option<u64>,
    stagnation_limit: u64,
    workers: usize,
    seed: u64,
    pairing: PairingStrategy,
    metaheuristic: MetaheuristicKind,
    start: StartStrategy,
    log_interval: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: Self::DEFAULT_TIME_LIMIT_SECS,
            iteration_limit: None,
            stagnation_limit: Self::DEFAULT_STAGNATION_LIMIT,
            workers: 1,
            seed: 0,
            pairing: PairingStrategy::Windowed {
                window: DEFAULT_PAIRING_WINDOW,
            },
            metaheuristic: MetaheuristicKind::default(),
            start: StartStrategy::default(),
            log_interval: None,
        }
    }
}

impl SolverConfig {
    pub const DEFAULT_TIME_LIMIT_SECS: f64 = 10.0;
    pub const DEFAULT_STAGNATION_LIMIT: u64 = 200_000;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = limit.as_secs_f64();
        self
    }

    #[inline]
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    #[inline]
    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_stagnation_limit(mut self, limit: u64) -> Self {
        self.stagnation_limit = limit;
        self
    }

    #[inline]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn with_pairing(mut self, pairing: PairingStrategy) -> Self {
        self.pairing = pairing;
        self
    }

    #[inline]
    pub fn with_metaheuristic(mut self, metaheuristic: MetaheuristicKind) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    #[inline]
    pub fn with_start(mut self, start: StartStrategy) -> Self {
        self.start = start;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// The wall-clock budget, or an error if it is not positive and finite.
    pub fn time_limit(&self) -> Result<Duration, ConfigError> {
        let secs = self.time_limit_secs;
        if !(secs.is_finite() && secs > 0.0) {
            return Err(ConfigError::InvalidTimeLimit(secs));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeLimit(secs))
    }

    #[inline]
    pub fn iteration_limit(&self) -> Option<u64> {
        self.iteration_limit
    }

    #[inline]
    pub fn stagnation_limit(&self) -> u64 {
        self.stagnation_limit
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn pairing(&self) -> PairingStrategy {
        self.pairing
    }

    #[inline]
    pub fn metaheuristic(&self) -> MetaheuristicKind {
        self.metaheuristic
    }

    #[inline]
    pub fn start(&self) -> StartStrategy {
        self.start
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }

    /// Iterations the confidence estimate is measured against.
    #[inline]
    pub fn confidence_budget(&self) -> u64 {
        self.iteration_limit.unwrap_or(self.stagnation_limit)
    }

    /// Checks every budget and knob that does not depend on the slide set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_limit()?;
        if self.iteration_limit == Some(0) {
            return Err(ConfigError::ZeroIterationLimit);
        }
        if self.stagnation_limit == 0 {
            return Err(ConfigError::ZeroStagnationLimit);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if let PairingStrategy::Windowed { window: 0 } = self.pairing {
            return Err(ConfigError::ZeroPairingWindow);
        }
        Ok(())
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverConfig(time_limit: {}s, stagnation_limit: {}, workers: {}, seed: {}, pairing: {}, metaheuristic: {}, start: {})",
            self.time_limit_secs,
            self.stagnation_limit,
            self.workers,
            self.seed,
            self.pairing,
            self.metaheuristic,
            self.start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time_limit().unwrap(), Duration::from_secs(10));
        assert_eq!(config.stagnation_limit(), 200_000);
        assert_eq!(config.workers(), 1);
        assert_eq!(config.seed(), 0);
        assert_eq!(config.pairing(), PairingStrategy::Windowed { window: 8 });
        assert_eq!(config.metaheuristic(), MetaheuristicKind::GreedyAscent);
        assert_eq!(config.start(), StartStrategy::Random);
        assert_eq!(config.log_interval(), None);
    }

    #[test]
    fn test_rejects_bad_time_limits() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = SolverConfig::new().with_time_limit_secs(secs).validate();
            assert!(matches!(err, Err(ConfigError::InvalidTimeLimit(_))), "{secs}");
        }
        assert!(SolverConfig::new().with_time_limit_secs(0.25).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_budgets() {
        assert_eq!(
            SolverConfig::new().with_iteration_limit(0).validate(),
            Err(ConfigError::ZeroIterationLimit)
        );
        assert_eq!(
            SolverConfig::new().with_stagnation_limit(0).validate(),
            Err(ConfigError::ZeroStagnationLimit)
        );
        assert_eq!(
            SolverConfig::new().with_workers(0).validate(),
            Err(ConfigError::ZeroWorkers)
        );
        assert_eq!(
            SolverConfig::new()
                .with_pairing(PairingStrategy::Windowed { window: 0 })
                .validate(),
            Err(ConfigError::ZeroPairingWindow)
        );
    }

    #[test]
    fn test_confidence_budget_prefers_iteration_limit() {
        assert_eq!(SolverConfig::new().confidence_budget(), 200_000);
        assert_eq!(
            SolverConfig::new().with_iteration_limit(500).confidence_budget(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::StartOutOfRange {
            slide: SlideIndex::new(9),
            num_slides: 3,
        };
        assert_eq!(err.to_string(), "start slide 9 is out of range for 3 slides");
    }
}
