//! Beam search configuration.

use crate::error::{Result, SubgroupError};

/// Configuration parameters for the beam search.
///
/// # Examples
///
/// ```
/// use u_subgroup::beam::BeamConfig;
///
/// let config = BeamConfig::default()
///     .with_beam_width(10)
///     .with_max_iter(20)
///     .with_seed(7);
/// assert_eq!(config.beam_width, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BeamConfig {
    /// Number of rules kept in the beam.
    pub beam_width: usize,

    /// Maximum number of refinement sweeps. The search stops earlier when a
    /// sweep leaves the beam unchanged.
    pub max_iter: usize,

    /// Emit an event for every evaluated candidate and beam change.
    pub verbose: bool,

    /// Score the candidates of each parent rule in parallel.
    ///
    /// Only takes effect with the `parallel` crate feature. The beam,
    /// iteration count, evaluation count and score history are identical to
    /// a sequential run with the same seed.
    pub parallel: bool,

    /// Random seed for the exploration order (None for random).
    pub seed: Option<u64>,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_width: 5,
            max_iter: 50,
            verbose: false,
            parallel: true,
            seed: None,
        }
    }
}

impl BeamConfig {
    /// Sets the beam width.
    pub fn with_beam_width(mut self, width: usize) -> Self {
        self.beam_width = width;
        self
    }

    /// Sets the maximum number of sweeps.
    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    /// Enables per-candidate and beam-change events.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables parallel candidate scoring (needs the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.beam_width == 0 {
            return Err(SubgroupError::InvalidConfig {
                reason: "beam_width must be positive".into(),
            });
        }
        if self.max_iter == 0 {
            return Err(SubgroupError::InvalidConfig {
                reason: "max_iter must be positive".into(),
            });
        }
        Ok(())
    }
}
