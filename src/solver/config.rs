//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::constructive::ShuffleMode;
use crate::error::RoutingError;
use crate::savings::{SavingsFormula, SignFilter};
use crate::selection::DiversityConfig;

/// How the final routes are picked from the candidate pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Coverage first, distance second; repeated waypoint sequences count
    /// once, no diversity check.
    #[default]
    Ranked,
    /// Pairwise-distinct routes with fallbacks.
    Diverse(DiversityConfig),
}

/// Configuration for [`SavingsSolver`](super::SavingsSolver).
///
/// # Examples
///
/// ```
/// use depot_routes::constructive::ShuffleMode;
/// use depot_routes::savings::SignFilter;
/// use depot_routes::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_shuffle(ShuffleMode::partial())
///     .with_variants(20)
///     .with_seed(7);
/// assert_eq!(config.variants, Some(20));
/// assert!(config.validate().is_ok());
///
/// let tour = SolverConfig::single_tour();
/// assert_eq!(tour.shuffle, ShuffleMode::Exhaustive);
/// assert_eq!(tour.sign_filter, SignFilter::All);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Savings formula.
    pub formula: SavingsFormula,
    /// Savings sign filter. Ignored in exhaustive mode, which always uses
    /// every finite saving.
    pub sign_filter: SignFilter,
    /// Variant generation strategy.
    pub shuffle: ShuffleMode,
    /// Number of variants; `None` means ten per waypoint.
    pub variants: Option<usize>,
    /// Base seed; variant `k` uses `seed + k`.
    pub seed: u64,
    /// Cap on variants tried in partial mode; `None` means `variants`.
    pub max_attempts: Option<usize>,
    /// Final selection strategy.
    pub selection: SelectionMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            formula: SavingsFormula::default(),
            sign_filter: SignFilter::default(),
            shuffle: ShuffleMode::default(),
            variants: None,
            seed: 42,
            max_attempts: None,
            selection: SelectionMode::default(),
        }
    }
}

impl SolverConfig {
    /// Variants generated per waypoint when no count is set.
    pub const VARIANTS_PER_WAYPOINT: usize = 10;

    /// One sign-agnostic pass aiming at a single tour over as many
    /// waypoints as possible.
    pub fn single_tour() -> Self {
        Self::default()
            .with_shuffle(ShuffleMode::Exhaustive)
            .with_sign_filter(SignFilter::All)
    }

    /// Up to `k` tours that each cover every waypoint, from partially
    /// shuffled sign-agnostic savings.
    pub fn full_coverage_tours(k: usize) -> Self {
        Self::default()
            .with_shuffle(ShuffleMode::Partial {
                fraction: 0.2,
                require_full_coverage: true,
            })
            .with_sign_filter(SignFilter::All)
            .with_variants(k)
    }

    /// Sets the savings formula.
    pub fn with_formula(mut self, formula: SavingsFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Sets the sign filter.
    pub fn with_sign_filter(mut self, filter: SignFilter) -> Self {
        self.sign_filter = filter;
        self
    }

    /// Sets the shuffle mode.
    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets the variant count.
    pub fn with_variants(mut self, variants: usize) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the partial-mode attempt cap.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the selection mode.
    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    /// Variant count for a graph with `waypoints` waypoints.
    pub fn variants_for(&self, waypoints: usize) -> usize {
        self.variants
            .unwrap_or(waypoints * Self::VARIANTS_PER_WAYPOINT)
    }

    /// Sign filter actually applied for the configured shuffle mode.
    pub fn effective_sign_filter(&self) -> SignFilter {
        match self.shuffle {
            ShuffleMode::Exhaustive => SignFilter::All,
            _ => self.sign_filter,
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if let ShuffleMode::Partial { fraction, .. } = self.shuffle {
            if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
                return Err(RoutingError::InvalidConfig(format!(
                    "shuffle fraction must be in (0, 1], got {fraction}"
                )));
            }
        }
        if let SelectionMode::Diverse(d) = &self.selection {
            if !(0.0..=1.0).contains(&d.min_difference) {
                return Err(RoutingError::InvalidConfig(format!(
                    "min_difference must be in [0, 1], got {}",
                    d.min_difference
                )));
            }
            if d.relaxation_steps > DiversityConfig::MAX_RELAXATION_STEPS {
                return Err(RoutingError::InvalidConfig(format!(
                    "relaxation_steps must be at most {}, got {}",
                    DiversityConfig::MAX_RELAXATION_STEPS,
                    d.relaxation_steps
                )));
            }
            if !(d.node_penalty.is_finite() && d.node_penalty >= 0.0) {
                return Err(RoutingError::InvalidConfig(format!(
                    "node_penalty must be finite and non-negative, got {}",
                    d.node_penalty
                )));
            }
        }
        Ok(())
    }
}
