//! The size-budget search loop.
//!
//! Encoded size cannot be predicted from pixel count alone, so the loop
//! measures real candidates and corrects. Each over-budget pass shrinks the
//! target box by `s = min(0.85, sqrt(budget / size))`: for photographic
//! content size is roughly proportional to pixel area, so the square root of
//! the byte ratio is the linear shrink that should hit the budget. The 0.85
//! cap makes every pass shrink each side by at least 15%.
//!
//! When a shrunk candidate is still over budget the quality drops by a fixed
//! step for the next pass. The loop stops once a candidate fits the budget or
//! a candidate has been encoded at the quality floor, so it runs at most
//! `ceil((quality - floor) / step) + 2` passes.
//!
//! The shrink compounds: every pass scales the previous target, not the
//! native size.

use tracing::{debug, info, warn};

use crate::decode::probe_dimensions;
use crate::frame::{render_frame, EncodedCandidate};
use crate::{Dimensions, EncodeError, EncodingOptions};

/// Upper bound on the per-pass linear shrink factor.
pub const MAX_SCALE_STEP: f64 = 0.85;

/// Source of candidates for the search loop.
///
/// [`ImageRenderer`] is the production implementation; tests drive the loop
/// with synthetic renderers whose byte sizes are known in advance.
pub trait FrameRenderer {
    /// Displayed (orientation-corrected) native size of the source.
    fn probe(&self, source: &[u8]) -> Result<Dimensions, EncodeError>;

    /// Produce one candidate fitted inside `target` at `quality`.
    fn render(
        &self,
        source: &[u8],
        target: Dimensions,
        quality: u8,
        options: &EncodingOptions,
    ) -> Result<EncodedCandidate, EncodeError>;
}

/// Renders candidates with the real decode/transform/encode pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRenderer;

impl FrameRenderer for ImageRenderer {
    fn probe(&self, source: &[u8]) -> Result<Dimensions, EncodeError> {
        Ok(probe_dimensions(source)?)
    }

    fn render(
        &self,
        source: &[u8],
        target: Dimensions,
        quality: u8,
        options: &EncodingOptions,
    ) -> Result<EncodedCandidate, EncodeError> {
        render_frame(source, target, quality, options)
    }
}

/// One pass of the search, as measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Bounding box requested for this pass
    pub target: Dimensions,
    /// Dimensions actually encoded
    pub dimensions: Dimensions,
    /// Quality used
    pub quality: u8,
    /// Encoded size in bytes
    pub size: usize,
}

impl Attempt {
    fn measure(target: Dimensions, candidate: &EncodedCandidate) -> Self {
        Self {
            target,
            dimensions: candidate.dimensions,
            quality: candidate.quality,
            size: candidate.len(),
        }
    }
}

/// Soft warning: the quality floor was reached before the byte budget was met.
///
/// This is not an error. The floor-quality candidate is still returned and the
/// caller decides whether it is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetUnmet {
    /// Size of the returned candidate
    pub size: usize,
    /// Requested budget
    pub max_size_bytes: usize,
    /// Quality of the returned candidate
    pub quality: u8,
}

impl std::fmt::Display for BudgetUnmet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "encoded size {} bytes exceeds budget of {} bytes at quality floor {}",
            self.size, self.max_size_bytes, self.quality
        )
    }
}

/// Result of a search: the winning candidate plus how it was found.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    /// The last candidate produced
    pub candidate: EncodedCandidate,
    /// Every pass in order, the returned candidate last
    pub attempts: Vec<Attempt>,
    /// Budget the search aimed for
    pub max_size_bytes: usize,
}

impl EncodeOutcome {
    /// Check whether the returned candidate fits the budget.
    pub fn budget_met(&self) -> bool {
        self.candidate.len() <= self.max_size_bytes
    }

    /// The soft warning, if the budget was not met.
    pub fn budget_unmet(&self) -> Option<BudgetUnmet> {
        (!self.budget_met()).then(|| BudgetUnmet {
            size: self.candidate.len(),
            max_size_bytes: self.max_size_bytes,
            quality: self.candidate.quality,
        })
    }

    /// Take the encoded bytes of the returned candidate.
    pub fn into_bytes(self) -> Vec<u8> {
        self.candidate.into_bytes()
    }
}

/// Linear shrink factor for the next pass.
///
/// Returns `min(0.85, sqrt(budget / size))`; a zero `size` yields the cap.
pub fn scale_factor(max_size_bytes: usize, current_size: usize) -> f64 {
    if current_size == 0 {
        return MAX_SCALE_STEP;
    }
    MAX_SCALE_STEP.min((max_size_bytes as f64 / current_size as f64).sqrt())
}

/// Search for the largest candidate that fits the byte budget.
///
/// Options are normalized first (see [`EncodingOptions::normalized`]). Hard
/// errors from the renderer propagate unchanged; a missed budget does not.
pub fn search<R: FrameRenderer + ?Sized>(
    renderer: &R,
    source: &[u8],
    options: &EncodingOptions,
) -> Result<EncodeOutcome, EncodeError> {
    let options = options.normalized();
    let budget = options.max_size_bytes;
    let bounds = options.bounds();

    let native = renderer.probe(source)?;
    let mut target = native.min(bounds);
    let mut quality = options.quality;

    let mut candidate = renderer.render(source, target, quality, &options)?;
    let mut attempts = vec![Attempt::measure(target, &candidate)];
    debug!(
        native = %native,
        target = %target,
        quality,
        size = candidate.len(),
        budget,
        progressive = options.progressive,
        "Baseline candidate"
    );

    while candidate.len() > budget && candidate.quality > options.min_quality {
        let scale = scale_factor(budget, candidate.len());
        target = target.scale(scale).min(bounds).min(native);

        candidate = renderer.render(source, target, quality, &options)?;
        attempts.push(Attempt::measure(target, &candidate));
        debug!(
            target = %target,
            dimensions = %candidate.dimensions,
            quality,
            size = candidate.len(),
            scale,
            "Rendered candidate"
        );

        if candidate.len() > budget {
            quality = quality
                .saturating_sub(options.quality_step)
                .max(options.min_quality);
        }
    }

    let outcome = EncodeOutcome {
        candidate,
        attempts,
        max_size_bytes: budget,
    };

    match outcome.budget_unmet() {
        Some(unmet) => warn!(
            format = %options.output_format,
            passes = outcome.attempts.len(),
            "{unmet}"
        ),
        None => info!(
            format = %options.output_format,
            dimensions = %outcome.candidate.dimensions,
            quality = outcome.candidate.quality,
            size = outcome.candidate.len(),
            passes = outcome.attempts.len(),
            "Encoded within budget"
        ),
    }

    Ok(outcome)
}



// ============================================================================
// Property-Based Tests
// ============================================================================
