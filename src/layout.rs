//! Layout fitness for external optimizers.
//!
//! An optimizer proposes candidate layouts as flat gene vectors
//! `[x0, y0, x1, y1, ...]` and scores them through [`Fitness::evaluate`].
//! The evaluator is stateless between calls: the ambient field and wake
//! parameters are owned inputs, never globals.

use std::fmt;

use serde::Serialize;

use crate::error::{WakeError, WakeResult, ensure_finite};
use crate::field::{Grid, GridCoord, WakeFieldParams, evaluate_field};

/// Stateless scoring contract between the wake engine and any optimizer.
pub trait Fitness {
    /// Scores one candidate. Higher is better.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed candidates; the same candidate always
    /// yields the same result.
    fn evaluate(&self, candidate: &[f64]) -> WakeResult<f64>;
}

/// Linear penalty for turbine pairs closer than a minimum spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpacingPenalty {
    /// Minimum allowed center-to-center distance (grid cells).
    pub min_spacing: f64,
    /// Penalty per cell of shortfall.
    pub weight: f64,
}

impl Default for SpacingPenalty {
    fn default() -> Self {
        Self {
            min_spacing: 20.0,
            weight: 1000.0,
        }
    }
}

impl SpacingPenalty {
    /// Sums `(min_spacing − d) · weight` over every pair with `d < min_spacing`.
    pub fn penalty(&self, turbines: &[GridCoord]) -> f64 {
        let mut penalty = 0.0;
        for (i, a) in turbines.iter().enumerate() {
            for b in &turbines[i + 1..] {
                let dx = a.x as f64 - b.x as f64;
                let dy = a.y as f64 - b.y as f64;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < self.min_spacing {
                    penalty += (self.min_spacing - dist) * self.weight;
                }
            }
        }
        penalty
    }
}

/// Decodes a flat gene vector into grid coordinates.
///
/// Genes are truncated toward zero, so `12.9` addresses cell 12.
///
/// # Errors
///
/// Returns `InvalidParameter` for an odd number of genes, non-finite genes,
/// or negative coordinates.
pub fn decode_layout(genes: &[f64]) -> WakeResult<Vec<GridCoord>> {
    if genes.len() % 2 != 0 {
        return Err(WakeError::invalid(
            "layout",
            format!("expected an even number of genes, got {}", genes.len()),
        ));
    }
    genes
        .chunks_exact(2)
        .map(|pair| Ok(GridCoord::new(gene_to_index(pair[0])?, gene_to_index(pair[1])?)))
        .collect()
}

fn gene_to_index(gene: f64) -> WakeResult<usize> {
    let gene = ensure_finite("layout", gene)?.trunc();
    if gene < 0.0 {
        return Err(WakeError::invalid(
            "layout",
            format!("grid coordinate must be >= 0, got {gene}"),
        ));
    }
    Ok(gene as usize)
}

/// Energy-minus-penalty fitness over a fixed ambient wind field.
#[derive(Debug, Clone)]
pub struct LayoutEvaluator {
    ambient: Grid,
    params: WakeFieldParams,
    spacing: SpacingPenalty,
}

impl LayoutEvaluator {
    pub fn new(ambient: Grid, params: WakeFieldParams, spacing: SpacingPenalty) -> Self {
        Self {
            ambient,
            params,
            spacing,
        }
    }

    pub fn ambient(&self) -> &Grid {
        &self.ambient
    }

    pub fn params(&self) -> &WakeFieldParams {
        &self.params
    }

    pub fn spacing(&self) -> &SpacingPenalty {
        &self.spacing
    }

    /// Scores an already-decoded layout, returning `(energy, penalty)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a turbine lies outside the field.
    pub fn score(&self, turbines: &[GridCoord]) -> WakeResult<(f64, f64)> {
        let evaluation = evaluate_field(&self.ambient, turbines, &self.params)?;
        Ok((evaluation.energy, self.spacing.penalty(turbines)))
    }

    /// Evaluates a decoded layout and summarizes the effective field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a turbine lies outside the field.
    pub fn report(&self, turbines: &[GridCoord]) -> WakeResult<LayoutReport> {
        let evaluation = evaluate_field(&self.ambient, turbines, &self.params)?;
        let penalty = self.spacing.penalty(turbines);
        let turbine_speeds_ms = turbines
            .iter()
            .map(|t| evaluation.effective.get(t.y, t.x).unwrap_or(0.0))
            .collect();
        Ok(LayoutReport {
            rows: self.ambient.rows(),
            cols: self.ambient.cols(),
            turbines: turbines.to_vec(),
            turbine_speeds_ms,
            mean_effective_ms: evaluation.effective.mean(),
            min_effective_ms: evaluation.effective.min_value().unwrap_or(0.0),
            energy: evaluation.energy,
            penalty,
            fitness: evaluation.energy - penalty,
            effective: evaluation.effective,
        })
    }
}

/// Summary of one grid-model layout evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub rows: usize,
    pub cols: usize,
    /// Turbine cells in evaluation order.
    pub turbines: Vec<GridCoord>,
    /// Effective speed at each turbine cell (m/s).
    pub turbine_speeds_ms: Vec<f64>,
    /// Mean effective speed over the whole field (m/s).
    pub mean_effective_ms: f64,
    /// Lowest effective speed in the field (m/s).
    pub min_effective_ms: f64,
    /// Σ effective³ over turbine cells.
    pub energy: f64,
    /// Spacing penalty.
    pub penalty: f64,
    /// Energy minus penalty.
    pub fitness: f64,
    /// Effective wind field (m/s). Not serialized.
    #[serde(skip)]
    pub effective: Grid,
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Field Evaluation ---")?;
        writeln!(f, "Grid:                  {} x {} cells", self.rows, self.cols)?;
        writeln!(f, "Turbines:              {}", self.turbines.len())?;
        for (t, u) in self.turbines.iter().zip(&self.turbine_speeds_ms) {
            writeln!(f, "  cell ({:>4}, {:>4})    U_eff={u:.3} m/s", t.x, t.y)?;
        }
        writeln!(f, "Mean effective speed:  {:.3} m/s", self.mean_effective_ms)?;
        writeln!(f, "Min effective speed:   {:.3} m/s", self.min_effective_ms)?;
        writeln!(f, "Energy:                {:.1}", self.energy)?;
        writeln!(f, "Spacing penalty:       {:.1}", self.penalty)?;
        write!(f, "Fitness:               {:.1}", self.fitness)
    }
}

impl Fitness for LayoutEvaluator {
    fn evaluate(&self, candidate: &[f64]) -> WakeResult<f64> {
        let turbines = decode_layout(candidate)?;
        let (energy, penalty) = self.score(&turbines)?;
        Ok(energy - penalty)
    }
}
