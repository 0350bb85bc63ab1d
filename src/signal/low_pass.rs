//! Low-pass trajectory smoothing
//!
//! Planned trajectories carry discretization noise from the fixed-step
//! integration and the bang-bang style control switching. Before a solution
//! is handed to a tracking controller its state-derivative rows (and
//! optionally the state rows) are run through a low-pass filter.

use std::f64::consts::PI;

use crate::common::{PlannerError, PlannerResult, SignalFilter, Solution};

/// First-order RC low-pass filter, run forward then backward over the
/// signal so the result has no phase lag.
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    /// Cutoff frequency [Hz]
    pub cutoff_hz: f64,
    /// Sample period [s]
    pub dt: f64,
}

impl LowPassFilter {
    pub fn new(cutoff_hz: f64, dt: f64) -> Self {
        Self { cutoff_hz, dt }
    }

    fn smoothing_factor(&self) -> f64 {
        let rc = 1.0 / (2.0 * PI * self.cutoff_hz);
        self.dt / (rc + self.dt)
    }

    fn single_pass(&self, samples: &[f64]) -> Vec<f64> {
        let a = self.smoothing_factor();
        let mut out = Vec::with_capacity(samples.len());
        let mut y = samples[0];
        for &s in samples {
            y += a * (s - y);
            out.push(y);
        }
        out
    }
}

impl SignalFilter for LowPassFilter {
    fn filter_signal(&self, samples: &[f64]) -> Vec<f64> {
        if samples.len() < 2 || !(self.cutoff_hz > 0.0) || !(self.dt > 0.0) {
            return samples.to_vec();
        }
        let forward = self.single_pass(samples);
        let reversed: Vec<f64> = forward.into_iter().rev().collect();
        let mut backward = self.single_pass(&reversed);
        backward.reverse();
        backward
    }
}

/// Smooth a solution in place by filtering each state/derivative row.
///
/// The derivative sequence is always replaced; the state sequence only when
/// `smooth_states` is set. Control and time sequences are never touched.
pub fn smooth_solution(
    solution: &mut Solution,
    filter: &dyn SignalFilter,
    smooth_states: bool,
) -> PlannerResult<()> {
    let length = solution.len();

    let filter_rows = |matrix: &mut nalgebra::DMatrix<f64>| -> PlannerResult<()> {
        for i in 0..matrix.nrows() {
            let row: Vec<f64> = matrix.row(i).iter().cloned().collect();
            let filtered = filter.filter_signal(&row);
            if filtered.len() != length {
                return Err(PlannerError::InvalidParameter(format!(
                    "filter changed signal length from {} to {}",
                    length,
                    filtered.len()
                )));
            }
            for (j, value) in filtered.into_iter().enumerate() {
                matrix[(i, j)] = value;
            }
        }
        Ok(())
    };

    filter_rows(&mut solution.dx)?;
    if smooth_states {
        filter_rows(&mut solution.x)?;
    }
    Ok(())
}
