// Feedback policies derived from planned solutions

pub mod open_loop;
pub mod trajectory_tracking;

pub use open_loop::*;
pub use trajectory_tracking::*;

use nalgebra::DVector;
use ordered_float::OrderedFloat;

/// Index of the sample whose timestamp is closest to `t` (no interpolation)
pub(crate) fn nearest_time_index(times: &DVector<f64>, t: f64) -> usize {
    (0..times.len())
        .min_by_key(|&i| OrderedFloat((times[i] - t).abs()))
        .unwrap_or(0)
}
