//! Planar point mass (two decoupled double integrators)
//!
//! State `(q1, q2, dq1, dq2)`, control `(u1, u2) = (ddq1, ddq2)`. The
//! smallest system exercising the two-degree-of-freedom tracker wiring.

use nalgebra::DVector;

use crate::common::Dynamics;

#[derive(Debug, Clone)]
pub struct PlanarPointMass {
    /// Per-axis acceleration bound
    pub u_max: f64,
    /// Per-axis position bound, positions lie in `[-q_max, q_max]`
    pub q_max: f64,
    /// Per-axis speed bound
    pub v_max: f64,
}

impl PlanarPointMass {
    pub fn new(u_max: f64, q_max: f64, v_max: f64) -> Self {
        Self { u_max, q_max, v_max }
    }
}

impl Dynamics for PlanarPointMass {
    fn state_dim(&self) -> usize {
        4
    }

    fn control_dim(&self) -> usize {
        2
    }

    fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![-self.q_max, -self.q_max, -self.v_max, -self.v_max]),
            DVector::from_vec(vec![self.q_max, self.q_max, self.v_max, self.v_max]),
        )
    }

    fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![-self.u_max, -self.u_max]),
            DVector::from_vec(vec![self.u_max, self.u_max]),
        )
    }

    fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
        DVector::from_vec(vec![x[2], x[3], u[0], u[1]])
    }
}
