//! One-degree-of-freedom double integrator
//!
//! State `(q, dq)`, control `u = ddq`, force-bounded. The simplest system
//! the planner handles; used heavily in tests.

use nalgebra::DVector;

use crate::common::Dynamics;

#[derive(Debug, Clone)]
pub struct DoubleIntegrator {
    /// Acceleration bound, control lies in `[-u_max, u_max]`
    pub u_max: f64,
    /// Position bounds
    pub q_min: f64,
    pub q_max: f64,
    /// Speed bound, `dq` lies in `[-v_max, v_max]`
    pub v_max: f64,
}

impl DoubleIntegrator {
    pub fn new(u_max: f64, q_min: f64, q_max: f64, v_max: f64) -> Self {
        Self { u_max, q_min, q_max, v_max }
    }
}

impl Dynamics for DoubleIntegrator {
    fn state_dim(&self) -> usize {
        2
    }

    fn control_dim(&self) -> usize {
        1
    }

    fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![self.q_min, -self.v_max]),
            DVector::from_vec(vec![self.q_max, self.v_max]),
        )
    }

    fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![-self.u_max]),
            DVector::from_vec(vec![self.u_max]),
        )
    }

    fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
        DVector::from_vec(vec![x[1], u[0]])
    }
}
