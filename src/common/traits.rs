//! Common traits defining interfaces for planning and control

use nalgebra::DVector;

/// Interface to a controlled dynamical system.
///
/// The planner treats the system as a black box: dimensions, box bounds on
/// state and control, a forward dynamics function, and an optional
/// input-validity predicate.
pub trait Dynamics {
    /// State dimension `n`
    fn state_dim(&self) -> usize;

    /// Control dimension `m`
    fn control_dim(&self) -> usize;

    /// Lower and upper state bounds, each of length `n`
    fn state_bounds(&self) -> (DVector<f64>, DVector<f64>);

    /// Lower and upper control bounds, each of length `m`
    fn control_bounds(&self) -> (DVector<f64>, DVector<f64>);

    /// Forward dynamics `f(x, u) -> dx/dt`
    fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64>;

    /// Whether `u` is an admissible input at state `x`.
    ///
    /// Defaults to accepting everything; systems with state-dependent
    /// actuation limits override this.
    fn is_valid_input(&self, _x: &DVector<f64>, _u: &DVector<f64>) -> bool {
        true
    }

    /// Default/neutral control returned by feedback policies when no
    /// solution applies. Defaults to zero.
    fn neutral_control(&self) -> DVector<f64> {
        DVector::zeros(self.control_dim())
    }
}

/// Trait for feedback control laws `u = g(x, t)`
pub trait FeedbackPolicy {
    /// Compute the control input for state `x` at time `t`
    fn control(&self, x: &DVector<f64>, t: f64) -> DVector<f64>;
}

/// Black-box array filter applied row-wise during trajectory smoothing
pub trait SignalFilter {
    /// Filter one sampled signal, returning a sequence of the same length
    fn filter_signal(&self, samples: &[f64]) -> Vec<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnitMass;

    impl Dynamics for UnitMass {
        fn state_dim(&self) -> usize {
            2
        }
        fn control_dim(&self) -> usize {
            1
        }
        fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
            (DVector::from_vec(vec![-1.0, -1.0]), DVector::from_vec(vec![1.0, 1.0]))
        }
        fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
            (DVector::from_vec(vec![-1.0]), DVector::from_vec(vec![1.0]))
        }
        fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
            DVector::from_vec(vec![x[1], u[0]])
        }
    }

    #[test]
    fn test_dynamics_defaults() {
        let sys = UnitMass;
        let x = DVector::zeros(2);
        let u = DVector::zeros(1);
        assert!(sys.is_valid_input(&x, &u));
        assert_eq!(sys.neutral_control(), DVector::zeros(1));
    }

    #[test]
    fn test_derivative_shape() {
        let sys = UnitMass;
        let x = DVector::from_vec(vec![0.0, 2.0]);
        let u = DVector::from_vec(vec![0.5]);
        let dx = sys.derivative(&x, &u);
        assert_eq!(dx.len(), 2);
        assert_eq!(dx[0], 2.0);
        assert_eq!(dx[1], 0.5);
    }
}
