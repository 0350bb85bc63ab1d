//! Torque-limited simple pendulum
//!
//! State `(theta, dtheta)` with `theta = 0` hanging down, control is the
//! joint torque. With the torque bound below `m*g*l` the upright
//! configuration is only reachable by swinging, which makes this the
//! canonical kinodynamic planning demo.

use nalgebra::DVector;

use crate::common::Dynamics;

#[derive(Debug, Clone)]
pub struct Pendulum {
    /// Point mass [kg]
    pub mass: f64,
    /// Rod length [m]
    pub length: f64,
    /// Viscous damping at the joint
    pub damping: f64,
    /// Gravity [m/s^2]
    pub gravity: f64,
    /// Torque bound, control lies in `[-u_max, u_max]`
    pub u_max: f64,
    /// Angle bound, `theta` lies in `[-theta_max, theta_max]`
    pub theta_max: f64,
    /// Speed bound
    pub speed_max: f64,
}

impl Pendulum {
    pub fn new(mass: f64, length: f64, damping: f64, u_max: f64) -> Self {
        Self {
            mass,
            length,
            damping,
            gravity: 9.81,
            u_max,
            theta_max: 2.0 * std::f64::consts::PI,
            speed_max: 10.0,
        }
    }
}

impl Default for Pendulum {
    fn default() -> Self {
        // Swing-up requires pumping: gravity torque at horizontal is
        // m*g*l = 9.81, above the 5.0 actuator bound
        Pendulum::new(1.0, 1.0, 0.1, 5.0)
    }
}

impl Dynamics for Pendulum {
    fn state_dim(&self) -> usize {
        2
    }

    fn control_dim(&self) -> usize {
        1
    }

    fn state_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![-self.theta_max, -self.speed_max]),
            DVector::from_vec(vec![self.theta_max, self.speed_max]),
        )
    }

    fn control_bounds(&self) -> (DVector<f64>, DVector<f64>) {
        (
            DVector::from_vec(vec![-self.u_max]),
            DVector::from_vec(vec![self.u_max]),
        )
    }

    fn derivative(&self, x: &DVector<f64>, u: &DVector<f64>) -> DVector<f64> {
        let inertia = self.mass * self.length * self.length;
        let gravity_torque = self.mass * self.gravity * self.length * x[0].sin();
        let ddtheta = (u[0] - gravity_torque - self.damping * x[1]) / inertia;
        DVector::from_vec(vec![x[1], ddtheta])
    }
}
