// Example dynamical systems implementing the Dynamics interface

pub mod double_integrator;
pub mod pendulum;
pub mod point_mass;

pub use double_integrator::*;
pub use pendulum::*;
pub use point_mass::*;
