// Kinodynamic planning algorithms module

pub mod kinodynamic_rrt;

pub use kinodynamic_rrt::*;
