// Signal processing module

pub mod low_pass;

pub use low_pass::*;
