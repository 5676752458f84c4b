//! Example sets checked against candidate programs

pub mod io_set;

pub use io_set::{Example, IoSet};
