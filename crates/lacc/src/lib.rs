//! # lacc
//!
//! Command-line driver for the LA-to-C compiler. Maps two positional paths
//! onto the pipeline in `lacc-compile`, writes the output file, and hands
//! `.c` outputs to a host `gcc` when one is available.

pub mod cli;
