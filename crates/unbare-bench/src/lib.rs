#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for unbare.
//!
//! Run benchmarks with: `cargo bench -p unbare-bench`
