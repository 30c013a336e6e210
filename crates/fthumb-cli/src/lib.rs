//! Command-line interface for the fthumb font thumbnailer
//!
//! This crate provides the `font-thumbnail` binary. Argument handling lives
//! in [`cli`], the pipeline in [`thumbnail`]; `main.rs` only wires them to
//! logging and the process exit code.

pub mod cli;
pub mod thumbnail;
