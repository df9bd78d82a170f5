//! # mrua_motion
//!
//! A small library for computing and charting uniformly accelerated motion
//! (MRUA) in Rust, with a tutoring assistant that explains the graphs.
//!
//! This library provides the following modules:
//! - `motion_parameters` for the initial conditions of a motion.
//! - `kinematics` for sampling position, velocity and acceleration in closed form.
//! - `series_cache` for a small FIFO of recently computed series.
//! - `chart` for the three-panel position/velocity/acceleration chart.
//! - `assistant` for asking a chat-completions API about the motion.
//! - `config` for settings and API key lookup.
//! - `shell` and `cli` for the `mrua` command line program.

pub mod assistant;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod kinematics;
pub mod motion_parameters;
pub mod series_cache;
pub mod shell;

// Re-export main items for convenience:
pub use chart::{render, Chart, ChartFormat, Panel};
pub use error::{CommunicationError, ConfigError, ExportError, RenderError, ShellError};
pub use kinematics::{compute, sample_count, MotionSeries};
pub use motion_parameters::*;
