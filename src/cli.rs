//! Command line interface of the `mrua` binary.
//!
//! Commands:
//! - mrua plot [--v0 X] [--accel X] [--t-max X] [-o FILE] [--format F] [--show]
//! - mrua table [--v0 X] [--accel X] [--t-max X] [--every K]
//! - mrua ask [--v0 X] [--accel X] [--t-max X] QUESTION
//! - mrua session (the default)

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::assistant::{Assistant, AssistantRequest, OpenAiAssistant};
use crate::chart::{render, ChartFormat};
use crate::config::{self, KeySource, Settings};
use crate::error::ShellResult;
use crate::kinematics::compute;
use crate::motion_parameters::MotionParameters;
use crate::shell::{self, Session, DEFAULT_CHART_PATH};

/// Explore uniformly accelerated motion: position, velocity and acceleration vs. time
#[derive(Parser, Debug)]
#[command(name = "mrua")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a settings file (default: <config dir>/mrua_motion/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the motion and export or display its chart
    Plot {
        #[command(flatten)]
        motion: MotionArgs,

        /// Output file; the extension selects the format
        #[arg(short, long, default_value = DEFAULT_CHART_PATH)]
        output: PathBuf,

        /// Output format (svg, png, gp, json), overrides the extension
        #[arg(long)]
        format: Option<ChartFormat>,

        /// Open a gnuplot window instead of writing a file
        #[arg(long)]
        show: bool,
    },

    /// Print the sampled motion as a table
    Table {
        #[command(flatten)]
        motion: MotionArgs,

        /// Print every n-th sample
        #[arg(long, default_value_t = 50)]
        every: usize,
    },

    /// Ask the tutor a question about the motion
    Ask {
        #[command(flatten)]
        motion: MotionArgs,

        /// The question, in plain words
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Start an interactive session
    Session,
}

/// Initial conditions; missing values come from the settings.
#[derive(Args, Debug, Clone, Default)]
pub struct MotionArgs {
    /// Initial velocity, m/s
    #[arg(long, allow_hyphen_values = true)]
    pub v0: Option<f64>,

    /// Acceleration, m/s²
    #[arg(long, allow_hyphen_values = true)]
    pub accel: Option<f64>,

    /// Maximum time, s
    #[arg(long)]
    pub t_max: Option<f64>,
}

impl MotionArgs {
    /// Fills the missing values from the settings.
    pub fn parameters(&self, settings: &Settings) -> MotionParameters {
        let defaults = settings.motion.parameters();
        MotionParameters::new(
            self.v0.unwrap_or(defaults.initial_velocity),
            self.accel.unwrap_or(defaults.acceleration),
            self.t_max.unwrap_or(defaults.max_time),
        )
    }
}

/// Parses the command line and dispatches.
pub fn run() -> ShellResult<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Command::Session);
    dispatch(command, &settings)
}

fn dispatch(command: Command, settings: &Settings) -> ShellResult<()> {
    let max_samples = settings.motion.max_samples;
    match command {
        Command::Plot {
            motion,
            output,
            format,
            show,
        } => {
            let params = motion.parameters(settings);
            shell::validate(&params, max_samples)?;
            let series = compute(&params);
            let size = (settings.chart.width, settings.chart.height);
            if show {
                render(&series)?.with_size(size.0, size.1).show()?;
            } else {
                shell::export_chart(&series, &output, format, size)?;
                println!("{}", shell::summary(&params, &series));
                println!("chart written to {}", output.display());
            }
        }
        Command::Table { motion, every } => {
            let params = motion.parameters(settings);
            shell::validate(&params, max_samples)?;
            let series = compute(&params);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            shell::write_table(&mut out, &series, every)?;
            out.flush()?;
        }
        Command::Ask { motion, question } => {
            let params = motion.parameters(settings);
            shell::validate(&params, max_samples)?;
            let assistant = build_assistant(settings)?;
            let answer = assistant.ask(&AssistantRequest::new(&params, question.join(" ")))?;
            println!("{}", answer);
        }
        Command::Session => {
            let assistant = build_assistant(settings)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut session = Session::new(stdin.lock(), stdout.lock(), &assistant, settings);
            session.run()?;
        }
    }
    Ok(())
}

fn build_assistant(settings: &Settings) -> ShellResult<OpenAiAssistant> {
    let lookup = config::api_key();
    match &lookup.source {
        KeySource::Environment(name) => log::debug!("assistant key read from {}", name),
        KeySource::None => log::warn!(
            "no assistant key found in {}; questions will fail",
            config::API_KEY_VARS.join(" or ")
        ),
    }
    Ok(OpenAiAssistant::new(&settings.assistant, lookup.key)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_arguments() {
        let cli = Cli::try_parse_from([
            "mrua", "plot", "--v0", "3", "--accel", "-1.62", "--t-max", "2", "-o", "moon.json",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Plot { motion, output, format, show }) => {
                assert_eq!(motion.v0, Some(3.0));
                assert_eq!(motion.accel, Some(-1.62));
                assert_eq!(motion.t_max, Some(2.0));
                assert_eq!(output, PathBuf::from("moon.json"));
                assert_eq!(format, None);
                assert!(!show);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn format_flag_is_parsed() {
        let cli = Cli::try_parse_from(["mrua", "plot", "--format", "gp"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Plot { format: Some(ChartFormat::Script), .. })
        ));
        assert!(Cli::try_parse_from(["mrua", "plot", "--format", "bmp"]).is_err());
    }

    #[test]
    fn question_words_are_collected() {
        let cli = Cli::try_parse_from(["mrua", "ask", "why", "does", "it", "fall?"]).unwrap();
        match cli.command {
            Some(Command::Ask { question, .. }) => assert_eq!(question.join(" "), "why does it fall?"),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["mrua", "ask"]).is_err());
    }

    #[test]
    fn no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["mrua"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn missing_values_come_from_settings() {
        let mut settings = Settings::default();
        settings.motion.acceleration = -1.62;
        let args = MotionArgs {
            v0: Some(2.0),
            ..MotionArgs::default()
        };
        let p = args.parameters(&settings);
        assert_eq!(p, MotionParameters::new(2.0, -1.62, 5.0));
    }

    #[test]
    fn invalid_time_is_rejected_before_compute() {
        let settings = Settings::default();
        let command = Command::Table {
            motion: MotionArgs {
                t_max: Some(-1.0),
                ..MotionArgs::default()
            },
            every: 10,
        };
        assert!(dispatch(command, &settings).is_err());
    }
}
