use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::assistant::{Assistant, AssistantRequest};
use crate::chart::{render, ChartFormat};
use crate::config::Settings;
use crate::error::{ShellError, ShellResult};
use crate::kinematics::{sample_count, MotionSeries};
use crate::motion_parameters::MotionParameters;
use crate::series_cache::SeriesCache;

/// Chart file written when no path is given.
pub const DEFAULT_CHART_PATH: &str = "mrua_chart.svg";

const HELP: &str = "\
Commands:
  v0 <m/s>        set the initial velocity
  a <m/s^2>       set the acceleration
  tmax <s>        set the observed time span
  show            print the current conditions
  table [every]   print every n-th sample (default 50)
  plot [file]     export the chart (.svg, .png, .gp, .json)
  ask <question>  ask the tutor about the current motion
  help            show this message
  quit            leave the session";

/// Checks user-supplied conditions before they reach the kinematics engine.
pub fn validate(params: &MotionParameters, max_samples: usize) -> ShellResult<()> {
    let fields = [
        ("initial velocity", params.initial_velocity),
        ("acceleration", params.acceleration),
        ("maximum time", params.max_time),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ShellError::InvalidInput(format!("{} must be a finite number", name)));
        }
    }
    if params.max_time <= 0.0 {
        return Err(ShellError::InvalidInput(
            "maximum time must be greater than zero".to_string(),
        ));
    }
    let samples = sample_count(params);
    if samples > max_samples {
        return Err(ShellError::TooManySamples {
            samples,
            limit: max_samples,
        });
    }
    Ok(())
}

/// One-line description of a computed series.
pub fn summary(params: &MotionParameters, series: &MotionSeries) -> String {
    match series.last() {
        Some((t, x, v, _)) => format!(
            "{} samples over [0, {}) s; at t = {:.2} s: x = {:.3} m, v = {:.3} m/s, a = {} m/s²",
            series.len(),
            params.max_time,
            t,
            x,
            v,
            params.acceleration
        ),
        None => format!(
            "no samples: the time step ({} s) exceeds the maximum time ({} s)",
            params.time_step, params.max_time
        ),
    }
}

/// Writes every `every`-th sample as aligned columns.
pub fn write_table<W: Write>(out: &mut W, series: &MotionSeries, every: usize) -> ShellResult<()> {
    writeln!(
        out,
        "{:>10} {:>14} {:>14} {:>14}",
        "t (s)", "x (m)", "v (m/s)", "a (m/s²)"
    )?;
    for idx in (0..series.len()).step_by(every.max(1)) {
        if let Some((t, x, v, a)) = series.sample(idx) {
            writeln!(out, "{:>10.2} {:>14.4} {:>14.4} {:>14.4}", t, x, v, a)?;
        }
    }
    Ok(())
}

/// Renders the series and writes it to `path`, inferring the format from
/// the extension unless one is given.
pub fn export_chart(
    series: &MotionSeries,
    path: &Path,
    format: Option<ChartFormat>,
    size: (u32, u32),
) -> ShellResult<()> {
    let format = match format.or_else(|| ChartFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(ShellError::InvalidInput(format!(
                "cannot tell the chart format of {}",
                path.display()
            )))
        }
    };
    let chart = render(series)?.with_size(size.0, size.1);
    chart.save(path, format)?;
    Ok(())
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Help,
    Show,
    Quit,
    InitialVelocity(f64),
    Acceleration(f64),
    MaxTime(f64),
    Table(usize),
    Plot(Option<PathBuf>),
    Ask(String),
}

impl Command {
    pub fn parse(line: &str) -> ShellResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let number = |name: &str| -> ShellResult<f64> {
            rest.parse::<f64>()
                .map_err(|_| ShellError::InvalidInput(format!("{} expects a number, got {:?}", name, rest)))
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Command::Empty),
            "help" | "?" => Ok(Command::Help),
            "show" => Ok(Command::Show),
            "quit" | "exit" => Ok(Command::Quit),
            "v0" => Ok(Command::InitialVelocity(number("v0")?)),
            "a" => Ok(Command::Acceleration(number("a")?)),
            "tmax" => Ok(Command::MaxTime(number("tmax")?)),
            "table" if rest.is_empty() => Ok(Command::Table(50)),
            "table" => rest
                .parse::<usize>()
                .map(Command::Table)
                .map_err(|_| ShellError::InvalidInput(format!("table expects a count, got {:?}", rest))),
            "plot" if rest.is_empty() => Ok(Command::Plot(None)),
            "plot" => Ok(Command::Plot(Some(PathBuf::from(rest)))),
            "ask" if rest.is_empty() => Err(ShellError::InvalidInput("ask needs a question".to_string())),
            "ask" => Ok(Command::Ask(rest.to_string())),
            other => Err(ShellError::InvalidInput(format!(
                "unknown command {:?} (try `help`)",
                other
            ))),
        }
    }
}

/// Line-oriented interactive session.
///
/// Every accepted parameter change recomputes the series and prints a
/// summary. Errors, including assistant failures, are printed and the
/// session continues.
pub struct Session<'a, R, W> {
    input: R,
    output: W,
    assistant: &'a dyn Assistant,
    params: MotionParameters,
    series: Rc<MotionSeries>,
    cache: SeriesCache<8>,
    max_samples: usize,
    chart_size: (u32, u32),
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Starts from the configured conditions, or from the built-in defaults
    /// when the configured ones are rejected by [`validate`].
    pub fn new(input: R, output: W, assistant: &'a dyn Assistant, settings: &Settings) -> Self {
        let max_samples = settings.motion.max_samples;
        let mut params = settings.motion.parameters();
        if let Err(e) = validate(&params, max_samples) {
            log::warn!("configured motion rejected ({}); using defaults", e);
            params = MotionParameters::default();
        }

        let mut cache = SeriesCache::new();
        let series = cache.get_or_compute(&params);
        Self {
            input,
            output,
            assistant,
            params,
            series,
            cache,
            max_samples,
            chart_size: (settings.chart.width, settings.chart.height),
        }
    }

    /// Current initial conditions.
    pub fn parameters(&self) -> MotionParameters {
        self.params
    }

    /// Reads and executes commands until `quit` or end of input.
    pub fn run(&mut self) -> ShellResult<()> {
        writeln!(self.output, "MRUA kinematics explorer. Type `help` for commands.")?;
        writeln!(self.output, "{}", summary(&self.params, &self.series))?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let result = Command::parse(&line).and_then(|command| match command {
                Command::Quit => Ok(false),
                other => self.execute(other).map(|_| true),
            });
            match result {
                Ok(true) => {}
                Ok(false) => break,
                Err(ShellError::Io(e)) => return Err(ShellError::Io(e)),
                Err(e) => writeln!(self.output, "error: {}", e)?,
            }
        }
        Ok(())
    }

    /// Executes a single command.
    pub fn execute(&mut self, command: Command) -> ShellResult<()> {
        match command {
            Command::Empty | Command::Quit => {}
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Show => writeln!(
                self.output,
                "v0 = {} m/s, a = {} m/s², t_max = {} s, dt = {} s",
                self.params.initial_velocity,
                self.params.acceleration,
                self.params.max_time,
                self.params.time_step
            )?,
            Command::InitialVelocity(v0) => self.update(MotionParameters {
                initial_velocity: v0,
                ..self.params
            })?,
            Command::Acceleration(a) => self.update(MotionParameters {
                acceleration: a,
                ..self.params
            })?,
            Command::MaxTime(t_max) => self.update(MotionParameters {
                max_time: t_max,
                ..self.params
            })?,
            Command::Table(every) => write_table(&mut self.output, &self.series, every)?,
            Command::Plot(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_PATH));
                export_chart(&self.series, &path, None, self.chart_size)?;
                writeln!(self.output, "chart written to {}", path.display())?;
            }
            Command::Ask(question) => {
                let request = AssistantRequest::new(&self.params, question);
                match self.assistant.ask(&request) {
                    Ok(answer) => writeln!(self.output, "tutor: {}", answer)?,
                    Err(e) => {
                        log::warn!("assistant request failed: {}", e);
                        writeln!(self.output, "could not reach the tutor: {}", e)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Accepts new conditions if they are valid; the previous ones are kept otherwise.
    fn update(&mut self, params: MotionParameters) -> ShellResult<()> {
        validate(&params, self.max_samples)?;
        self.params = params;
        self.series = self.cache.get_or_compute(&params);
        writeln!(self.output, "{}", summary(&self.params, &self.series))?;
        Ok(())
    }
}
