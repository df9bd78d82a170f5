use std::fs;
use std::path::Path;
use std::str::FromStr;

use gnuplot::{AxesCommon, Caption, Color, Figure, LineWidth};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, RenderError};
use crate::kinematics::MotionSeries;

/// Default figure size in pixels (6 x 8 inches at 100 dpi).
pub const DEFAULT_SIZE: (u32, u32) = (600, 800);

/// One subplot: a single quantity against time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry of the line
    pub caption: String,
    /// gnuplot color name
    pub color: String,
    pub grid: bool,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Panel {
    fn new(title: &str, y_label: &str, caption: &str, color: &str, x: &[f64], y: &[f64]) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Time (s)".to_string(),
            y_label: y_label.to_string(),
            caption: caption.to_string(),
            color: color.to_string(),
            grid: true,
            x: x.to_vec(),
            y: y.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Three stacked panels: position, velocity and acceleration vs. time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub panels: [Panel; 3],
    /// (width, height) in pixels
    pub size: (u32, u32),
}

/// Output formats supported by [`Chart::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartFormat {
    /// Vector image, drawn by gnuplot
    Svg,
    /// Raster image, drawn by gnuplot
    Png,
    /// gnuplot command script; needs no gnuplot to write
    Script,
    /// Serialized plot description
    Json,
}

impl ChartFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ChartFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "png" => Ok(ChartFormat::Png),
            "gp" | "gnuplot" | "plt" | "script" => Ok(ChartFormat::Script),
            "json" => Ok(ChartFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Builds the three-panel chart of a series.
///
/// An empty series yields three labeled panels without data. Components of
/// unequal length are rejected with [`RenderError::LengthMismatch`].
pub fn render(series: &MotionSeries) -> Result<Chart, RenderError> {
    let expected = series.times().len();
    let components = [
        ("positions", series.positions()),
        ("velocities", series.velocities()),
        ("accelerations", series.accelerations()),
    ];
    for (quantity, values) in components {
        if values.len() != expected {
            return Err(RenderError::LengthMismatch {
                quantity,
                expected,
                actual: values.len(),
            });
        }
    }

    let t = series.times();
    Ok(Chart {
        panels: [
            Panel::new("Position vs Time", "Position (m)", "x(t)", "blue", t, series.positions()),
            Panel::new("Velocity vs Time", "Velocity (m/s)", "v(t)", "orange", t, series.velocities()),
            Panel::new(
                "Acceleration vs Time",
                "Acceleration (m/s²)",
                "a(t)",
                "green",
                t,
                series.accelerations(),
            ),
        ],
        size: DEFAULT_SIZE,
    })
}

impl Chart {
    /// Returns the chart resized to `width` x `height` pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Builds a gnuplot figure laid out as 3 rows x 1 column.
    pub fn to_figure(&self) -> Figure {
        let mut fg = Figure::new();
        fg.set_multiplot_layout(3, 1);

        for panel in &self.panels {
            let axes = fg.axes2d();
            axes.set_title(&panel.title, &[]);
            axes.set_x_label(&panel.x_label, &[]);
            axes.set_y_label(&panel.y_label, &[]);
            axes.set_x_grid(panel.grid);
            axes.set_y_grid(panel.grid);
            // gnuplot refuses to plot an empty data block
            if !panel.is_empty() {
                axes.lines(
                    &panel.x,
                    &panel.y,
                    &[
                        Caption(panel.caption.as_str()),
                        Color(panel.color.as_str().into()),
                        LineWidth(1.5),
                    ],
                );
            }
        }
        fg
    }

    /// Serializes the plot description.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the chart to `path` in the given format.
    pub fn save(&self, path: &Path, format: ChartFormat) -> Result<(), ExportError> {
        let (width, height) = self.size;
        match format {
            ChartFormat::Svg => self
                .to_figure()
                .save_to_svg(path, width, height)
                .map_err(|e| ExportError::Gnuplot(e.to_string()))?,
            ChartFormat::Png => self
                .to_figure()
                .save_to_png(path, width, height)
                .map_err(|e| ExportError::Gnuplot(e.to_string()))?,
            ChartFormat::Script => {
                self.to_figure().echo_to_file(path);
                if !path.exists() {
                    return Err(ExportError::Gnuplot(format!(
                        "script was not written to {}",
                        path.display()
                    )));
                }
            }
            ChartFormat::Json => {
                let json = self.to_json()?;
                fs::write(path, json).map_err(|source| ExportError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        log::info!("chart written to {}", path.display());
        Ok(())
    }

    /// Opens the chart in an interactive gnuplot window.
    pub fn show(&self) -> Result<(), ExportError> {
        self.to_figure()
            .show()
            .map(|_| ())
            .map_err(|e| ExportError::Gnuplot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::compute;
    use crate::motion_parameters::MotionParameters;

    #[test]
    fn panels_are_ordered_and_labeled() {
        let chart = render(&compute(&MotionParameters::default())).unwrap();
        let titles: Vec<_> = chart.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Position vs Time", "Velocity vs Time", "Acceleration vs Time"]);

        let y_labels: Vec<_> = chart.panels.iter().map(|p| p.y_label.as_str()).collect();
        assert_eq!(y_labels, ["Position (m)", "Velocity (m/s)", "Acceleration (m/s²)"]);

        for panel in &chart.panels {
            assert_eq!(panel.x_label, "Time (s)");
            assert!(panel.grid);
            assert_eq!(panel.x.len(), 500);
            assert_eq!(panel.y.len(), 500);
        }
    }

    #[test]
    fn panels_carry_the_series() {
        let series = compute(&MotionParameters::new(2.0, 1.0, 1.0));
        let chart = render(&series).unwrap();
        assert_eq!(chart.panels[0].x, series.times());
        assert_eq!(chart.panels[0].y, series.positions());
        assert_eq!(chart.panels[1].y, series.velocities());
        assert_eq!(chart.panels[2].y, series.accelerations());
    }

    #[test]
    fn empty_series_renders_labeled_empty_panels() {
        let series = compute(&MotionParameters::with_time_step(1.0, 1.0, 0.005, 0.01));
        let chart = render(&series).unwrap();
        for panel in &chart.panels {
            assert!(panel.is_empty());
            assert!(panel.y.is_empty());
            assert!(!panel.title.is_empty());
            assert!(!panel.y_label.is_empty());
        }
        // figure construction must not choke on empty panels
        let _ = chart.to_figure();
    }

    #[test]
    fn truncated_component_is_rejected() {
        let s = compute(&MotionParameters::default());
        let mut positions = s.positions().to_vec();
        positions.pop();
        let bad = MotionSeries::from_parts(
            s.times().to_vec(),
            positions,
            s.velocities().to_vec(),
            s.accelerations().to_vec(),
        );
        assert_eq!(
            render(&bad),
            Err(RenderError::LengthMismatch {
                quantity: "positions",
                expected: 500,
                actual: 499,
            })
        );
    }

    #[test]
    fn longer_acceleration_is_rejected() {
        let bad = MotionSeries::from_parts(vec![0.0], vec![0.0], vec![1.0], vec![2.0, 2.0]);
        assert!(matches!(
            render(&bad),
            Err(RenderError::LengthMismatch { quantity: "accelerations", .. })
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let series = compute(&MotionParameters::new(5.0, -2.0, 3.0));
        assert_eq!(render(&series).unwrap(), render(&series).unwrap());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ChartFormat::from_path(Path::new("a.svg")), Some(ChartFormat::Svg));
        assert_eq!(ChartFormat::from_path(Path::new("a.PNG")), Some(ChartFormat::Png));
        assert_eq!(ChartFormat::from_path(Path::new("a.gp")), Some(ChartFormat::Script));
        assert_eq!(ChartFormat::from_path(Path::new("a.json")), Some(ChartFormat::Json));
        assert_eq!(ChartFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(ChartFormat::from_path(Path::new("chart")), None);
    }

    #[test]
    fn json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let chart = render(&compute(&MotionParameters::new(1.0, 2.0, 0.5))).unwrap();
        chart.save(&path, ChartFormat::Json).unwrap();

        let loaded: Chart = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, chart);
        assert_eq!(loaded.size, DEFAULT_SIZE);
    }

    #[test]
    fn json_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.json");
        let chart = render(&compute(&MotionParameters::default())).unwrap();
        assert!(matches!(chart.save(&path, ChartFormat::Json), Err(ExportError::Io { .. })));
    }

    #[test]
    fn script_export_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.gp");
        let chart = render(&compute(&MotionParameters::default())).unwrap();
        chart.save(&path, ChartFormat::Script).unwrap();

        let script = String::from_utf8_lossy(&fs::read(&path).unwrap()).into_owned();
        assert!(script.contains("multiplot"));
        assert!(script.contains("Velocity vs Time"));
    }
}
