use crate::error::{ChartError, Result};
use crate::experiment::{ExperimentKind, SeriesDecl, WsMetric};
use crate::normalize::SeriesSet;
use crate::style::{LineStyle, Marker, StyleDescriptor};
use chrono::Local;
use plotters::element::{DynElement, IntoDynElement};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};

// Font sizes, tuned for the 1920x1080 canvas.
const TITLE_FONT_SIZE: u32 = 48;
const AXIS_LABEL_FONT_SIZE: u32 = 30;
const TICK_LABEL_FONT_SIZE: u32 = 22;
const LEGEND_FONT_SIZE: u32 = 24;

const CHART_WIDTH: u32 = 1920;
const CHART_HEIGHT: u32 = 1080;

/// Everything the rendering engine needs besides the series themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDescriptor {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Labeled grid line every this many x units.
    pub major_tick: usize,
    /// Faint grid line every this many x units.
    pub minor_tick: usize,
    artifact_stem: String,
}

impl ChartDescriptor {
    /// Build the descriptor for one chart of `kind`. `iters` is the averaged
    /// iteration count for multi-iteration inputs; `metric` only affects
    /// work-stealing charts.
    pub fn for_kind(
        kind: ExperimentKind,
        iters: Option<usize>,
        metric: WsMetric,
        set: &SeriesSet,
    ) -> Self {
        let (title, x_label, y_label) = match kind {
            ExperimentKind::LlicThroughput => (
                "Time to perform 500,000,000 interspersed LL/IC operations".to_string(),
                "Processors",
                if iters.is_some() {
                    "Time in ns"
                } else {
                    "Time in ms"
                },
            ),
            ExperimentKind::LlicLatency => (
                "Operation latency of concurrent counter implementations".to_string(),
                "Concurrent Threads",
                "Operation Latency [ns/op]",
            ),
            ExperimentKind::WorkStealing => {
                let graph = set.graph_type().unwrap_or("UNKNOWN");
                let (title, y_label) = match metric {
                    WsMetric::ExecutionTime => (
                        format!(
                            "Time to calculate the spanning tree of a {} graph with 1,000,000 vertices",
                            graph
                        ),
                        "Time in nanoseconds",
                    ),
                    WsMetric::Puts => (
                        format!("Put operations on a {} graph of 1,000,000 vertices", graph),
                        "Put operations",
                    ),
                    WsMetric::Takes => (
                        format!("Take operations on a {} graph of 1,000,000 vertices", graph),
                        "Take operations",
                    ),
                    WsMetric::Steals => (
                        format!("Steal operations on a {} graph of 1,000,000 vertices", graph),
                        "Steal operations",
                    ),
                };
                (title, "Processors", y_label)
            }
        };

        let mut artifact_stem = kind.name().to_string();
        if let Some(iters) = iters {
            artifact_stem.push_str(&format!("-mean{}", iters));
        }
        if kind == ExperimentKind::WorkStealing {
            if metric != WsMetric::ExecutionTime {
                artifact_stem.push_str(&format!("-{}", metric.name()));
            }
            if let Some(graph) = set.graph_type() {
                artifact_stem.push_str(&format!("-{}", graph.to_lowercase()));
            }
        }

        Self {
            title,
            x_label,
            y_label,
            major_tick: 8,
            minor_tick: 1,
            artifact_stem,
        }
    }

    /// Artifact file name for a given time-of-day token. Two invocations in
    /// the same second can still collide; this is a documented limitation.
    pub fn artifact_name(&self, time_token: &str) -> String {
        format!("{}-{}.svg", self.artifact_stem, time_token)
    }
}

/// One fully-resolved series handed to the rendering engine: x positions are
/// the integers 1..=N (processor/thread counts).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInstruction {
    pub key: String,
    pub label: &'static str,
    pub line_style: LineStyle,
    pub marker: Marker,
    pub color: (u8, u8, u8),
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Assemble the ordered instruction list for the rendering engine: one entry
/// per declared key present in the set, in declared order.
pub fn assemble(
    set: &SeriesSet,
    styles: &BTreeMap<String, StyleDescriptor>,
    declared: &[SeriesDecl],
) -> Vec<SeriesInstruction> {
    let mut instructions = Vec::new();
    for decl in declared {
        let (Some(ys), Some(style)) = (set.get(decl.key), styles.get(decl.key)) else {
            continue;
        };
        instructions.push(SeriesInstruction {
            key: decl.key.to_string(),
            label: style.label,
            line_style: style.line_style,
            marker: style.marker,
            color: style.color,
            xs: (1..=ys.len()).map(|x| x as f64).collect(),
            ys: ys.to_vec(),
        });
    }
    instructions
}

/// Render one chart into `output_dir` and return the artifact path.
///
/// A failure from the rendering engine is fatal for the invocation; there are
/// no retries.
pub fn render(
    set: &SeriesSet,
    styles: &BTreeMap<String, StyleDescriptor>,
    declared: &[SeriesDecl],
    descriptor: &ChartDescriptor,
    output_dir: &Path,
) -> Result<PathBuf> {
    let instructions = assemble(set, styles, declared);
    if instructions.is_empty() {
        return Err(ChartError::RenderingFailed("no series to plot".into()));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| {
        ChartError::RenderingFailed(format!("create {}: {}", output_dir.display(), e))
    })?;

    let time_token = Local::now().format("%H-%M-%S").to_string();
    let path = output_dir.join(descriptor.artifact_name(&time_token));
    draw(&instructions, descriptor, &path)?;

    println!("Generated: {}", path.display());
    Ok(path)
}

fn draw(instructions: &[SeriesInstruction], descriptor: &ChartDescriptor, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let size = instructions[0].xs.len();
    let x_max = (size + 1) as f64;
    let y_max = instructions
        .iter()
        .flat_map(|s| s.ys.iter())
        .fold(0.0f64, |a, &b| a.max(b))
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(&descriptor.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(100)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max.max(1.0))
        .map_err(draw_err)?;

    let major = descriptor.major_tick;
    chart
        .configure_mesh()
        .x_labels(size + 2)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if (x - idx as f64).abs() < 0.3 && idx % major == 0 {
                format!("{}", idx)
            } else {
                String::new()
            }
        })
        .x_max_light_lines(descriptor.major_tick / descriptor.minor_tick)
        .y_labels(10)
        .bold_line_style(BLACK.mix(0.2))
        .light_line_style(BLACK.mix(0.08))
        .x_desc(descriptor.x_label)
        .y_desc(descriptor.y_label)
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()
        .map_err(draw_err)?;

    for series in instructions {
        let color = RGBColor(series.color.0, series.color.1, series.color.2);
        let stroke = color.stroke_width(3);
        let points: Vec<(f64, f64)> = series
            .xs
            .iter()
            .copied()
            .zip(series.ys.iter().copied())
            .collect();

        let anno = match series.line_style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points.clone(), stroke)),
            LineStyle::Dashed => {
                chart.draw_series(DashedLineSeries::new(points.clone(), 10, 6, stroke))
            }
            LineStyle::Dotted => {
                chart.draw_series(DashedLineSeries::new(points.clone(), 2, 5, stroke))
            }
        }
        .map_err(draw_err)?;
        anno.label(series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));

        let marker = series.marker;
        let marker_style = color.filled();
        for coord in points {
            chart
                .plotting_area()
                .draw(&marker_element(marker, coord, 7, marker_style))
                .map_err(draw_err)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Build the drawable element for one marker symbol at `coord`.
fn marker_element<'a, DB: DrawingBackend + 'a>(
    marker: Marker,
    coord: (f64, f64),
    size: i32,
    style: ShapeStyle,
) -> DynElement<'a, DB, (f64, f64)> {
    let at = EmptyElement::at(coord);
    match marker {
        Marker::Square => {
            (at + Rectangle::new([(-size, -size), (size, size)], style)).into_dyn()
        }
        Marker::Star => (at + Polygon::new(star_vertices(5, size), style)).into_dyn(),
        Marker::Pentagon => {
            (at + Polygon::new(regular_polygon(5, size, -FRAC_PI_2), style)).into_dyn()
        }
        Marker::TriangleDown => {
            (at + Polygon::new(regular_polygon(3, size, FRAC_PI_2), style)).into_dyn()
        }
        Marker::Cross => (at + Cross::new((0, 0), size, style)).into_dyn(),
        Marker::TriangleUp => {
            (at + Polygon::new(regular_polygon(3, size, -FRAC_PI_2), style)).into_dyn()
        }
        Marker::Diamond => {
            (at + Polygon::new(vec![(0, -size), (size, 0), (0, size), (-size, 0)], style)).into_dyn()
        }
        Marker::Circle => (at + Circle::new((0, 0), size, style)).into_dyn(),
        Marker::Plus => (at
            + PathElement::new(vec![(-size, 0), (size, 0)], style)
            + PathElement::new(vec![(0, -size), (0, size)], style))
        .into_dyn(),
        Marker::Tick => (at
            + PathElement::new(vec![(0, 0), (0, size)], style)
            + PathElement::new(vec![(0, 0), (-size, -size)], style)
            + PathElement::new(vec![(0, 0), (size, -size)], style))
        .into_dyn(),
        Marker::Octagon => {
            (at + Polygon::new(regular_polygon(8, size, TAU / 16.0), style)).into_dyn()
        }
    }
}

fn regular_polygon(sides: usize, radius: i32, rotation: f64) -> Vec<(i32, i32)> {
    let r = radius as f64;
    (0..sides)
        .map(|i| {
            let angle = rotation + i as f64 * TAU / sides as f64;
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

fn star_vertices(points: usize, radius: i32) -> Vec<(i32, i32)> {
    let n = points * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 {
                radius as f64
            } else {
                radius as f64 * 0.4
            };
            let angle = -FRAC_PI_2 + i as f64 * TAU / n as f64;
            ((r * angle.cos()).round() as i32, (r * angle.sin()).round() as i32)
        })
        .collect()
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::RenderingFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::style::assign_styles;
    use serde_json::json;

    fn throughput_set() -> SeriesSet {
        normalize(
            &json!({
                "CAS": [10.0, 20.0],
                "FAI": [12.0, 22.0],
                "RW": [9.0, 19.0],
                "RWNC": [11.0, 21.0],
            }),
            ExperimentKind::LlicThroughput,
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_orders_and_positions() {
        let set = throughput_set();
        let declared = ExperimentKind::LlicThroughput.declared_series();
        let styles = assign_styles(&set, declared).unwrap();

        let instructions = assemble(&set, &styles, declared);
        assert_eq!(instructions.len(), 4);

        let keys: Vec<&str> = instructions.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["CAS", "FAI", "RW", "RWNC"]);

        for instruction in &instructions {
            assert_eq!(instruction.xs, vec![1.0, 2.0]);
        }
        assert_eq!(instructions[0].ys, vec![10.0, 20.0]);
        assert_eq!(instructions[0].label, "LL/IC CAS");
    }

    #[test]
    fn test_descriptor_single_run_throughput() {
        let set = throughput_set();
        let descriptor = ChartDescriptor::for_kind(
            ExperimentKind::LlicThroughput,
            None,
            WsMetric::ExecutionTime,
            &set,
        );

        assert_eq!(descriptor.y_label, "Time in ms");
        assert_eq!(descriptor.x_label, "Processors");
        assert_eq!(descriptor.major_tick, 8);
        assert_eq!(descriptor.minor_tick, 1);
        assert_eq!(
            descriptor.artifact_name("12-00-00"),
            "llic-throughput-12-00-00.svg"
        );
    }

    #[test]
    fn test_descriptor_encodes_iteration_count() {
        let set = throughput_set();
        let descriptor = ChartDescriptor::for_kind(
            ExperimentKind::LlicThroughput,
            Some(3),
            WsMetric::ExecutionTime,
            &set,
        );

        assert_eq!(descriptor.y_label, "Time in ns");
        assert_eq!(
            descriptor.artifact_name("09-15-30"),
            "llic-throughput-mean3-09-15-30.svg"
        );
    }

    #[test]
    fn test_descriptor_work_stealing_graph() {
        let set = normalize(
            &json!({
                "values": [
                    {"algorithm": "CHASELEV", "executionTime": 50.0, "graphType": "TORUS_2D",
                     "puts": 1.0, "takes": 1.0, "steals": 1.0},
                ]
            }),
            ExperimentKind::WorkStealing,
        )
        .unwrap();
        let descriptor = ChartDescriptor::for_kind(
            ExperimentKind::WorkStealing,
            None,
            WsMetric::ExecutionTime,
            &set,
        );

        assert!(descriptor.title.contains("TORUS_2D"));
        assert_eq!(
            descriptor.artifact_name("23-59-59"),
            "work-stealing-torus_2d-23-59-59.svg"
        );

        let steals = ChartDescriptor::for_kind(
            ExperimentKind::WorkStealing,
            None,
            WsMetric::Steals,
            &set,
        );
        assert_eq!(steals.y_label, "Steal operations");
        assert_eq!(
            steals.artifact_name("23-59-59"),
            "work-stealing-steals-torus_2d-23-59-59.svg"
        );
    }

    #[test]
    fn test_render_writes_artifact() {
        let set = throughput_set();
        let declared = ExperimentKind::LlicThroughput.declared_series();
        let styles = assign_styles(&set, declared).unwrap();
        let descriptor = ChartDescriptor::for_kind(
            ExperimentKind::LlicThroughput,
            None,
            WsMetric::ExecutionTime,
            &set,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = render(&set, &styles, declared, &descriptor, dir.path()).unwrap();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn test_render_rejects_empty_set() {
        let set = SeriesSet::new(BTreeMap::new());
        let declared = ExperimentKind::LlicThroughput.declared_series();
        let styles = assign_styles(&set, declared).unwrap();
        let descriptor = ChartDescriptor::for_kind(
            ExperimentKind::LlicThroughput,
            None,
            WsMetric::ExecutionTime,
            &set,
        );

        let dir = tempfile::tempdir().unwrap();
        let err = render(&set, &styles, declared, &descriptor, dir.path()).unwrap_err();
        assert!(matches!(err, ChartError::RenderingFailed(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_marker_vertex_helpers() {
        let triangle = regular_polygon(3, 10, -FRAC_PI_2);
        assert_eq!(triangle.len(), 3);
        assert_eq!(triangle[0], (0, -10));

        let star = star_vertices(5, 10);
        assert_eq!(star.len(), 10);
        assert_eq!(star[0], (0, -10));
    }
}
