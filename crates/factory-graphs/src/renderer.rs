//! Chart rendering trait and SVG implementations

use crate::scale::{LinearScale, AXIS_TICKS};
use crate::theme::{parse_color, Palette};
use crate::types::{ChartKind, ChartSpec, StyleConfig};
use factory_common::{DashError, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

const MARGIN: u32 = 16;
const X_LABEL_AREA: u32 = 48;
const Y_LABEL_AREA: u32 = 64;

/// Trait for rendering charts to SVG
pub trait GraphRenderer: Send + Sync {
    /// Kind of chart this renderer draws
    fn kind(&self) -> ChartKind;

    /// Render the chart into an SVG document
    fn render_svg(&self, spec: &ChartSpec, style: &StyleConfig) -> Result<String>;

}

/// Renderer for a chart kind
pub fn renderer_for(kind: ChartKind) -> Box<dyn GraphRenderer> {
    match kind {
        ChartKind::Line => Box::new(LineChartRenderer::new()),
        ChartKind::Bar => Box::new(BarChartRenderer::new()),
    }
}

/// Render `spec` with the renderer matching its kind
pub fn render_chart(spec: &ChartSpec, style: &StyleConfig) -> Result<String> {
    renderer_for(spec.kind()).render_svg(spec, style)
}

fn font(palette: &Palette, size: u32) -> FontDesc<'_> {
    FontDesc::new(
        FontFamily::from(palette.font_family.as_str()),
        f64::from(size),
        FontStyle::Normal,
    )
}

/// Number of value-axis labels, one per round tick inside the y domain
fn y_label_count(spec: &ChartSpec) -> usize {
    LinearScale::new(spec.y_domain).ticks(AXIS_TICKS).len().max(2)
}

fn format_tick(value: f64, span: f64) -> String {
    if span < 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.0}")
    }
}

/// Line chart with one line per data set; gaps in a series break the line
pub struct LineChartRenderer;

impl LineChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LineChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for LineChartRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    #[instrument(skip_all, fields(chart = %spec.id))]
    fn render_svg(&self, spec: &ChartSpec, style: &StyleConfig) -> Result<String> {
        let palette = &style.palette;
        let text = parse_color(&palette.text);
        let grid = parse_color(&palette.grid);
        let (x0, x1) = spec.x_domain;
        let (y0, y1) = spec.y_domain;

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
            root.fill(&parse_color(&palette.background))?;

            let mut chart = ChartBuilder::on(&root)
                .caption(
                    &spec.title,
                    font(palette, palette.title_font_size).color(&parse_color(&palette.title)),
                )
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let x_format = |x: &f64| format_tick(*x, x1 - x0);
            let y_format = |y: &f64| format_tick(*y, y1 - y0);
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(spec.x_label.as_str())
                .y_labels(y_label_count(spec))
                .y_desc(spec.y_label.as_str())
                .x_label_formatter(&x_format)
                .y_label_formatter(&y_format)
                .label_style(font(palette, palette.label_font_size).color(&text))
                .axis_desc_style(font(palette, palette.label_font_size).color(&text))
                .axis_style(text)
                .bold_line_style(grid.mix(0.6))
                .light_line_style(grid.mix(0.2));
            if !palette.show_grid {
                mesh.disable_mesh();
            }
            mesh.draw()?;

            for dataset in &spec.datasets {
                let color = parse_color(&dataset.color);
                for segment in dataset.segments() {
                    chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
                }

                let points: Vec<(f64, f64)> = dataset.segments().into_iter().flatten().collect();
                chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|point| Circle::new(point, 2, color.filled())),
                    )?
                    .label(dataset.name.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                    });
            }

            if spec.datasets.len() > 1 {
                chart
                    .configure_series_labels()
                    .background_style(parse_color(&palette.background).mix(0.8))
                    .border_style(text)
                    .label_font(font(palette, palette.label_font_size).color(&text))
                    .position(SeriesLabelPosition::UpperRight)
                    .draw()?;
            }

            root.present()?;
        }

        debug!(bytes = svg.len(), "Rendered line chart");
        Ok(svg)
    }
}

/// Bar chart over named categories, drawing the first data set
pub struct BarChartRenderer;

impl BarChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BarChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRenderer for BarChartRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    #[instrument(skip_all, fields(chart = %spec.id))]
    fn render_svg(&self, spec: &ChartSpec, style: &StyleConfig) -> Result<String> {
        let Some(dataset) = spec.datasets.first() else {
            return Err(DashError::graph(format!("Chart '{}' has no data set", spec.id)));
        };
        if spec.categories.is_empty() {
            return Err(DashError::graph(format!("Chart '{}' has no categories", spec.id)));
        }

        let palette = &style.palette;
        let text = parse_color(&palette.text);
        let grid = parse_color(&palette.grid);
        let color = parse_color(&dataset.color);
        let (y0, y1) = spec.y_domain;
        let categories = &spec.categories;
        #[allow(clippy::cast_possible_truncation)]
        let count = categories.len() as u32;

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
            root.fill(&parse_color(&palette.background))?;

            let mut chart = ChartBuilder::on(&root)
                .caption(
                    &spec.title,
                    font(palette, palette.title_font_size).color(&parse_color(&palette.title)),
                )
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d((0..count).into_segmented(), y0..y1)?;

            let x_format = |value: &SegmentValue<u32>| match value {
                SegmentValue::CenterOf(i) => categories.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            };
            let y_format = |y: &f64| format_tick(*y, y1 - y0);
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .x_labels(categories.len() + 1)
                .x_desc(spec.x_label.as_str())
                .y_labels(y_label_count(spec))
                .y_desc(spec.y_label.as_str())
                .x_label_formatter(&x_format)
                .y_label_formatter(&y_format)
                .label_style(font(palette, palette.label_font_size).color(&text))
                .axis_desc_style(font(palette, palette.label_font_size).color(&text))
                .axis_style(text)
                .bold_line_style(grid.mix(0.6))
                .light_line_style(grid.mix(0.2));
            if !palette.show_grid {
                mesh.disable_mesh();
            }
            mesh.draw()?;

            let bars = (0..count).zip(&dataset.data).filter_map(|(i, point)| {
                let value = point.y?;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), value),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                Some(bar)
            });
            chart.draw_series(bars)?;

            let value_style = font(palette, palette.label_font_size)
                .color(&text)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let labels = (0..count).zip(&dataset.data).filter_map(|(i, point)| {
                let label = point.label.clone()?;
                let value = point.y?;
                Some(Text::new(
                    label,
                    (SegmentValue::CenterOf(i), value),
                    value_style.clone(),
                ))
            });
            chart.draw_series(labels)?;

            root.present()?;
        }

        debug!(bytes = svg.len(), bars = count, "Rendered bar chart");
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartId, DataPoint, DataSet};

    fn bar_spec(values: &[Option<f64>]) -> ChartSpec {
        ChartSpec {
            id: ChartId::Occupancy,
            title: "Occupancy".to_string(),
            x_label: "Workstation".to_string(),
            y_label: "Occupancy (%)".to_string(),
            datasets: vec![DataSet {
                name: "occupancy".to_string(),
                data: values
                    .iter()
                    .zip(0..)
                    .map(|(&y, x)| DataPoint::new(f64::from(x), y).with_label("label"))
                    .collect(),
                color: "#007bff".to_string(),
            }],
            categories: (0..values.len()).map(|i| format!("WS{i}")).collect(),
            x_domain: (0.0, values.len() as f64),
            y_domain: (0.0, 100.0),
        }
    }

    fn line_spec() -> ChartSpec {
        ChartSpec {
            id: ChartId::Production,
            title: "Production over time".to_string(),
            x_label: "Day".to_string(),
            y_label: "Units".to_string(),
            datasets: vec![DataSet {
                name: "Completed".to_string(),
                data: vec![
                    DataPoint::new(1.0, Some(1150.0)),
                    DataPoint::new(2.0, None),
                    DataPoint::new(3.0, Some(1140.0)),
                ],
                color: "#4682b4".to_string(),
            }],
            categories: Vec::new(),
            x_domain: (1.0, 3.0),
            y_domain: (0.0, 1200.0),
        }
    }

    #[test]
    fn test_line_chart_svg() {
        let svg = LineChartRenderer::new()
            .render_svg(&line_spec(), &StyleConfig::default())
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Production over time"));
    }

    #[test]
    fn test_bar_chart_svg() {
        let svg = BarChartRenderer::new()
            .render_svg(&bar_spec(&[Some(90.0), None, Some(70.0)]), &StyleConfig::default())
            .unwrap();
        assert!(svg.contains("<rect"));
        assert!(svg.contains("WS2"));
    }

    #[test]
    fn test_bar_chart_without_categories_fails() {
        let err = BarChartRenderer::new()
            .render_svg(&bar_spec(&[]), &StyleConfig::default())
            .unwrap_err();
        assert!(matches!(err, DashError::Graph { .. }));
    }

    #[test]
    fn test_renderer_for_kind() {
        assert_eq!(renderer_for(ChartKind::Line).kind(), ChartKind::Line);
        assert_eq!(renderer_for(ChartKind::Bar).kind(), ChartKind::Bar);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.4, 1.0), "0.4");
        assert_eq!(format_tick(1150.0, 1200.0), "1150");
    }

    #[test]
    fn test_y_label_count_follows_round_ticks() {
        // 0, 200, ..., 1200
        assert_eq!(y_label_count(&line_spec()), 7);
        // 0, 20, ..., 100
        assert_eq!(y_label_count(&bar_spec(&[Some(90.0)])), 6);

        let mut flat = line_spec();
        flat.y_domain = (0.0, 0.0);
        assert_eq!(y_label_count(&flat), 2);
    }
}
