//! Interactive chart document (plotly.js)

use serde::Serialize;
use serde_json::{json, Value};

use super::figure::FocalChart;
use crate::config::ChartConfig;
use crate::constants::chart::PLOTLY_JS_URL;
use crate::error::Result;

const PLOT_DIV_ID: &str = "lens-focal-usage";

const HOVER_TEMPLATE: &str =
    "<b>Lens:</b> %{y}<br><b>Focal:</b> %{x} mm<br><b>Images:</b> %{customdata}<extra></extra>";

#[derive(Serialize)]
struct Marker {
    size: Vec<f64>,
    opacity: f64,
}

/// One scatter trace per lens
#[derive(Serialize)]
struct Trace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    name: &'a str,
    x: Vec<f64>,
    y: Vec<&'a str>,
    customdata: Vec<usize>,
    marker: Marker,
    hovertemplate: &'static str,
}

#[derive(Serialize)]
struct Figure<'a> {
    data: Vec<Trace<'a>>,
    layout: Value,
}

fn traces<'a>(chart: &'a FocalChart, config: &ChartConfig) -> Vec<Trace<'a>> {
    chart
        .series
        .iter()
        .map(|series| Trace {
            kind: "scatter",
            mode: "markers",
            name: &series.lens,
            x: series.points.iter().map(|p| p.focal_length_mm).collect(),
            y: vec![series.lens.as_str(); series.points.len()],
            customdata: series.points.iter().map(|p| p.count).collect(),
            marker: Marker {
                size: series
                    .points
                    .iter()
                    .map(|p| p.marker_size(config.marker_scale))
                    .collect(),
                opacity: config.marker_opacity,
            },
            hovertemplate: HOVER_TEMPLATE,
        })
        .collect()
}

fn layout(chart: &FocalChart, config: &ChartConfig) -> Value {
    let (x_min, x_max) = chart.ticks.axis_range();

    json!({
        "title": { "text": config.title },
        "xaxis": {
            "title": { "text": "Focal Length (mm)" },
            "tickmode": "linear",
            "tick0": chart.ticks.start,
            "dtick": chart.ticks.step,
            "ticksuffix": "mm",
            "range": [x_min, x_max],
            "showgrid": true,
            "griddash": "dash",
        },
        "yaxis": {
            "title": { "text": "Lens" },
            "type": "category",
        },
        "legend": { "title": { "text": "Lens" } },
        "height": config.height_for(chart.lens_count()),
        "margin": { "l": config.left_margin },
    })
}

/// Plotly figure (`data` + `layout`) as JSON
pub fn figure_json(chart: &FocalChart, config: &ChartConfig) -> Result<String> {
    let figure = Figure {
        data: traces(chart, config),
        layout: layout(chart, config),
    };
    Ok(serde_json::to_string(&figure)?)
}

/// Standalone HTML document rendering the chart with plotly.js
pub fn render_html(chart: &FocalChart, config: &ChartConfig) -> Result<String> {
    // Lens names end up inside a <script> block
    let figure = figure_json(chart, config)?.replace("</", "<\\/");
    let height = config.height_for(chart.lens_count());

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{plotly}"></script>
</head>
<body>
<div id="{div}" style="width:100%;height:{height}px;"></div>
<script>
const figure = {figure};
Plotly.newPlot("{div}", figure.data, figure.layout, {{"responsive": true}});
</script>
</body>
</html>
"#,
        title = escape_html(&config.title),
        plotly = PLOTLY_JS_URL,
        div = PLOT_DIV_ID,
        height = height,
        figure = figure,
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
