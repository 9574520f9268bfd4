//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for a month of sales:
//! - **Price Range Chart**: Bar chart of the number of transactions per price range
//! - **Category Chart**: Pie chart of the number of transactions per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Orient, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{breakdown::CategoryCount, histogram::PriceRangeCount};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The labelled values plotted by a chart.
///
/// A chart built from [ChartSeries::Empty] renders with its axes and title
/// but no data.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ChartSeries {
    Series {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Empty,
}

impl ChartSeries {
    fn from_pairs(pairs: impl Iterator<Item = (String, u64)>) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) =
            pairs.map(|(label, count)| (label, count as f64)).unzip();

        if labels.is_empty() {
            ChartSeries::Empty
        } else {
            ChartSeries::Series { labels, values }
        }
    }

    /// One bar per price range, labelled by the range.
    pub fn from_histogram(histogram: &[PriceRangeCount]) -> Self {
        Self::from_pairs(
            histogram
                .iter()
                .map(|bucket| (bucket.range.clone(), bucket.count)),
        )
    }

    /// One slice per category, labelled by the category name.
    pub fn from_breakdown(breakdown: &[CategoryCount]) -> Self {
        Self::from_pairs(
            breakdown
                .iter()
                .map(|entry| (entry.category.clone(), entry.count)),
        )
    }

    fn labels_and_values(&self) -> (&[String], &[f64]) {
        match self {
            ChartSeries::Series { labels, values } => (labels, values),
            ChartSeries::Empty => (&[], &[]),
        }
    }
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that draws `charts` into their containers.
///
/// The script runs as soon as it is parsed, so it must come after the chart
/// containers. This also lets it run when the dashboard content is swapped in
/// by htmx. Every `<` in the options is written as `\u003c` so that text from
/// the data, such as a category named `</script>`, cannot close the script.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const existing = echarts.getInstanceByDom(chartDom);
                    if (existing) {{
                        existing.dispose();
                    }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                chart.options.replace('<', "\\u003c")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!(
        script { (PreEscaped(script_content)) }
    )
}

pub(super) fn price_range_chart(series: &ChartSeries, month_name: &str) -> Chart {
    let (labels, values) = series.labels_and_values();

    Chart::new()
        .title(
            Title::new()
                .text("Price Range Distribution")
                .subtext(format!("Transactions in {month_name}")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels.to_vec()))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Transactions").data(values.to_vec()))
}

pub(super) fn category_chart(series: &ChartSeries, month_name: &str) -> Chart {
    let (labels, values) = series.labels_and_values();
    let data: Vec<(f64, &str)> = values
        .iter()
        .copied()
        .zip(labels.iter().map(String::as_str))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Category Distribution")
                .subtext(format!("Transactions in {month_name}")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().orient(Orient::Vertical).left("left").top("middle"))
        .series(Pie::new().name("Transactions").radius("55%").data(data))
}
