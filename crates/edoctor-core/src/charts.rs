//! Declarative chart specifications for the dashboard view.
//!
//! Nothing here draws; the web shell turns these specs into SVG.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::{
    ACHIEVEMENT_COLUMN, DatasetFetcher, HealthTable, NEED_ASSESSED_COLUMN, PERCENT_ACHIEVED_COLUMN,
    REGION_COLUMN,
};
use crate::error::{EDoctorError, Result};

pub const BUBBLE_HEADING: &str = "Bubble Chart provides a visual representation of how well different regions have performed in achieving institutional deliveries compared to their assessed needs";

pub const PIE_HEADING: &str = "Visualize the proportion of institutional deliveries across different states/union territories (UTs) during the specified period (April to June 2019-20)";

pub const BUBBLE_EXPLANATION: &str = r"Bubble Chart provides a visual representation of how well different regions have performed in achieving institutional deliveries compared to their assessed needs.

The Bubble Chart presented in the example is visualizing maternal health data, particularly focusing on the achievement of institutional deliveries in different states or union territories during the period of April to June for the year 2019-20. Let's break down what the chart is showing:

#### 1: X-axis (horizontal axis): Need Assessed (2019-20) - (A)

This axis represents the assessed needs for maternal health in different states or union territories. Each point on the X-axis corresponds to a specific region, and the position along the axis indicates the magnitude of the assessed needs.

#### 2: Y-axis (vertical axis): Achievement during April to June - Total Institutional Deliveries - (2019-20) - (B)

The Y-axis represents the actual achievement in terms of the number of institutional deliveries during the specified period (April to June) in the year 2019-20. Each point on the Y-axis corresponds to a specific region, and the position along the axis indicates the magnitude of the achieved institutional deliveries.

#### 3: Bubble Size: % Achvt of need assessed (2019-20) - (E=(B/A)100)

The size of each bubble is determined by the percentage achievement of the assessed needs, calculated as % Achvt = (B/A) * 100. Larger bubbles indicate a higher percentage of achievement compared to the assessed needs, suggesting a better performance in delivering institutional healthcare.

#### 4: Color: State/UT

Each bubble is color-coded based on the respective state or union territory it represents. Different colors distinguish between regions, making it easy to identify and compare data points for different states or union territories.

#### 5: Hover Name: State/UT

Hovering over a bubble reveals additional information, such as the name of the state or union territory it represents. This interactive feature allows users to explore specific data points on the chart.
";

pub const PIE_EXPLANATION: &str = r"Visualize the proportion of institutional deliveries across different states/union territories (UTs) during the specified period (April to June 2019-20). Let's break down the components of the graph and its interpretation:

**Key Components:**

#### Slices of the Pie:

Each slice of the pie represents a specific state or UT.

#### Size of Slices:

The size of each slice corresponds to the proportion of institutional deliveries achieved during April to June 2019-20 for the respective state or UT.

#### Hover Information:

Hovering over a slice provides additional information, such as the name of the state/UT and the exact proportion of institutional deliveries.
";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub region: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub hover_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleChartSpec {
    pub x_field: String,
    pub y_field: String,
    pub size_field: String,
    pub color_field: String,
    pub x_label: String,
    pub y_label: String,
    pub size_label: String,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartSpec {
    pub category_field: String,
    pub value_field: String,
    pub value_label: String,
    pub slices: Vec<PieSlice>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel<S> {
    pub heading: String,
    pub spec: S,
    pub explanation_markdown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub regions: usize,
    pub bubble: ChartPanel<BubbleChartSpec>,
    pub pie: ChartPanel<PieChartSpec>,
    pub generated_at: DateTime<Utc>,
}

/// One bubble per row. Size is the table's own percentage column, not recomputed.
pub fn build_bubble_spec(table: &HealthTable) -> Result<BubbleChartSpec> {
    ensure_chartable(table, "bubble")?;
    let points = table
        .records()
        .iter()
        .map(|record| {
            if record.percent_achieved < 0.0 {
                return Err(EDoctorError::SchemaMismatch(format!(
                    "negative achievement percentage for `{}`: {}",
                    record.region, record.percent_achieved
                )));
            }
            Ok(BubblePoint {
                region: record.region.clone(),
                x: record.need_assessed,
                y: record.achieved_deliveries,
                size: record.percent_achieved,
                color: record.region.clone(),
                hover_label: record.region.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BubbleChartSpec {
        x_field: NEED_ASSESSED_COLUMN.to_string(),
        y_field: ACHIEVEMENT_COLUMN.to_string(),
        size_field: PERCENT_ACHIEVED_COLUMN.to_string(),
        color_field: REGION_COLUMN.to_string(),
        x_label: "Need Assessed".to_string(),
        y_label: "Achievement".to_string(),
        size_label: "% Achievement".to_string(),
        points,
    })
}

/// One slice per row; `total` is the plain sum, normalisation is the renderer's job.
pub fn build_pie_spec(table: &HealthTable) -> Result<PieChartSpec> {
    ensure_chartable(table, "pie")?;
    let slices = table
        .records()
        .iter()
        .map(|record| PieSlice {
            category: record.region.clone(),
            value: record.achieved_deliveries,
        })
        .collect::<Vec<_>>();
    let total = slices.iter().map(|slice| slice.value).sum();

    Ok(PieChartSpec {
        category_field: REGION_COLUMN.to_string(),
        value_field: ACHIEVEMENT_COLUMN.to_string(),
        value_label: "Institutional Deliveries".to_string(),
        slices,
        total,
    })
}

/// Drop the aggregate row, then build both panels.
pub fn build_dashboard(table: &HealthTable) -> Result<Dashboard> {
    let regional = table.exclude_aggregate();
    Ok(Dashboard {
        regions: regional.len(),
        bubble: ChartPanel {
            heading: BUBBLE_HEADING.to_string(),
            spec: build_bubble_spec(&regional)?,
            explanation_markdown: BUBBLE_EXPLANATION.to_string(),
        },
        pie: ChartPanel {
            heading: PIE_HEADING.to_string(),
            spec: build_pie_spec(&regional)?,
            explanation_markdown: PIE_EXPLANATION.to_string(),
        },
        generated_at: Utc::now(),
    })
}

/// Fetch, type, filter and chart. Any failure short-circuits before chart construction.
pub fn load_dashboard(fetcher: &DatasetFetcher) -> Result<Dashboard> {
    let table = fetcher.fetch_health_table()?;
    build_dashboard(&table)
}

fn ensure_chartable(table: &HealthTable, chart: &str) -> Result<()> {
    if table.is_empty() {
        return Err(EDoctorError::EmptyDataset(format!(
            "no regional rows available for the {chart} chart"
        )));
    }
    Ok(())
}
