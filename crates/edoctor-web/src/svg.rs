//! Inline SVG rendering of the dashboard chart specs.

use std::f64::consts::PI;
use std::fmt::Write as _;

use edoctor_core::charts::{BubbleChartSpec, PieChartSpec};

use crate::html::escape_html;

const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 440.0;
const MARGIN: f64 = 64.0;
const MIN_RADIUS: f64 = 4.0;
const MAX_RADIUS: f64 = 30.0;
const AXIS_TICKS: usize = 5;

fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn render_bubble_chart(spec: &BubbleChartSpec) -> String {
    let max_x = axis_max(spec.points.iter().map(|point| point.x));
    let max_y = axis_max(spec.points.iter().map(|point| point.y));
    let max_size = spec
        .points
        .iter()
        .map(|point| point.size)
        .fold(0.0_f64, f64::max);
    let plot_width = WIDTH - 2.0 * MARGIN;
    let plot_height = HEIGHT - 2.0 * MARGIN;
    let to_x = |value: f64| MARGIN + value / max_x * plot_width;
    let to_y = |value: f64| HEIGHT - MARGIN - value / max_y * plot_height;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{}">"##,
        escape_html(&spec.y_label)
    );
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#9ca3af"/><line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{bottom}" stroke="#9ca3af"/>"##,
        bottom = HEIGHT - MARGIN,
        right = WIDTH - MARGIN,
    );
    for tick in 0..=AXIS_TICKS {
        let fraction = tick as f64 / AXIS_TICKS as f64;
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="11" fill="#6b7280">{label}</text>"##,
            x = to_x(fraction * max_x),
            y = HEIGHT - MARGIN + 18.0,
            label = format_tick(fraction * max_x),
        );
        let _ = write!(
            svg,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" fill="#6b7280">{label}</text>"##,
            x = MARGIN - 8.0,
            y = to_y(fraction * max_y) + 4.0,
            label = format_tick(fraction * max_y),
        );
    }
    let _ = write!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="12" fill="#374151">{label}</text>"##,
        x = WIDTH / 2.0,
        y = HEIGHT - 16.0,
        label = escape_html(&spec.x_label),
    );
    let _ = write!(
        svg,
        r##"<text x="16" y="{y:.1}" text-anchor="middle" font-size="12" fill="#374151" transform="rotate(-90, 16, {y:.1})">{label}</text>"##,
        y = HEIGHT / 2.0,
        label = escape_html(&spec.y_label),
    );

    for (index, point) in spec.points.iter().enumerate() {
        let radius = if max_size > 0.0 {
            MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * (point.size / max_size).sqrt()
        } else {
            MIN_RADIUS
        };
        let _ = write!(
            svg,
            r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}" fill-opacity="0.6" stroke="{color}"><title>{hover}&#10;{x_label}: {x}&#10;{y_label}: {y}&#10;{size_label}: {size:.2}</title></circle>"##,
            cx = to_x(point.x),
            cy = to_y(point.y),
            color = color_for(index),
            hover = escape_html(&point.hover_label),
            x_label = escape_html(&spec.x_label),
            x = point.x,
            y_label = escape_html(&spec.y_label),
            y = point.y,
            size_label = escape_html(&spec.size_label),
            size = point.size,
        );
    }
    svg.push_str("</svg>");
    svg
}

pub fn render_pie_chart(spec: &PieChartSpec) -> String {
    let (cx, cy, radius) = (HEIGHT / 2.0, HEIGHT / 2.0, HEIGHT / 2.0 - 24.0);
    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{}">"##,
        escape_html(&spec.value_label)
    );

    let visible = spec
        .slices
        .iter()
        .enumerate()
        .filter(|(_, slice)| slice.value > 0.0)
        .collect::<Vec<_>>();
    // Shares are of the drawn wedges only, so they always close the circle.
    let visible_total: f64 = visible.iter().map(|(_, slice)| slice.value).sum();
    let mut start = -PI / 2.0;
    for (index, slice) in &visible {
        let share = slice.value / visible_total;
        let title = format!(
            "{}&#10;{}: {} ({:.1}%)",
            escape_html(&slice.category),
            escape_html(&spec.value_label),
            slice.value,
            share * 100.0
        );
        if visible.len() == 1 {
            let _ = write!(
                svg,
                r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"><title>{title}</title></circle>"##,
                color = color_for(*index),
            );
            continue;
        }
        let end = start + share * 2.0 * PI;
        let large_arc = u8::from(share > 0.5);
        let _ = write!(
            svg,
            r##"<path d="M {cx:.1} {cy:.1} L {x0:.2} {y0:.2} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x1:.2} {y1:.2} Z" fill="{color}" stroke="#ffffff"><title>{title}</title></path>"##,
            x0 = cx + radius * start.cos(),
            y0 = cy + radius * start.sin(),
            x1 = cx + radius * end.cos(),
            y1 = cy + radius * end.sin(),
            color = color_for(*index),
        );
        start = end;
    }

    let legend_x = HEIGHT + 16.0;
    for (row, (index, slice)) in visible.iter().enumerate() {
        let y = 28.0 + row as f64 * 16.0;
        if y > HEIGHT - 8.0 {
            break;
        }
        let _ = write!(
            svg,
            r##"<rect x="{legend_x:.1}" y="{top:.1}" width="10" height="10" fill="{color}"/><text x="{text_x:.1}" y="{y:.1}" font-size="11" fill="#374151">{label}</text>"##,
            top = y - 9.0,
            color = color_for(*index),
            text_x = legend_x + 16.0,
            label = escape_html(&slice.category),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.05 } else { 1.0 }
}

fn format_tick(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edoctor_core::charts::{PieSlice, build_bubble_spec, build_pie_spec};
    use edoctor_core::dataset::{HealthRecord, HealthTable};

    fn table() -> HealthTable {
        HealthTable::new(vec![
            HealthRecord {
                region: "Kerala".to_string(),
                need_assessed: 120_000.0,
                achieved_deliveries: 90_000.0,
                percent_achieved: 75.0,
            },
            HealthRecord {
                region: "Goa & <Diu>".to_string(),
                need_assessed: 5_000.0,
                achieved_deliveries: 4_500.0,
                percent_achieved: 90.0,
            },
        ])
    }

    #[test]
    fn bubble_chart_draws_one_circle_per_region() {
        let svg = render_bubble_chart(&build_bubble_spec(&table()).expect("bubble"));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("Goa &amp; &lt;Diu&gt;"));
        assert!(!svg.contains("<Diu>"));
    }

    #[test]
    fn pie_chart_draws_one_wedge_per_positive_slice() {
        let svg = render_pie_chart(&build_pie_spec(&table()).expect("pie"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Kerala"));
        assert!(svg.contains("(95.2%)"));
    }

    #[test]
    fn pie_shares_ignore_non_positive_slices() {
        let spec = PieChartSpec {
            slices: vec![
                PieSlice {
                    category: "StateA".to_string(),
                    value: 30.0,
                },
                PieSlice {
                    category: "StateB".to_string(),
                    value: -20.0,
                },
                PieSlice {
                    category: "StateC".to_string(),
                    value: 10.0,
                },
                PieSlice {
                    category: "StateD".to_string(),
                    value: 0.0,
                },
            ],
            total: 20.0,
            ..build_pie_spec(&table()).expect("pie")
        };
        let svg = render_pie_chart(&spec);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("StateA&#10;Institutional Deliveries: 30 (75.0%)"));
        assert!(svg.contains("StateC&#10;Institutional Deliveries: 10 (25.0%)"));
        assert!(!svg.contains("StateB"));
    }

    #[test]
    fn single_slice_pie_is_a_full_circle() {
        let only = HealthTable::new(vec![table().records()[0].clone()]);
        let svg = render_pie_chart(&build_pie_spec(&only).expect("pie"));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(25_200.0), "25k");
        assert_eq!(format_tick(2_500_000.0), "2.5M");
    }
}
