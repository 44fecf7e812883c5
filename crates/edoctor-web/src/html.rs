use std::fmt::Write as _;

use edoctor_core::EDoctorError;
use edoctor_core::charts::Dashboard;
use edoctor_core::features::{FETAL_FIELDS, FieldSpec, MATERNAL_FIELDS, RawForm};
use edoctor_core::prediction::Severity;

use crate::markdown::render_markdown_html;
use crate::svg::{render_bubble_chart, render_pie_chart};

pub const INDEX_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; display: flex; min-height: 100vh; }
aside { width: 280px; background: #f3f4f6; padding: 24px; }
aside h1 { font-size: 22px; margin-top: 0; }
aside p { font-size: 14px; color: #4b5563; }
nav a { display: block; padding: 10px 12px; margin: 4px 0; border-radius: 6px; color: #1f2937; text-decoration: none; }
nav a.active { background: #ff4b4b; color: #ffffff; }
main { flex: 1; padding: 32px 48px; max-width: 1100px; }
.fields { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.fields label { display: flex; flex-direction: column; font-size: 14px; gap: 6px; }
.fields input { padding: 8px; border: 1px solid #d1d5db; border-radius: 6px; font-size: 15px; }
.actions { margin-top: 20px; display: flex; gap: 12px; align-items: center; }
.actions button { padding: 8px 18px; border-radius: 6px; border: 1px solid #d1d5db; background: #ffffff; cursor: pointer; }
.risk { font-weight: bold; font-size: 20px; }
.risk-green { color: green; }
.risk-orange { color: orange; }
.risk-red { color: red; }
.error { color: #b91c1c; background: #fef2f2; border: 1px solid #fecaca; padding: 12px; border-radius: 6px; }
.chart { width: 100%; height: auto; background: #ffffff; }
details { margin: 12px 0 32px; }
details .explanation { white-space: normal; font-weight: bold; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Maternal,
    Fetal,
    Dashboard,
}

const NAV: [(NavItem, &str, &str); 3] = [
    (NavItem::Maternal, "/maternal", "Pregnancy Risk Prediction"),
    (NavItem::Fetal, "/fetal", "Fetal Health Prediction"),
    (NavItem::Dashboard, "/dashboard", "Dashboard"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFlow {
    Maternal,
    Fetal,
}

impl FormFlow {
    fn nav(self) -> NavItem {
        match self {
            Self::Maternal => NavItem::Maternal,
            Self::Fetal => NavItem::Fetal,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Maternal => "Pregnancy Risk Prediction",
            Self::Fetal => "Fetal Health Prediction",
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Maternal => "/maternal",
            Self::Fetal => "/fetal",
        }
    }

    fn button(self) -> &'static str {
        match self {
            Self::Maternal => "Predict Pregnancy Risk",
            Self::Fetal => "Predict Fetal Health",
        }
    }

    fn result_heading(self) -> &'static str {
        match self {
            Self::Maternal => "Risk Level:",
            Self::Fetal => "Fetal Health:",
        }
    }

    fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Maternal => &MATERNAL_FIELDS,
            Self::Fetal => &FETAL_FIELDS,
        }
    }
}

/// What to show under a prediction form.
#[derive(Debug)]
pub enum FormOutcome<'a> {
    Empty,
    Predicted { label: &'a str, severity: Severity },
    Failed(&'a EDoctorError),
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, active: NavItem, body: &str) -> String {
    let mut nav = String::new();
    for (item, href, label) in NAV {
        let class = if item == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, r#"<a href="{href}"{class}>{label}</a>"#);
    }
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - E-Doctor</title>
<link rel="stylesheet" href="/assets/index.css">
</head>
<body>
<aside>
<h1>E-Doctor System</h1>
<p>Welcome to the E-Doctor Multiple Disease Prediction System. Choose an option from the menu below to get started.</p>
<nav>{nav}</nav>
</aside>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

pub fn render_prediction_page(flow: FormFlow, form: &RawForm, outcome: &FormOutcome<'_>) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<form method="post" action="{}"><div class="fields">"#,
        flow.path()
    );
    for spec in flow.fields() {
        let value = form.get(spec.key).map(String::as_str).unwrap_or_default();
        let _ = write!(
            body,
            r#"<label>{label}<input type="text" inputmode="decimal" name="{key}" value="{value}"></label>"#,
            label = escape_html(spec.label),
            key = spec.key,
            value = escape_html(value),
        );
    }
    let _ = write!(
        body,
        r#"</div><div class="actions"><button type="submit">{}</button><a href="{}">Clear</a></div></form>"#,
        flow.button(),
        flow.path()
    );

    match outcome {
        FormOutcome::Empty => {}
        FormOutcome::Predicted { label, severity } => {
            let _ = write!(
                body,
                r#"<h3>{}</h3><p class="risk risk-{}">{}</p>"#,
                flow.result_heading(),
                severity.as_str(),
                escape_html(label)
            );
        }
        FormOutcome::Failed(err) => {
            let _ = write!(
                body,
                r#"<p class="error" role="alert">{}</p>"#,
                escape_html(&err.to_string())
            );
        }
    }

    layout(flow.title(), flow.nav(), &body)
}

pub fn render_dashboard_page(outcome: Result<&Dashboard, &EDoctorError>) -> String {
    let body = match outcome {
        Ok(dashboard) => {
            let mut body = String::new();
            let _ = write!(
                body,
                r#"<h2>{}</h2>{}<details><summary>Show More</summary><div class="explanation">{}</div></details>"#,
                escape_html(&dashboard.bubble.heading),
                render_bubble_chart(&dashboard.bubble.spec),
                render_markdown_html(&dashboard.bubble.explanation_markdown),
            );
            let _ = write!(
                body,
                r#"<h2>{}</h2>{}<details><summary>Show More</summary><div class="explanation">{}</div></details>"#,
                escape_html(&dashboard.pie.heading),
                render_pie_chart(&dashboard.pie.spec),
                render_markdown_html(&dashboard.pie.explanation_markdown),
            );
            body
        }
        Err(err) => {
            let message = if err.is_fetch_failure() {
                format!("Failed to fetch data. {err}")
            } else {
                format!("The dashboard cannot be rendered. {err}")
            };
            format!(
                r#"<p class="error" role="alert">{}</p>"#,
                escape_html(&message)
            )
        }
    };
    layout("Dashboard", NavItem::Dashboard, &body)
}
