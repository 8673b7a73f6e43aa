// src/view.rs
//! Pure rendering of a controller into the page and its JSON snapshot.

use serde::Serialize;
use std::fmt::Write;

use crate::controller::PredictionController;
use crate::models::{ApiStatus, FeatureOptions, Field, FormState, PredictionResult};
use crate::validation::{Violation, numeric_bounds};

pub const SERVER_DOWN_MESSAGE: &str =
    "The API server is not running. Please start the prediction backend server.";
pub const MODEL_MISSING_MESSAGE: &str =
    "The model is not loaded. Please train the model in the backend before predicting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    ServerDown,
    ModelMissing,
}

impl Banner {
    pub fn for_status(status: ApiStatus) -> Option<Self> {
        if !status.running {
            Some(Banner::ServerDown)
        } else if !status.model_loaded {
            Some(Banner::ModelMissing)
        } else {
            None
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Banner::ServerDown => SERVER_DOWN_MESSAGE,
            Banner::ModelMissing => MODEL_MISSING_MESSAGE,
        }
    }

    fn variant(self) -> &'static str {
        match self {
            Banner::ServerDown => "danger",
            Banner::ModelMissing => "warning",
        }
    }
}

pub fn result_headline(result: &PredictionResult) -> &'static str {
    if result.is_positive() {
        "Diabetes Detected"
    } else {
        "No Diabetes Detected"
    }
}

pub fn submit_label(controller: &PredictionController) -> &'static str {
    if controller.is_submitting() {
        "Predicting..."
    } else {
        "Predict"
    }
}

/// Machine-readable view of a page.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: &'static str,
    pub form: &'a FormState,
    pub options: &'a FeatureOptions,
    pub api_status: ApiStatus,
    pub submit_disabled: bool,
    pub result: Option<&'a PredictionResult>,
    pub error: Option<&'a str>,
    pub probability_percent: Option<String>,
}

pub fn snapshot(controller: &PredictionController) -> Snapshot<'_> {
    let result = controller.result();
    Snapshot {
        phase: controller.phase().name(),
        form: controller.form(),
        options: controller.options(),
        api_status: controller.api_status(),
        submit_disabled: controller.submit_disabled(),
        result,
        error: controller.error(),
        probability_percent: result.map(PredictionResult::probability_percent),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the whole page. `violations` are listed above the form when a
/// submission was just blocked.
pub fn render_page(controller: &PredictionController, violations: &[Violation]) -> String {
    let mut body = String::new();

    if let Some(banner) = Banner::for_status(controller.api_status()) {
        let _ = write!(
            body,
            r#"<div class="alert alert-{}" role="alert">{}</div>"#,
            banner.variant(),
            banner.message()
        );
    }

    if !violations.is_empty() {
        body.push_str(r#"<div class="alert alert-warning" role="alert"><ul class="violations">"#);
        for violation in violations {
            let _ = write!(body, "<li>{}</li>", escape_html(&violation.to_string()));
        }
        body.push_str("</ul></div>");
    }

    body.push_str(&render_form(controller));

    if let Some(message) = controller.error() {
        let _ = write!(
            body,
            r#"<div class="alert alert-danger mt-4" role="alert" id="prediction-error">{}</div>"#,
            escape_html(message)
        );
    }

    if let Some(result) = controller.result() {
        body.push_str(&render_result(result));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Diabetes Prediction App</title>
<link rel="stylesheet" href="/static/app.css">
</head>
<body>
<main class="prediction-section" id="prediction">
<div class="card prediction-card">
<div class="card-header"><h2>Diabetes Prediction</h2></div>
<div class="card-body">
{}
</div>
</div>
</main>
</body>
</html>
"#,
        body
    )
}

fn render_form(controller: &PredictionController) -> String {
    let form = controller.form();
    let options = controller.options();
    let mut html = String::from(r#"<form method="post" action="/form/submit" id="prediction-form">"#);

    for field in Field::ALL {
        let _ = write!(
            html,
            r#"<div class="form-group"><label for="{name}">{label}</label>"#,
            name = field.name(),
            label = field.label()
        );
        let value = form.get(field);
        match field {
            Field::Gender => html.push_str(&render_select(field, &options.gender_options, value)),
            Field::SmokingHistory => {
                html.push_str(&render_select(field, &options.smoking_history_options, value))
            }
            Field::Hypertension | Field::HeartDisease => {
                html.push_str(&render_yes_no(field, value))
            }
            _ => html.push_str(&render_number(field, value)),
        }
        html.push_str("</div>");
    }

    let _ = write!(
        html,
        r#"<div class="actions"><button type="submit" formaction="/form/reset" formnovalidate class="btn btn-secondary">Reset</button><button type="submit" class="btn btn-primary" id="predict-button"{}>{}</button></div></form>"#,
        if controller.submit_disabled() { " disabled" } else { "" },
        submit_label(controller)
    );
    html
}

fn render_select(field: Field, choices: &[String], current: &str) -> String {
    let mut html = format!(r#"<select id="{0}" name="{0}" required>"#, field.name());
    for choice in choices {
        let escaped = escape_html(choice);
        let _ = write!(
            html,
            r#"<option value="{escaped}"{}>{escaped}</option>"#,
            if choice == current { " selected" } else { "" }
        );
    }
    html.push_str("</select>");
    html
}

fn render_yes_no(field: Field, current: &str) -> String {
    let mut html = format!(r#"<select id="{0}" name="{0}" required>"#, field.name());
    for (value, label) in [("0", "No"), ("1", "Yes")] {
        let _ = write!(
            html,
            r#"<option value="{value}"{}>{label}</option>"#,
            if value == current { " selected" } else { "" }
        );
    }
    html.push_str("</select>");
    html
}

fn render_number(field: Field, current: &str) -> String {
    let mut html = format!(
        r#"<input type="number" id="{0}" name="{0}" value="{1}" placeholder="Enter {2}" required"#,
        field.name(),
        escape_html(current),
        field.label()
    );
    if let Some(bounds) = numeric_bounds(field) {
        let _ = write!(
            html,
            r#" min="{}" max="{}" step="{}""#,
            bounds.min,
            bounds.max,
            bounds.step_attr()
        );
    }
    html.push('>');
    html
}

fn render_result(result: &PredictionResult) -> String {
    let tone = if result.is_positive() { "danger" } else { "success" };
    format!(
        r#"<div class="card mt-4 border-{tone}" id="prediction-result"><div class="card-header bg-{tone}"><h5>Prediction Result</h5></div><div class="card-body"><h4>{}</h4><p><strong>Probability of Diabetes:</strong> {}</p></div></div>"#,
        result_headline(result),
        result.probability_percent()
    )
}
