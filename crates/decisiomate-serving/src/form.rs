//! HTML rendering of the prediction form.
//!
//! The page is a single form with one text box per model input, a disabled
//! result box and a Predict button. After a successful prediction the boxes
//! show the coerced values; after a failure they show the text as typed.

use crate::config::PageConfig;
use decisiomate_model::{FeatureVector, FEATURES};
use std::collections::HashMap;
use std::fmt::Write;

/// Form field name of the Predict button.
pub const PREDICT_BUTTON: &str = "predict_button";

/// Form field name of the disabled result box.
pub const RESULT_FIELD: &str = "predicted_price_range";

/// Everything needed to render one form page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
    /// Raw text per feature name
    pub values: HashMap<String, String>,
    /// Sentence for the result box
    pub prediction: Option<String>,
    /// Error banner text
    pub error: Option<String>,
}

impl FormView {
    /// The form as first shown, filled with the sample phone.
    pub fn sample() -> Self {
        Self::with_values(FeatureVector::sample().to_text_map())
    }

    /// A form echoing submitted values.
    ///
    /// Keys that are not model inputs are dropped. Inputs absent from the
    /// submission render as empty boxes.
    pub fn with_values(submitted: HashMap<String, String>) -> Self {
        let values = submitted
            .into_iter()
            .filter(|(name, _)| FEATURES.iter().any(|spec| spec.name == name))
            .collect();
        Self {
            values,
            prediction: None,
            error: None,
        }
    }

    /// Sets the result sentence.
    pub fn with_prediction(mut self, message: impl Into<String>) -> Self {
        self.prediction = Some(message.into());
        self
    }

    /// Sets the error banner.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Current text of a feature box.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f4f4f6}\
header{background:#1f2937;color:#fff;padding:16px 24px;display:flex;justify-content:space-between;align-items:center}\
.persona{text-align:right}.persona span{display:block;font-size:.8em;opacity:.8}\
header h1{margin:0;font-size:1.6em}header p{margin:4px 0 0;opacity:.8}\
main{max-width:720px;margin:24px auto;background:#fff;padding:24px;border-radius:6px}\
label{display:block;margin-top:10px;font-size:.9em;color:#374151}\
input{width:100%;padding:6px;box-sizing:border-box}\
input[disabled]{background:#eef2ff;font-weight:bold}\
.error{background:#fee2e2;color:#991b1b;padding:10px;border-radius:4px}\
button{margin-top:16px;padding:8px 20px;background:#2563eb;color:#fff;border:0;border-radius:4px}\
footer{text-align:center;padding:16px;color:#6b7280}";

/// Renders the whole page.
pub fn render_page(page: &PageConfig, view: &FormView) -> String {
    let title = escape_html(&page.title);
    let mut html = String::with_capacity(8 * 1024);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><div class=\"brand\"><h1>{title}</h1><p>{}</p></div>",
        escape_html(&page.subtitle)
    );
    if !page.persona_name.is_empty() {
        let _ = write!(
            html,
            "<div class=\"persona\"><strong>{}</strong><span>{}</span></div>",
            escape_html(&page.persona_name),
            escape_html(&page.persona_role)
        );
    }
    html.push_str("</header>\n<main>\n");

    if let Some(error) = &view.error {
        let _ = writeln!(
            html,
            "<div class=\"error\" role=\"alert\">{}</div>",
            escape_html(error)
        );
    }

    html.push_str("<form method=\"post\" action=\"/\">\n");
    for spec in FEATURES.iter() {
        let _ = writeln!(
            html,
            "<label for=\"{name}\">{label}</label>\
             <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">",
            name = spec.name,
            label = escape_html(spec.label),
            value = escape_html(view.value(spec.name)),
        );
    }
    let _ = writeln!(
        html,
        "<label for=\"{RESULT_FIELD}\">Predicted Price Decision</label>\
         <input type=\"text\" id=\"{RESULT_FIELD}\" name=\"{RESULT_FIELD}\" value=\"{}\" disabled>",
        escape_html(view.prediction.as_deref().unwrap_or(""))
    );
    let _ = writeln!(
        html,
        "<button type=\"submit\" name=\"{PREDICT_BUTTON}\" value=\"true\">Predict</button>"
    );
    html.push_str("</form>\n</main>\n");

    let _ = write!(html, "<footer><p>{}</p><nav>", escape_html(&page.footer_caption));
    for link in &page.footer_links {
        let _ = write!(
            html,
            " <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            escape_html(&link.url),
            escape_html(&link.label)
        );
    }
    html.push_str("</nav></footer>\n</body>\n</html>\n");
    html
}
