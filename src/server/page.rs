//! HTML for the single-page form

use crate::error::FraudError;
use crate::types::transaction::{TransactionForm, TransactionType};
use crate::types::verdict::Verdict;
use std::fmt::Write;

const STYLE: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    background: linear-gradient(to right, #141e30, #243b55);
    color: white;
    font-family: 'Segoe UI', sans-serif;
}
main { max-width: 760px; margin: 0 auto; padding: 2rem 1rem; }
h3 { color: #00d8ff; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem 2rem; }
label { display: block; font-size: 0.9rem; margin-bottom: 0.3rem; }
input, select {
    width: 100%;
    box-sizing: border-box;
    background-color: #1e2a38;
    color: white;
    border: 1px solid #34495e;
    border-radius: 5px;
    padding: 0.5rem;
    font-weight: 500;
}
button {
    margin-top: 1.5rem;
    background-color: #ff4b5c;
    color: white;
    font-weight: bold;
    border: none;
    border-radius: 8px;
    padding: 0.6rem 1.2rem;
    font-size: 1rem;
    cursor: pointer;
}
.verdict { padding: 20px; border-radius: 10px; }
.verdict p { font-size: 18px; }
.fraud { background-color: #FF4B4B; }
.legitimate { background-color: #2ECC71; }
.problem { background-color: #8e44ad; }
details { margin-top: 2rem; }
"#;

const FINDINGS: &str = r#"
<h3>Project Summary and Insights</h3>
<details>
<summary>Findings, risks &amp; improvements</summary>
<p><strong>Key findings</strong></p>
<ul>
<li>The model achieves ~99.97% accuracy and AUC 0.9997 on held-out data.</li>
<li>High recall (0.98): fraudulent activity is rarely missed.</li>
</ul>
<p><strong>Risks</strong></p>
<ul>
<li>May produce false positives and occasionally flag legitimate users.</li>
<li>Sensitive to class imbalance; fraud examples were rare in training data.</li>
</ul>
<p><strong>Possible improvements</strong></p>
<ul>
<li>Stream transactions from a live feed instead of a manual form.</li>
<li>Explain individual verdicts (SHAP, LIME).</li>
<li>Tune the decision threshold to reduce false alarms.</li>
<li>Add behavioral, geographic and device features.</li>
</ul>
</details>
"#;

/// Minimal escaping for text and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn number_input(html: &mut String, name: &str, label: &str, value: &str) {
    let value = if value.is_empty() { "0.00" } else { value };
    let _ = write!(
        html,
        r#"<div><label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="0" step="any" value="{value}" required></div>"#,
        value = escape_html(value),
    );
}

fn type_select(html: &mut String, selected: &str) {
    html.push_str(r#"<div><label for="transaction_type">Transaction Type</label><select id="transaction_type" name="transaction_type">"#);
    for transaction_type in TransactionType::ALL {
        let name = transaction_type.as_str();
        let marker = if name == selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{name}"{marker}>{name}</option>"#);
    }
    html.push_str("</select></div>");
}

fn verdict_panel(html: &mut String, verdict: &Verdict) {
    let class = if verdict.is_fraud() { "fraud" } else { "legitimate" };
    let _ = write!(
        html,
        r#"<hr><h2>Prediction Result</h2><div class="verdict {class}" data-assessment="{id}"><h2>{headline}</h2><p>{summary}<br><strong>Confidence:</strong> {confidence}</p></div>"#,
        id = verdict.assessment_id,
        headline = verdict.headline(),
        summary = verdict.summary(),
        confidence = verdict.confidence_label(),
    );
}

fn error_panel(html: &mut String, error: &FraudError) {
    let heading = if error.is_user_error() {
        "Please check the transaction details"
    } else {
        "Prediction unavailable"
    };
    let _ = write!(
        html,
        r#"<hr><div class="verdict problem"><h2>{heading}</h2><p>{message}</p></div>"#,
        message = escape_html(&error.to_string()),
    );
}

/// Render the whole page, echoing the submitted values back into the form.
pub fn render(form: &TransactionForm, outcome: Option<&Result<Verdict, FraudError>>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>Fraud Detection Dashboard</title><style>{STYLE}</style></head><body><main>"#
    );
    html.push_str("<h1>Real-Time Fraud Detection</h1><h3>Enter Transaction Details Below</h3>");

    html.push_str(r#"<form method="post" action="/predict"><div class="columns">"#);
    number_input(&mut html, "amount", "Amount", &form.amount);
    number_input(&mut html, "sender_new_balance", "Sender New Balance", &form.sender_new_balance);
    number_input(&mut html, "sender_old_balance", "Sender Old Balance", &form.sender_old_balance);
    number_input(&mut html, "receiver_new_balance", "Receiver New Balance", &form.receiver_new_balance);
    number_input(&mut html, "receiver_old_balance", "Receiver Old Balance", &form.receiver_old_balance);
    type_select(&mut html, form.transaction_type.trim());
    html.push_str(r#"</div><button type="submit">Predict Transaction</button></form>"#);

    match outcome {
        Some(Ok(verdict)) => verdict_panel(&mut html, verdict),
        Some(Err(error)) => error_panel(&mut html, error),
        None => {}
    }

    html.push_str(FINDINGS);
    html.push_str("</main></body></html>");
    html
}
