//! CSV rendering for the admin export.
//!
//! Fixed column set covering every form field; `struggles` and `files` are
//! flattened to delimited strings. Quoting follows RFC 4180: any field holding
//! a comma, quote, or newline is wrapped in double quotes with internal quotes
//! doubled.

use leadgate_core::models::Submission;

pub const CSV_HEADERS: [&str; 24] = [
    "Submission ID",
    "Timestamp",
    "Name",
    "Email",
    "Phone",
    "Brand Name",
    "Industry",
    "Online Presence",
    "Why Now",
    "Success Metrics",
    "Struggles",
    "Other Struggle",
    "Brand Voice",
    "Brand Tone",
    "Avoidances",
    "Aesthetic References",
    "Offering",
    "Value Provision",
    "Dream Audience",
    "Feedback",
    "Communication Preference",
    "Additional Info",
    "Files Count",
    "File Names",
];

fn escape_field(field: &str) -> String {
    if field.contains('"') || field.contains(',') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn render_row(submission: &Submission) -> String {
    let fields = &submission.fields;
    let file_names = fields
        .files
        .iter()
        .map(|f| f.file_name.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let cells: [String; 24] = [
        submission.id.clone(),
        submission.timestamp.clone(),
        opt(&fields.name).to_string(),
        opt(&fields.email).to_string(),
        opt(&fields.phone).to_string(),
        opt(&fields.brand_name).to_string(),
        opt(&fields.industry).to_string(),
        opt(&fields.online_presence).to_string(),
        opt(&fields.why_now).to_string(),
        opt(&fields.success_metrics).to_string(),
        fields.struggles.join(", "),
        opt(&fields.other_struggle).to_string(),
        opt(&fields.brand_voice).to_string(),
        opt(&fields.brand_tone).to_string(),
        opt(&fields.avoidances).to_string(),
        opt(&fields.aesthetic_references).to_string(),
        opt(&fields.offering).to_string(),
        opt(&fields.value_provision).to_string(),
        opt(&fields.dream_audience).to_string(),
        opt(&fields.feedback).to_string(),
        opt(&fields.communication).to_string(),
        opt(&fields.additional_info).to_string(),
        fields.files.len().to_string(),
        file_names,
    ];

    cells
        .iter()
        .map(|cell| escape_field(cell))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the full export: header line plus one row per submission, in the
/// order given.
pub fn render_submissions_csv(submissions: &[Submission]) -> String {
    let mut lines = Vec::with_capacity(submissions.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for submission in submissions {
        lines.push(render_row(submission));
    }
    lines.join("\n")
}
