//! Email notifications for new submissions.
//!
//! Delivery is best-effort: the intake pipeline records the outcome but never
//! fails a submission over it. The Resend HTTP API is tried first when a key
//! is configured; SMTP via lettre is attempted when Resend fails or is not
//! configured.

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use leadgate_core::models::Submission;
use leadgate_core::{AppError, Config};
use std::sync::Arc;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Rendered notification email.
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub struct Notifier {
    enabled: bool,
    from: String,
    to: String,
    resend_api_key: Option<String>,
    resend_api_url: String,
    client: reqwest::Client,
    smtp: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
}

impl Notifier {
    pub fn from_config(config: &Config) -> Self {
        let smtp = config.smtp_host().and_then(|host| {
            let port = config.smtp_port().unwrap_or(587);
            let builder = if config.smtp_tls() {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            };
            let builder = builder.port(port);
            let builder = if let (Some(user), Some(password)) =
                (config.smtp_user(), config.smtp_password())
            {
                builder.credentials(Credentials::new(user.to_string(), password.to_string()))
            } else {
                builder
            };
            tracing::info!(host = %host, port, tls = config.smtp_tls(), "SMTP transport configured");
            Some(Arc::new(builder.build()))
        });

        Notifier {
            enabled: config.email_notifications_enabled(),
            from: config.email_from().to_string(),
            to: config.email_to().to_string(),
            resend_api_key: config.resend_api_key().map(|k| k.to_string()),
            resend_api_url: RESEND_API_URL.to_string(),
            client: reqwest::Client::new(),
            smtp,
        }
    }

    #[cfg(test)]
    fn with_providers(
        resend_api_url: Option<String>,
        smtp: Option<AsyncSmtpTransport<Tokio1Executor>>,
    ) -> Self {
        Notifier {
            enabled: true,
            from: "from@example.com".to_string(),
            to: "to@example.com".to_string(),
            resend_api_key: resend_api_url.as_ref().map(|_| "re_test_key".to_string()),
            resend_api_url: resend_api_url.unwrap_or_else(|| RESEND_API_URL.to_string()),
            client: reqwest::Client::new(),
            smtp: smtp.map(Arc::new),
        }
    }

    /// Send the new-submission notification. Returns `Ok(false)` when
    /// notifications are disabled, `Ok(true)` on delivery.
    pub async fn notify(&self, submission: &Submission) -> Result<bool, AppError> {
        if !self.enabled {
            tracing::debug!("Email notifications disabled");
            return Ok(false);
        }

        let content = build_email_content(submission);

        if self.resend_api_key.is_some() {
            match self.send_with_resend(&content).await {
                Ok(()) => {}
                Err(primary_error) if self.smtp.is_some() => {
                    tracing::warn!(
                        error = %primary_error,
                        "Resend delivery failed, falling back to SMTP"
                    );
                    self.send_with_smtp(&content).await?;
                }
                Err(primary_error) => return Err(primary_error),
            }
        } else if self.smtp.is_some() {
            self.send_with_smtp(&content).await?;
        } else {
            return Err(AppError::Config(
                "No email provider configured".to_string(),
            ));
        }
        Ok(true)
    }

    async fn send_with_resend(&self, content: &EmailContent) -> Result<(), AppError> {
        let api_key = self
            .resend_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Resend API key missing".to_string()))?;

        let response = self
            .client
            .post(&self.resend_api_url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": self.to,
                "subject": content.subject,
                "html": content.html,
                "text": content.text,
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: "Resend API error".to_string(),
            });
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        tracing::info!(
            message_id = body.get("id").and_then(|v| v.as_str()).unwrap_or(""),
            "Notification email sent via Resend"
        );
        Ok(())
    }

    async fn send_with_smtp(&self, content: &EmailContent) -> Result<(), AppError> {
        let mailer = self
            .smtp
            .as_ref()
            .ok_or_else(|| AppError::Config("SMTP transport missing".to_string()))?;

        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid EMAIL_FROM: {}", e)))?;
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid EMAIL_TO: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(&content.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(content.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(content.html.clone()),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        mailer
            .send(email)
            .await
            .map_err(|e| AppError::Internal(format!("SMTP send failed: {}", e)))?;
        tracing::info!("Notification email sent via SMTP");
        Ok(())
    }
}

fn push_field(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
}

fn html_field(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(&format!(
            "<div class=\"field\"><strong>{}:</strong> {}</div>",
            label,
            html_escape(value)
        ));
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render the notification subject, plain-text body, and HTML body.
pub fn build_email_content(submission: &Submission) -> EmailContent {
    let fields = &submission.fields;
    let name = fields.name.as_deref().unwrap_or("Unknown");
    let subject = format!("New Onboarding Form Submission - {}", name);

    let mut text = String::new();
    text.push_str(&subject);
    text.push('\n');
    text.push_str(&format!("Lead ID: {}\n\n", submission.id));

    text.push_str("CONTACT INFORMATION\n");
    push_field(&mut text, "Name", &fields.name);
    push_field(&mut text, "Email", &fields.email);
    push_field(&mut text, "Phone", &fields.phone);
    push_field(&mut text, "Brand/Business", &fields.brand_name);
    push_field(&mut text, "Industry", &fields.industry);

    if let Some(online) = &fields.online_presence {
        text.push_str("\nONLINE PRESENCE\n");
        text.push_str(online);
        text.push('\n');
    }

    text.push_str("\nPROJECT GOALS\n");
    push_field(&mut text, "Why Now", &fields.why_now);
    push_field(&mut text, "Success Metrics", &fields.success_metrics);
    if !fields.struggles.is_empty() {
        text.push_str(&format!("Main Struggles: {}\n", fields.struggles.join(", ")));
    }
    push_field(&mut text, "Other Struggle", &fields.other_struggle);

    if fields.brand_voice.is_some()
        || fields.brand_tone.is_some()
        || fields.avoidances.is_some()
        || fields.aesthetic_references.is_some()
    {
        text.push_str("\nBRAND VIBE\n");
        push_field(&mut text, "Brand Voice", &fields.brand_voice);
        push_field(&mut text, "Brand Tone", &fields.brand_tone);
        push_field(&mut text, "Avoidances", &fields.avoidances);
        push_field(&mut text, "Aesthetic References", &fields.aesthetic_references);
    }

    if fields.offering.is_some()
        || fields.value_provision.is_some()
        || fields.dream_audience.is_some()
        || fields.feedback.is_some()
    {
        text.push_str("\nBUSINESS DETAILS\n");
        push_field(&mut text, "Offering", &fields.offering);
        push_field(&mut text, "Value Provision", &fields.value_provision);
        push_field(&mut text, "Dream Audience", &fields.dream_audience);
        push_field(&mut text, "Feedback", &fields.feedback);
    }

    text.push_str("\nCOMMUNICATION\n");
    push_field(&mut text, "Preferred Method", &fields.communication);
    push_field(&mut text, "Additional Info", &fields.additional_info);

    if !fields.files.is_empty() {
        text.push_str("\nUPLOADED FILES\n");
        for file in &fields.files {
            text.push_str(&format!("{}: {}\n", file.file_name, file.url));
        }
    }

    text.push_str(&format!("\nSubmitted at {}\n", submission.timestamp));

    let mut body = String::new();
    body.push_str(&format!(
        "<h1>New Onboarding Form Submission</h1><p>Lead ID: {}</p>",
        submission.id
    ));
    body.push_str("<h3>Contact Information</h3>");
    html_field(&mut body, "Name", &fields.name);
    html_field(&mut body, "Email", &fields.email);
    html_field(&mut body, "Phone", &fields.phone);
    html_field(&mut body, "Brand/Business", &fields.brand_name);
    html_field(&mut body, "Industry", &fields.industry);
    if fields.online_presence.is_some() {
        body.push_str("<h3>Online Presence</h3>");
        html_field(&mut body, "Links", &fields.online_presence);
    }
    body.push_str("<h3>Project Goals</h3>");
    html_field(&mut body, "Why Now", &fields.why_now);
    html_field(&mut body, "Success Metrics", &fields.success_metrics);
    if !fields.struggles.is_empty() {
        body.push_str(&format!(
            "<div class=\"field\"><strong>Main Struggles:</strong> {}</div>",
            html_escape(&fields.struggles.join(", "))
        ));
    }
    html_field(&mut body, "Other Struggle", &fields.other_struggle);
    body.push_str("<h3>Communication</h3>");
    html_field(&mut body, "Preferred Method", &fields.communication);
    html_field(&mut body, "Additional Info", &fields.additional_info);
    if !fields.files.is_empty() {
        body.push_str("<h3>Uploaded Files</h3>");
        for file in &fields.files {
            body.push_str(&format!(
                "<div class=\"field\"><strong>{}</strong> <a href=\"{}\">View File</a></div>",
                html_escape(&file.file_name),
                file.url
            ));
        }
    }
    let html = format!("<!DOCTYPE html><html><body>{}</body></html>", body);

    EmailContent {
        subject,
        text,
        html,
    }
}
