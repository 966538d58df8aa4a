use sqlx::{Pool, Postgres};
use tracing;

// --- Environment helpers ---

fn mailgun_api_key() -> Result<String, String> {
    std::env::var("MAILGUN_API_KEY").map_err(|_| "MAILGUN_API_KEY is not configured".to_string())
}

fn mailgun_domain() -> Result<String, String> {
    std::env::var("MAILGUN_DOMAIN").map_err(|_| "MAILGUN_DOMAIN is not configured".to_string())
}

fn mailgun_from() -> Result<String, String> {
    match std::env::var("MAILGUN_FROM") {
        Ok(v) => Ok(v),
        Err(_) => Ok(format!("{} <noreply@{}>", app_name(), mailgun_domain()?)),
    }
}

fn app_base_url() -> String {
    std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn app_name() -> String {
    std::env::var("APP_NAME").unwrap_or_else(|_| "Accordia".to_string())
}

// --- Core email sending ---

#[tracing::instrument(skip(html_body))]
pub async fn send_email(to: &str, subject: &str, html_body: &str) -> Result<(), String> {
    let domain = mailgun_domain()?;
    let url = format!("https://api.mailgun.net/v3/{}/messages", domain);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .basic_auth("api", Some(mailgun_api_key()?))
        .form(&[
            ("from", mailgun_from()?),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("html", html_body.to_string()),
        ])
        .send()
        .await
        .map_err(|e| format!("Mailgun request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Mailgun API error ({}): {}", status, body));
    }

    tracing::info!(to = to, subject = subject, "Email sent successfully");
    Ok(())
}

// --- Higher-level helpers ---

/// Send a magic sign-in link. Failures are logged, not surfaced, so the
/// request-link endpoint never reveals whether an address is deliverable.
pub async fn send_login_link_email(to: &str, token: &str) {
    let html = templates::login_link_html(token, &app_base_url(), &app_name());
    if let Err(e) = send_email(to, &format!("Sign in to {}", app_name()), &html).await {
        tracing::error!(error = %e, to = to, "Failed to send sign-in link");
    }
}

/// Send a rendered invoice to its billing contact. Unlike the sign-in link
/// this failure IS surfaced: the caller leaves the invoice status untouched
/// when the provider rejects the message.
pub async fn send_invoice_email(
    to: &str,
    case_number: &str,
    matter: &str,
    hours: f64,
    rate: f64,
    due_text: Option<&str>,
) -> Result<(), String> {
    let html = templates::invoice_html(case_number, matter, hours, rate, due_text, &app_name());
    let subject = format!("Invoice for case {}", case_number);
    send_email(to, &subject, &html).await
}

// --- Webhook verification ---

pub fn verify_webhook_signature(
    signing_key: &str,
    timestamp: &str,
    token: &str,
    signature: &str,
) -> bool {
    use hmac::{Hmac, Mac};
    type HmacSha256 = Hmac<sha2::Sha256>;

    let Ok(mut mac) = HmacSha256::new_from_slice(signing_key.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(token.as_bytes());

    let expected = hex::encode(mac.finalize().into_bytes());
    expected == signature
}

/// Reconcile a bounce event from the provider with local account state.
pub async fn handle_bounce_event(pool: &Pool<Postgres>, recipient: &str) {
    if let Err(e) = crate::repo::user::set_email_bounced(pool, recipient).await {
        tracing::error!(error = %e, email = recipient, "Failed to mark email as bounced");
    }
}


// --- Email templates ---

mod templates {
    pub fn login_link_html(token: &str, base_url: &str, app_name: &str) -> String {
        let link = format!("{}/api/auth/verify?token={}", base_url, token);
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: Georgia, serif; background: #f7f6f2; color: #2b2b2b; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto; border: 1px solid #d8d4c8; background: #ffffff; padding: 30px;">
    <h1 style="color: #3d5a4c; text-align: center;">Sign in to {app_name}</h1>
    <p>Click the link below to sign in. No password needed.</p>
    <p style="text-align: center;">
      <a href="{link}" style="display: inline-block; background: #3d5a4c; color: #ffffff; padding: 12px 24px; text-decoration: none; font-weight: bold;">Sign In</a>
    </p>
    <p style="color: #888; font-size: 12px;">This link can be used once and expires in 15 minutes. If you didn't request it, ignore this email.</p>
  </div>
</body>
</html>"#,
            link = link,
            app_name = app_name
        )
    }

    pub fn invoice_html(
        case_number: &str,
        matter: &str,
        hours: f64,
        rate: f64,
        due_text: Option<&str>,
        app_name: &str,
    ) -> String {
        let total = format!("${:.2}", hours * rate);
        let due_row = match due_text {
            Some(due) => format!(
                r#"<tr><td style="padding: 8px; border-bottom: 1px solid #e4e1d6;">Due</td><td style="padding: 8px; border-bottom: 1px solid #e4e1d6; text-align: right;">{}</td></tr>"#,
                due
            ),
            None => String::new(),
        };
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: Georgia, serif; background: #f7f6f2; color: #2b2b2b; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto; border: 1px solid #d8d4c8; background: #ffffff; padding: 30px;">
    <h1 style="color: #3d5a4c; text-align: center;">Invoice</h1>
    <p>Case {case_number} — {matter}</p>
    <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
      <tr><td style="padding: 8px; border-bottom: 1px solid #e4e1d6;">Hours</td><td style="padding: 8px; border-bottom: 1px solid #e4e1d6; text-align: right;">{hours:.2}</td></tr>
      <tr><td style="padding: 8px; border-bottom: 1px solid #e4e1d6;">Rate</td><td style="padding: 8px; border-bottom: 1px solid #e4e1d6; text-align: right;">${rate:.2}</td></tr>
      <tr><td style="padding: 8px; border-bottom: 1px solid #e4e1d6;">Total</td><td style="padding: 8px; border-bottom: 1px solid #e4e1d6; text-align: right; font-weight: bold;">{total}</td></tr>
      {due_row}
    </table>
    <p style="color: #888;">— {app_name}</p>
  </div>
</body>
</html>"#,
            case_number = case_number,
            matter = matter,
            hours = hours,
            rate = rate,
            total = total,
            due_row = due_row,
            app_name = app_name
        )
    }
}
