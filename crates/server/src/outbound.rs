use shared_types::AppError;

/// Syntax check for an outbound recipient address. Deliberately loose (the
/// authoritative check is the provider's) but it catches the typos that
/// would otherwise burn an API call: missing `@`, empty local part, domain
/// without a dot, embedded whitespace.
pub fn validate_recipient_syntax(email: &str) -> Result<(), AppError> {
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return Err(AppError::bad_request("Recipient address contains whitespace"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::bad_request("Recipient address is missing '@'"));
    };

    if local.is_empty() {
        return Err(AppError::bad_request("Recipient address has an empty local part"));
    }

    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(AppError::bad_request(format!(
            "Recipient domain '{}' is not valid",
            domain
        )));
    }

    if domain.contains('@') {
        return Err(AppError::bad_request("Recipient address contains multiple '@'"));
    }

    Ok(())
}

/// Extract the domain part of an already syntax-checked address.
pub fn recipient_domain(email: &str) -> &str {
    email.trim().rsplit('@').next().unwrap_or_default()
}

/// DNS resolvability check for the recipient's mail domain. A domain that
/// resolves to no address at all cannot receive mail, so the send is
/// rejected before the provider is called.
pub async fn ensure_domain_resolves(domain: &str) -> Result<(), AppError> {
    let lookup = format!("{}:25", domain);
    let resolves = match tokio::net::lookup_host(lookup).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    };
    if resolves {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "Recipient domain '{}' does not resolve",
            domain
        )))
    }
}

/// Full pre-send recipient check: syntax, then DNS.
pub async fn validate_recipient(email: &str) -> Result<(), AppError> {
    validate_recipient_syntax(email)?;
    ensure_domain_resolves(recipient_domain(email)).await
}
