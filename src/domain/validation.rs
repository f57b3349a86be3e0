//! Explicit input validation.
//!
//! Every function either returns the normalized value or an
//! `AppError::Validation` carrying a message fit for the client.

use validator::ValidateEmail;

use crate::config::{
    MAX_EMAIL_LENGTH, MAX_INVITE_EMAILS, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MAX_PHONE_LENGTH,
    MAX_PROJECT_DESCRIPTION_LENGTH, MAX_PROJECT_NAME_LENGTH, MAX_TECH_STACK_ENTRIES,
    MAX_TECH_STACK_ENTRY_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Trim, lowercase and syntax-check an email address.
pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH || !email.validate_email() {
        return Err(AppError::validation(format!("Invalid email format: {}", raw.trim())));
    }
    Ok(email)
}

/// Password must be present and bounded; no composition rules.
pub fn validate_password(plain_text: &str) -> AppResult<()> {
    if plain_text.is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    if plain_text.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Resolve the display name, falling back to the local part of the email.
pub fn display_name(name: Option<&str>, email: &str) -> AppResult<String> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if !name.is_empty() {
        return Ok(name.to_string());
    }
    Ok(email.split('@').next().unwrap_or(email).to_string())
}

pub fn phone(phone: Option<&str>) -> AppResult<Option<String>> {
    match phone.map(str::trim) {
        None | Some("") => Ok(None),
        Some(p) if p.chars().count() > MAX_PHONE_LENGTH => Err(AppError::validation(format!(
            "Phone must be at most {} characters",
            MAX_PHONE_LENGTH
        ))),
        Some(p) => Ok(Some(p.to_string())),
    }
}

pub fn project_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Project name is required"));
    }
    if name.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Project name must be at most {} characters",
            MAX_PROJECT_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

pub fn project_description(description: &str) -> AppResult<String> {
    let description = description.trim();
    if description.chars().count() > MAX_PROJECT_DESCRIPTION_LENGTH {
        return Err(AppError::validation(format!(
            "Description must be at most {} characters",
            MAX_PROJECT_DESCRIPTION_LENGTH
        )));
    }
    Ok(description.to_string())
}

/// Trim entries, drop blanks and duplicates while keeping the given order.
pub fn tech_stack(entries: Vec<String>) -> AppResult<Vec<String>> {
    let mut stack: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() || stack.iter().any(|e| e == entry) {
            continue;
        }
        if entry.chars().count() > MAX_TECH_STACK_ENTRY_LENGTH {
            return Err(AppError::validation(format!(
                "Tech stack entries must be at most {} characters",
                MAX_TECH_STACK_ENTRY_LENGTH
            )));
        }
        stack.push(entry.to_string());
    }
    if stack.len() > MAX_TECH_STACK_ENTRIES {
        return Err(AppError::validation(format!(
            "At most {} tech stack entries are allowed",
            MAX_TECH_STACK_ENTRIES
        )));
    }
    Ok(stack)
}

/// Normalize invitation emails, deduplicated in request order.
pub fn invite_emails(emails: Vec<String>) -> AppResult<Vec<String>> {
    if emails.is_empty() {
        return Err(AppError::validation("At least one email is required"));
    }
    if emails.len() > MAX_INVITE_EMAILS {
        return Err(AppError::validation(format!(
            "At most {} emails can be invited at once",
            MAX_INVITE_EMAILS
        )));
    }

    let mut normalized: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails {
        let email = normalize_email(&email)?;
        if !normalized.contains(&email) {
            normalized.push(email);
        }
    }
    Ok(normalized)
}
