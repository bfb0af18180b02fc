//! Display formatting for timestamps, names and status badges

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Badge colour classes used across tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Success,
    Warning,
    Error,
    Neutral,
}

pub fn status_variant(status: &str) -> BadgeVariant {
    match status.to_lowercase().as_str() {
        "active" => BadgeVariant::Success,
        "inactive" => BadgeVariant::Neutral,
        "error" => BadgeVariant::Error,
        "pending" => BadgeVariant::Warning,
        _ => BadgeVariant::Neutral,
    }
}

pub fn action_variant(action: &str) -> BadgeVariant {
    match action {
        "created" => BadgeVariant::Success,
        "deleted" => BadgeVariant::Error,
        _ => BadgeVariant::Neutral,
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// "Just now", "5 minutes ago", "1 day ago"; falls back to a calendar date past 30 days.
pub fn relative_time(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "Never".to_string();
    };

    let minutes = (now - at).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 30 {
        plural(days, "day")
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}

pub fn date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%b %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn date_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}

/// Console link to a client's detail page; the id is encoded as one path segment
pub fn client_path(id: &str) -> String {
    format!("/clients/{}", urlencoding::encode(id))
}

/// Split a CRM "full name" into (first, last).
/// First is the leading space-separated token, or the whole name when that token is empty.
pub fn split_full_name(name: &str) -> (String, String) {
    let mut parts = name.split(' ');
    let first = match parts.next() {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => name.to_string(),
    };
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// `annual_revenue` -> `Annual Revenue`
pub fn title_case_key(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}
