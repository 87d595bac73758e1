//! Mapping between leads and spreadsheet rows.
//!
//! Columns A..P: timestamp, email, name, sourcePath, locale, consent,
//! consentTimestamp, ipHash, userAgent, leadMagnet, referrer, utm_source,
//! utm_medium, utm_campaign, utm_content, utm_term.
use crate::lead::{
    Attribution, Lead, MAX_ATTRIBUTION_LEN, MAX_EMAIL_LEN, MAX_LEAD_MAGNET_LEN, MAX_LOCALE_LEN,
    MAX_NAME_LEN, MAX_REFERRER_LEN, MAX_SOURCE_PATH_LEN, MAX_USER_AGENT_LEN,
};
use crate::sanitize::safe_sheet_str;

pub const LAST_COLUMN: char = 'P';
pub const EMAIL_COLUMN: char = 'B';

const MAX_TIMESTAMP_LEN: usize = 40;
const MAX_IP_HASH_LEN: usize = 64;

/// Builds the row to append. Every cell is truncated and formula-escaped
/// again here, whatever the caller already did.
pub fn to_row(lead: &Lead) -> Vec<String> {
    let opt = |v: &Option<String>, max| safe_sheet_str(v.as_deref().unwrap_or_default(), max);
    let utm = &lead.attribution;

    vec![
        safe_sheet_str(&lead.timestamp, MAX_TIMESTAMP_LEN),
        safe_sheet_str(&lead.email, MAX_EMAIL_LEN),
        opt(&lead.name, MAX_NAME_LEN),
        safe_sheet_str(&lead.source_path, MAX_SOURCE_PATH_LEN),
        safe_sheet_str(&lead.locale, MAX_LOCALE_LEN),
        if lead.consent { "TRUE" } else { "FALSE" }.to_string(),
        opt(&lead.consent_timestamp, MAX_TIMESTAMP_LEN),
        opt(&lead.ip_hash, MAX_IP_HASH_LEN),
        opt(&lead.user_agent, MAX_USER_AGENT_LEN),
        safe_sheet_str(&lead.lead_magnet, MAX_LEAD_MAGNET_LEN),
        opt(&lead.referrer, MAX_REFERRER_LEN),
        opt(&utm.utm_source, MAX_ATTRIBUTION_LEN),
        opt(&utm.utm_medium, MAX_ATTRIBUTION_LEN),
        opt(&utm.utm_campaign, MAX_ATTRIBUTION_LEN),
        opt(&utm.utm_content, MAX_ATTRIBUTION_LEN),
        opt(&utm.utm_term, MAX_ATTRIBUTION_LEN),
    ]
}

pub fn from_row(row: &[String]) -> Lead {
    let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
    let opt = |i: usize| row.get(i).filter(|v| !v.is_empty()).cloned();

    let locale = cell(4);
    Lead {
        timestamp: cell(0),
        email: cell(1),
        name: opt(2),
        source_path: cell(3),
        locale: if locale.is_empty() { "en".into() } else { locale },
        consent: cell(5).eq_ignore_ascii_case("TRUE"),
        consent_timestamp: opt(6),
        ip_hash: opt(7),
        user_agent: opt(8),
        lead_magnet: cell(9),
        referrer: opt(10),
        attribution: Attribution {
            utm_source: opt(11),
            utm_medium: opt(12),
            utm_campaign: opt(13),
            utm_content: opt(14),
            utm_term: opt(15),
        },
    }
}

/// Drops a leading header row (first cell `timestamp`).
pub fn data_rows(rows: &[Vec<String>]) -> &[Vec<String>] {
    match rows.first() {
        Some(first) if first.first().is_some_and(|c| c == "timestamp") => &rows[1..],
        _ => rows,
    }
}
