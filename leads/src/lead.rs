use crate::sanitize::{hash_ip, is_valid_email, normalize_email, safe_str};
use serde::{Deserialize, Serialize};

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_LOCALE_LEN: usize = 10;
pub const MAX_SOURCE_PATH_LEN: usize = 200;
pub const MAX_LEAD_MAGNET_LEN: usize = 100;
pub const MAX_USER_AGENT_LEN: usize = 200;
pub const MAX_REFERRER_LEN: usize = 500;
pub const MAX_ATTRIBUTION_LEN: usize = 100;

const DEFAULT_LOCALE: &str = "en";

/// Campaign attribution captured with a lead. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
}

impl Attribution {
    fn capped(self) -> Self {
        let cap = |v: Option<String>| {
            v.map(|s| safe_str(&s, MAX_ATTRIBUTION_LEN))
                .filter(|s| !s.is_empty())
        };
        Attribution {
            utm_source: cap(self.utm_source),
            utm_medium: cap(self.utm_medium),
            utm_campaign: cap(self.utm_campaign),
            utm_content: cap(self.utm_content),
            utm_term: cap(self.utm_term),
        }
    }
}

/// A captured contact-form submission. Written once, never updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub source_path: String,
    #[serde(default)]
    pub lead_magnet: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub consent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(flatten)]
    pub attribution: Attribution,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidLead {
    #[error("a valid email address is required")]
    InvalidEmail,
}

/// Untrusted form fields as submitted by the browser.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "language")]
    pub locale: Option<String>,
    #[serde(default)]
    pub source_path: Option<String>,
    #[serde(default)]
    pub lead_magnet: Option<String>,
    #[serde(default)]
    pub consent: bool,
    #[serde(flatten)]
    pub attribution: Attribution,
}

/// Request metadata that accompanies a submission.
#[derive(Clone, Debug, Default)]
pub struct SubmissionContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl LeadInput {
    /// Sanitises the submission into a storable lead stamped with `now`
    /// (RFC 3339). The raw IP is reduced to its hash.
    pub fn into_lead(self, context: &SubmissionContext, now: &str) -> Result<Lead, InvalidLead> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(InvalidLead::InvalidEmail);
        }

        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        let locale = self
            .locale
            .map(|l| safe_str(&l, MAX_LOCALE_LEN))
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Ok(Lead {
            email,
            name: self
                .name
                .map(|n| safe_str(&n, MAX_NAME_LEN))
                .and_then(non_empty),
            locale,
            source_path: safe_str(
                self.source_path.as_deref().unwrap_or_default(),
                MAX_SOURCE_PATH_LEN,
            ),
            lead_magnet: safe_str(
                self.lead_magnet.as_deref().unwrap_or_default(),
                MAX_LEAD_MAGNET_LEN,
            ),
            timestamp: now.to_string(),
            consent: self.consent,
            consent_timestamp: self.consent.then(|| now.to_string()),
            ip_hash: context.ip.as_deref().map(hash_ip),
            user_agent: context
                .user_agent
                .as_deref()
                .map(|ua| safe_str(ua, MAX_USER_AGENT_LEN))
                .and_then(non_empty),
            referrer: context
                .referrer
                .as_deref()
                .map(|r| safe_str(r, MAX_REFERRER_LEN))
                .and_then(non_empty),
            attribution: self.attribution.capped(),
        })
    }
}
