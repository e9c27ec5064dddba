//! Record of deals emailed to users

use crate::error::{DealError, DealResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use savemate_core::store::{KeyValueStore, KeyValueStoreExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Store key holding the sent-email entries
pub const SENT_EMAILS_KEY: &str = "sent_emails";

// Non-empty local part, dotted domain, no whitespace or second '@'
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid regex")
});

/// One deal sent to one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    /// Deal that was sent
    pub deal_id: String,
    /// Lowercased recipient address
    pub email: String,
    /// When it was sent
    pub sent_at: DateTime<Utc>,
}

/// Which deals went to which addresses
pub struct SentEmailLog<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SentEmailLog<'a> {
    /// Log persisted in `store`
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> DealResult<Vec<SentEmail>> {
        Ok(self.store.get_json(SENT_EMAILS_KEY)?.unwrap_or_default())
    }

    /// Record that `deal_id` was sent to `email` now
    pub fn record(&self, deal_id: &str, email: &str) -> DealResult<SentEmail> {
        self.record_at(deal_id, email, Utc::now())
    }

    /// Record a send at an explicit time
    pub fn record_at(&self, deal_id: &str, email: &str, sent_at: DateTime<Utc>) -> DealResult<SentEmail> {
        let entry = SentEmail {
            deal_id: deal_id.to_string(),
            email: normalize_email(email)?,
            sent_at,
        };

        let mut entries = self.entries()?;
        entries.push(entry.clone());
        self.store.set_json(SENT_EMAILS_KEY, &entries)?;

        debug!(deal_id, total = entries.len(), "Recorded sent email");
        Ok(entry)
    }

    /// Whether `deal_id` was already sent to `email`
    pub fn was_sent(&self, deal_id: &str, email: &str) -> DealResult<bool> {
        let email = normalize_email(email)?;
        Ok(self
            .entries()?
            .iter()
            .any(|e| e.deal_id == deal_id && e.email == email))
    }

    /// Entries for one deal, oldest first
    pub fn for_deal(&self, deal_id: &str) -> DealResult<Vec<SentEmail>> {
        let mut entries = self.entries()?;
        entries.retain(|e| e.deal_id == deal_id);
        Ok(entries)
    }
}

fn normalize_email(email: &str) -> DealResult<String> {
    let email = email.trim().to_lowercase();
    if EMAIL_PATTERN.is_match(&email) {
        Ok(email)
    } else {
        Err(DealError::InvalidEmail(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use savemate_core::store::MemoryStore;

    #[test]
    fn test_record_and_query() {
        let store = MemoryStore::new();
        let log = SentEmailLog::new(&store);
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();

        let entry = log.record_at("d1", " Ala@Example.com ", at).unwrap();
        assert_eq!(entry.email, "ala@example.com");
        assert_eq!(entry.sent_at, at);

        log.record_at("d2", "ola@example.com", at).unwrap();
        log.record_at("d1", "ola@example.com", at).unwrap();

        assert!(log.was_sent("d1", "ALA@example.com").unwrap());
        assert!(!log.was_sent("d2", "ala@example.com").unwrap());
        assert_eq!(log.for_deal("d1").unwrap().len(), 2);
        assert_eq!(log.entries().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let store = MemoryStore::new();
        let log = SentEmailLog::new(&store);

        for bad in ["", "no-at-sign", "@example.com", "a@b", "a@.com", "a b@example.com", "a@b@c.com", "a@example..com", "a@example.com."] {
            assert!(
                matches!(log.record("d1", bad), Err(DealError::InvalidEmail(_))),
                "accepted {bad:?}"
            );
        }
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn test_record_uses_current_time() {
        let store = MemoryStore::new();
        let before = Utc::now();
        let entry = SentEmailLog::new(&store).record("d1", "a@example.com").unwrap();
        assert!(entry.sent_at >= before);
    }
}
