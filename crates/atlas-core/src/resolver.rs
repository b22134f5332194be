//! Location resolution outcomes and the per-country admission cap.

use std::collections::HashMap;

/// How a track's location was established.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// The artist lookup produced a location string.
    Resolved(String),
    /// No artist location; the search tag mapped to a country.
    Fallback(String),
    /// Nothing resolved; the track can never be admitted.
    Unresolved,
}

impl LocationOutcome {
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Resolved(location) | Self::Fallback(location) => Some(location),
            Self::Unresolved => None,
        }
    }
}

/// Country part of a location string: the substring after the last comma if
/// present, else the whole string, trimmed either way.
pub fn country_of_location(location: &str) -> &str {
    match location.rsplit_once(',') {
        Some((_, country)) => country.trim(),
        None => location.trim(),
    }
}

/// Running per-country admission counts.
///
/// Explicit state owned by the collection loop; a track is admitted only
/// while its derived country is under the cap, and admission increments the
/// count, so rejection is permanent for the rest of the run.
#[derive(Debug, Clone)]
pub struct CountryQuota {
    counts: HashMap<String, u32>,
    max_per_country: u32,
}

impl CountryQuota {
    pub fn new(max_per_country: u32) -> Self {
        Self {
            counts: HashMap::new(),
            max_per_country,
        }
    }

    /// Admit a track for the country derived from `location`, if that
    /// country is still under the cap. A blank location is never admitted.
    pub fn admit(&mut self, location: &str) -> bool {
        let country = country_of_location(location);
        if country.is_empty() {
            return false;
        }
        let count = self.counts.entry(country.to_string()).or_insert(0);
        if *count < self.max_per_country {
            *count += 1;
            true
        } else {
            false
        }
    }

    /// Admitted so far for a country.
    pub fn count(&self, country: &str) -> u32 {
        self.counts.get(country).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_of_location() {
        assert_eq!(country_of_location("Lagos, Nigeria"), "Nigeria");
        assert_eq!(country_of_location("Nigeria"), "Nigeria");
        assert_eq!(country_of_location("  Sweden  "), "Sweden");
        assert_eq!(country_of_location("Brooklyn, New York, United States"), "United States");
        assert_eq!(country_of_location("Lagos,Nigeria"), "Nigeria");
    }

    #[test]
    fn test_quota_caps_and_stays_capped() {
        let mut quota = CountryQuota::new(2);
        assert!(quota.admit("Lagos, Nigeria"));
        assert!(quota.admit("Abuja, Nigeria"));
        assert!(!quota.admit("Kano, Nigeria"));
        // Once at cap, always rejected for the rest of the run.
        assert!(!quota.admit("Nigeria"));
        assert_eq!(quota.count("Nigeria"), 2);
    }

    #[test]
    fn test_quota_counts_per_country() {
        let mut quota = CountryQuota::new(1);
        assert!(quota.admit("Tokyo, Japan"));
        assert!(quota.admit("Lagos, Nigeria"));
        assert!(!quota.admit("Osaka, Japan"));
        assert_eq!(quota.count("Japan"), 1);
        assert_eq!(quota.count("Nigeria"), 1);
        assert_eq!(quota.count("Mali"), 0);
    }

    #[test]
    fn test_quota_never_exceeds_cap() {
        let mut quota = CountryQuota::new(50);
        let admitted = (0..120).filter(|_| quota.admit("Kingston, Jamaica")).count();
        assert_eq!(admitted, 50);
        assert_eq!(quota.count("Jamaica"), 50);
    }

    #[test]
    fn test_quota_rejects_blank_location() {
        let mut quota = CountryQuota::new(5);
        assert!(!quota.admit(""));
        assert!(!quota.admit("   "));
        assert!(!quota.admit("Somewhere, "));
    }

    #[test]
    fn test_outcome_location() {
        assert_eq!(
            LocationOutcome::Resolved("Lagos, Nigeria".to_string()).location(),
            Some("Lagos, Nigeria")
        );
        assert_eq!(
            LocationOutcome::Fallback("Japan".to_string()).location(),
            Some("Japan")
        );
        assert_eq!(LocationOutcome::Unresolved.location(), None);
    }
}
