use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::guest::require_text;
use crate::error::{Result, StoreError};

/// Public configuration of a single event, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    pub id: Uuid,
    pub bride_name: String,
    pub groom_name: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub venue_map_url: Option<String>,
    pub slug: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSettingsInput {
    pub bride_name: String,
    pub groom_name: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    #[serde(default)]
    pub venue_map_url: Option<String>,
    pub slug: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl EventSettingsInput {
    pub fn validate(&self) -> Result<()> {
        require_text("bride_name", &self.bride_name)?;
        require_text("groom_name", &self.groom_name)?;
        require_text("date", &self.date)?;
        require_text("time", &self.time)?;
        require_text("venue", &self.venue)?;
        if !is_valid_slug(&self.slug) {
            return Err(StoreError::Validation(format!(
                "`slug` must be lowercase letters, digits and dashes, got `{}`",
                self.slug
            )));
        }
        Ok(())
    }

    /// Validate and build the stored record. `id` is reused when the slug
    /// already exists.
    pub fn into_settings(
        self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EventSettings> {
        self.validate()?;

        Ok(EventSettings {
            id,
            bride_name: self.bride_name,
            groom_name: self.groom_name,
            date: self.date,
            time: self.time,
            venue: self.venue,
            venue_map_url: self.venue_map_url,
            slug: self.slug,
            is_active: self.is_active,
            updated_at: now.trunc_subsecs(6),
        })
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(slug: &str) -> EventSettingsInput {
        EventSettingsInput {
            bride_name: "Samapika".into(),
            groom_name: "Ankan".into(),
            date: "2026-05-03".into(),
            time: "18:00".into(),
            venue: "Sarkar Bari, Hamirhati".into(),
            venue_map_url: None,
            slug: slug.into(),
            is_active: true,
        }
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("ankan-samapika"));
        assert!(is_valid_slug("event2026"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Ankan"));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn input_rejects_bad_slug_and_blank_venue() {
        assert!(input("ankan-samapika").validate().is_ok());
        assert!(input("Bad Slug").validate().is_err());

        let mut blank_venue = input("ok");
        blank_venue.venue = " ".into();
        assert!(blank_venue.validate().is_err());
    }

    #[test]
    fn is_active_defaults_to_true() {
        let parsed: EventSettingsInput = serde_json::from_value(
            serde_json::json!({
                "bride_name": "B",
                "groom_name": "G",
                "date": "2026-05-03",
                "time": "18:00",
                "venue": "Hall",
                "slug": "b-g"
            }),
        )
        .unwrap();
        assert!(parsed.is_active);
        assert_eq!(parsed.venue_map_url, None);
    }
}
