//! Guest records and the patches applied to them.
//!
//! A [`Guest`] is created from a [`NewGuest`] (defaults filled in, id and
//! creation time assigned by the store) and afterwards only changes through
//! a [`GuestUpdate`]. Neither `id` nor `created_at` is reachable from a patch.

use std::{fmt, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};

pub type GuestId = Uuid;

pub const DEFAULT_FAMILY_COUNT: u32 = 1;
pub const DEFAULT_FOOD_PREFERENCE: &str = "Non-Veg";
pub const DEFAULT_TAG: &str = "General";

/// Attendance response recorded for a guest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum RsvpStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] =
        [RsvpStatus::Pending, RsvpStatus::Confirmed, RsvpStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "Pending",
            RsvpStatus::Confirmed => "Confirmed",
            RsvpStatus::Declined => "Declined",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        RsvpStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                StoreError::Validation(format!("unknown rsvp status `{s}`"))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub phone: String,
    pub family_count: u32,
    pub rsvp_status: RsvpStatus,
    pub food_preference: String,
    pub tag: String,
    pub message: Option<String>,
    pub arrived: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a guest. Everything but `name` and `phone`
/// falls back to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub family_count: Option<u32>,
    #[serde(default)]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(default)]
    pub food_preference: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub arrived: Option<bool>,
}

impl NewGuest {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    pub fn with_family_count(mut self, count: u32) -> Self {
        self.family_count = Some(count);
        self
    }

    pub fn with_rsvp_status(mut self, status: RsvpStatus) -> Self {
        self.rsvp_status = Some(status);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("phone", &self.phone)?;
        if let Some(count) = self.family_count {
            require_positive_count(count)?;
        }
        if let Some(food) = &self.food_preference {
            require_text("food_preference", food)?;
        }
        if let Some(tag) = &self.tag {
            require_text("tag", tag)?;
        }
        Ok(())
    }

    /// Validate and materialize the record the store will persist.
    pub fn into_guest(self, id: GuestId, now: DateTime<Utc>) -> Result<Guest> {
        self.validate()?;

        Ok(Guest {
            id,
            name: self.name,
            phone: self.phone,
            family_count: self.family_count.unwrap_or(DEFAULT_FAMILY_COUNT),
            rsvp_status: self.rsvp_status.unwrap_or_default(),
            food_preference: self
                .food_preference
                .unwrap_or_else(|| DEFAULT_FOOD_PREFERENCE.to_string()),
            tag: self.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
            message: self.message,
            arrived: self.arrived.unwrap_or(false),
            // Postgres keeps microseconds; trim so both adapters agree.
            created_at: now.trunc_subsecs(6),
        })
    }
}

/// Sparse patch over the mutable guest fields.
///
/// `message` distinguishes "absent" (`None`) from "explicitly cleared"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GuestUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub family_count: Option<u32>,
    #[serde(default)]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(default)]
    pub food_preference: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub message: Option<Option<String>>,
    #[serde(default)]
    pub arrived: Option<bool>,
}

impl GuestUpdate {
    pub fn check_in() -> Self {
        Self {
            arrived: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(phone) = &self.phone {
            require_text("phone", phone)?;
        }
        if let Some(count) = self.family_count {
            require_positive_count(count)?;
        }
        if let Some(food) = &self.food_preference {
            require_text("food_preference", food)?;
        }
        if let Some(tag) = &self.tag {
            require_text("tag", tag)?;
        }
        Ok(())
    }

    /// Apply the patch in place. Nothing is touched when validation fails.
    pub fn apply_to(&self, guest: &mut Guest) -> Result<()> {
        self.validate()?;

        if let Some(name) = &self.name {
            guest.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            guest.phone = phone.clone();
        }
        if let Some(count) = self.family_count {
            guest.family_count = count;
        }
        if let Some(status) = self.rsvp_status {
            guest.rsvp_status = status;
        }
        if let Some(food) = &self.food_preference {
            guest.food_preference = food.clone();
        }
        if let Some(tag) = &self.tag {
            guest.tag = tag.clone();
        }
        if let Some(message) = &self.message {
            guest.message = message.clone();
        }
        if let Some(arrived) = self.arrived {
            guest.arrived = arrived;
        }
        Ok(())
    }
}

fn deserialize_some<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!(
            "`{field}` must not be blank"
        )));
    }
    Ok(())
}

fn require_positive_count(count: u32) -> Result<()> {
    if count == 0 || i32::try_from(count).is_err() {
        return Err(StoreError::Validation(format!(
            "`family_count` must be a positive integer, got {count}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_guest_fills_defaults() {
        let now = Utc::now();
        let id = Uuid::now_v7();
        let guest = NewGuest::new("A", "123").into_guest(id, now).unwrap();

        assert_eq!(guest.id, id);
        assert_eq!(guest.family_count, 1);
        assert_eq!(guest.rsvp_status, RsvpStatus::Pending);
        assert_eq!(guest.food_preference, "Non-Veg");
        assert_eq!(guest.tag, "General");
        assert_eq!(guest.message, None);
        assert!(!guest.arrived);
        assert_eq!(guest.created_at, now.trunc_subsecs(6));
    }

    #[test]
    fn new_guest_rejects_blank_name_and_zero_party() {
        let blank = NewGuest::new("   ", "123");
        assert!(matches!(blank.validate(), Err(StoreError::Validation(_))));

        let empty_party = NewGuest::new("A", "123").with_family_count(0);
        assert!(matches!(
            empty_party.validate(),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn new_guest_deserializes_with_missing_optionals() {
        let parsed: NewGuest =
            serde_json::from_value(json!({"name": "A", "phone": "123"}))
                .unwrap();
        assert_eq!(parsed, NewGuest::new("A", "123"));

        let missing_phone =
            serde_json::from_value::<NewGuest>(json!({"name": "A"}));
        assert!(missing_phone.is_err());

        let bad_status = serde_json::from_value::<NewGuest>(
            json!({"name": "A", "phone": "1", "rsvp_status": "Maybe"}),
        );
        assert!(bad_status.is_err());
    }

    #[test]
    fn rsvp_status_round_trips_through_str() {
        for status in RsvpStatus::ALL {
            assert_eq!(status.as_str().parse::<RsvpStatus>().unwrap(), status);
        }
        assert!("confirmed".parse::<RsvpStatus>().is_err());
    }

    #[test]
    fn check_in_patch_only_touches_arrival() {
        let mut guest = NewGuest::new("A", "123")
            .into_guest(Uuid::now_v7(), Utc::now())
            .unwrap();
        let before = guest.clone();

        GuestUpdate::check_in().apply_to(&mut guest).unwrap();

        assert!(guest.arrived);
        assert_eq!(Guest { arrived: false, ..guest }, before);
    }

    #[test]
    fn invalid_patch_leaves_guest_untouched() {
        let mut guest = NewGuest::new("A", "123")
            .into_guest(Uuid::now_v7(), Utc::now())
            .unwrap();
        let before = guest.clone();
        let patch = GuestUpdate {
            name: Some("B".into()),
            phone: Some(String::new()),
            ..GuestUpdate::default()
        };

        assert!(patch.apply_to(&mut guest).is_err());
        assert_eq!(guest, before);
    }

    #[test]
    fn patch_message_distinguishes_absent_from_null() {
        let absent: GuestUpdate =
            serde_json::from_value(json!({"tag": "VIP"})).unwrap();
        assert_eq!(absent.message, None);

        let cleared: GuestUpdate =
            serde_json::from_value(json!({"message": null})).unwrap();
        assert_eq!(cleared.message, Some(None));
        assert!(!cleared.is_empty());
    }
}
