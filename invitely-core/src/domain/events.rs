//! Change notifications pushed to live observers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{guest::Guest, settings::EventSettings};

/// Wire shape is `{"event": "<kind>", ...}`; the remaining keys depend on
/// the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    NewInvitee { data: Guest },
    Checkin { guest: String },
    InviteeUpdated { data: Guest },
    InviteeRemoved { id: Uuid },
    SettingsUpdated { data: EventSettings },
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::NewInvitee { .. } => "new_invitee",
            NotificationEvent::Checkin { .. } => "checkin",
            NotificationEvent::InviteeUpdated { .. } => "invitee_updated",
            NotificationEvent::InviteeRemoved { .. } => "invitee_removed",
            NotificationEvent::SettingsUpdated { .. } => "settings_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::guest::NewGuest;

    #[test]
    fn checkin_wire_shape() {
        let event = NotificationEvent::Checkin {
            guest: "Sourav".into(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "checkin", "guest": "Sourav"})
        );
    }

    #[test]
    fn new_invitee_carries_full_record() {
        let guest = NewGuest::new("A", "123")
            .into_guest(Uuid::now_v7(), Utc::now())
            .unwrap();
        let event = NotificationEvent::NewInvitee {
            data: guest.clone(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "new_invitee");
        assert_eq!(value["data"]["id"], Value::String(guest.id.to_string()));
        assert_eq!(value["data"]["family_count"], 1);
        assert_eq!(value["data"]["rsvp_status"], "Pending");
        assert_eq!(event.kind(), value["event"]);
    }
}
