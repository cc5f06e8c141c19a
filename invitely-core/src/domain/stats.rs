use serde::{Deserialize, Serialize};

use super::guest::{Guest, RsvpStatus};

/// Headcount summary over the whole guest list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_invitees: usize,
    pub confirmed_count: usize,
    pub declined_count: usize,
    pub arrived_count: usize,
    /// Party members across confirmed guests.
    pub total_guests_expected: u64,
    /// Party members across guests already checked in.
    pub arrived_guest_count: u64,
}

impl DashboardStats {
    pub fn from_guests(guests: &[Guest]) -> Self {
        guests.iter().fold(Self::default(), |mut stats, guest| {
            stats.total_invitees += 1;
            match guest.rsvp_status {
                RsvpStatus::Confirmed => {
                    stats.confirmed_count += 1;
                    stats.total_guests_expected +=
                        u64::from(guest.family_count);
                }
                RsvpStatus::Declined => stats.declined_count += 1,
                RsvpStatus::Pending => {}
            }
            if guest.arrived {
                stats.arrived_count += 1;
                stats.arrived_guest_count += u64::from(guest.family_count);
            }
            stats
        })
    }
}
