pub mod events;
pub mod guest;
pub mod settings;
pub mod stats;

pub use events::NotificationEvent;
pub use guest::{Guest, GuestId, GuestUpdate, NewGuest, RsvpStatus};
pub use settings::{EventSettings, EventSettingsInput};
pub use stats::DashboardStats;
