//! Repository ports. Handlers depend on these traits; the Postgres and
//! in-memory adapters implement them.

pub mod guests;
pub mod settings;

pub use guests::GuestRepository;
pub use settings::SettingsRepository;
