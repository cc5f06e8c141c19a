pub mod hub;
pub mod observer;

pub use hub::{BroadcastReport, NotificationHub};
pub use observer::{DeliveryError, Observer, ObserverId, ObserverState};
