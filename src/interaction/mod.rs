//! Player-facing behaviors: movement boundary, proximity, seats, popups

pub mod billboard;
pub mod boundary;
pub mod proximity;
pub mod seat;

pub use billboard::BillboardPopup;
pub use boundary::{BoundaryClamp, BoundaryConfig};
pub use proximity::{ProximityConfig, ProximitySensor};
pub use seat::{SeatInteraction, SeatLinks, SeatOccupancy, SeatState};
