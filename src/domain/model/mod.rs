pub mod courier;
pub mod delivery;
pub mod errors;
pub mod order;
pub mod transport;

pub use courier::{Courier, CourierPatch, CourierStatus, NewCourier};
pub use delivery::{Delivery, DeliveryStatus, NewDelivery};
pub use errors::DispatchError;
pub use order::{Order, OrderEvent, OrderStatus};
pub use transport::TransportType;
