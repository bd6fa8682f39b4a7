pub mod order_poll;
pub mod release_expired;

pub use order_poll::OrderPollWorker;
pub use release_expired::ReleaseExpiredWorker;
