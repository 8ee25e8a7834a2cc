pub mod channel;
pub mod worker;

pub use channel::CompareRequest;
pub use worker::CompareWorker;
