pub mod dedup;
pub mod feed;
pub mod geo;
pub mod poller;
pub mod publishing;
pub mod scheduler;
pub mod slots;
