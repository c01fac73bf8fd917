pub mod auth;
pub mod device;
pub mod progress;
pub mod review;
pub mod stats;
