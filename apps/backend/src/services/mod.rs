pub mod progress;
pub mod review;
