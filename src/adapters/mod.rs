pub mod facebook;
pub mod registry;
pub mod slack;
pub mod traits;
