pub mod aggregate;
pub mod calculator;
pub mod period;
pub mod reconcile;
