pub mod batch;
pub mod nearby;
pub mod rewards;
