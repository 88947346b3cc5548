pub mod config;
pub mod providers;
pub mod spatial;
pub mod storage;
