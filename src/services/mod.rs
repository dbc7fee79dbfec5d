pub mod embedding;
pub mod providers;
pub mod scoring;
pub mod watch_tracker;
