//! Settings synchronization - slider/toggle state pushed to the server

mod controls;
mod debounce;
mod synchronizer;

pub use synchronizer::SettingsSynchronizer;
