pub mod compact;
pub mod home;
pub mod loader;
pub mod not_found;
