pub mod aggregate;
pub mod detect;
pub mod watch;

// Re-export command functions for convenience
pub use aggregate::aggregate;
pub use detect::detect;
pub use watch::watch;
