//! Membership filters supporting the admission policy

mod doorkeeper;

pub use doorkeeper::Doorkeeper;
