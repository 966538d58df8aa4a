pub mod error;
pub mod feature_flags;

// Accordia domain modules (canonical locations for all practice domain types)
pub mod client;
pub mod county;
pub mod export;
pub mod invoice;
pub mod message;
pub mod session;
pub mod user;

pub use error::*;
pub use feature_flags::*;

// Re-export all domain types
pub use client::*;
pub use county::*;
pub use export::*;
pub use invoice::*;
pub use message::*;
pub use session::*;
pub use user::*;
