pub mod client;
pub mod county;
pub mod invoice;
pub mod message;
pub mod session;
pub mod user;
