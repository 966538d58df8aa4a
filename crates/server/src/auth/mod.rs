pub mod extractors;
pub mod jwt;
pub mod magic_link;
pub mod middleware;

pub use extractors::AuthRequired;
pub use jwt::Claims;
