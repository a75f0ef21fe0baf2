pub mod identity;
pub mod jwt;

pub use identity::IdentityResolver;
pub use jwt::{JwtCodec, TokenError};
