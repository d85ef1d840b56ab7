//! Authentication: JWT issuance/validation, password hashing and the
//! request extractors built on them.

pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::{AuthUser, RequireAdmin};
pub use jwt::{Claims, JwtManager};
