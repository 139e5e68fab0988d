//! Sign-in sessions and route guards

pub mod extractor;
pub mod id_token;
pub mod jwt;
pub mod middleware;
pub mod session;

pub use extractor::authenticate;
pub use id_token::{IdTokenClaims, IdTokenError, IdTokenVerifier};
pub use jwt::{JwtError, JwtService, SessionClaims};
pub use middleware::{require_admin, require_session};
pub use session::{AuthContext, SessionStore};
