//! Authentication: token codec, role gate and user store

pub mod gate;
pub mod middleware;
pub mod models;
pub mod store;
pub mod token;

pub use gate::{authorize, Access, AuthError, AuthGate, Identity, Rejection, SCHEDULE_EDITORS};
pub use middleware::token_from_headers;
pub use models::{Claims, Principal, Timestamp};
pub use store::{verify_password, UserStore};
pub use token::{decode, encode, SecretKey, TokenCodec, TokenError};
