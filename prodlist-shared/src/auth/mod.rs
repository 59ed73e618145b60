/// Authentication primitives
///
/// - [`password`]: Argon2id password hashing
/// - [`token`]: opaque API token generation
/// - [`middleware`]: the `X-API-Key` and admin request gates
///
/// Tokens are looked up verbatim on every request. They are stored in the
/// clear because the management endpoints hand them back to administrators.

pub mod middleware;
pub mod password;
pub mod token;
