/// HTTP middleware owned by the API server
///
/// The authentication gates live in `prodlist_shared::auth::middleware`.

pub mod security;
