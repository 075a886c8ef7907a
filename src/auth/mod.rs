pub mod cookie;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;

// Re-export necessary items
pub use cookie::{removal_cookie, session_cookie};
pub use extractors::AuthenticatedUser;
pub use guard::{ensure_owner, owned_todo};
pub use middleware::RequireSession;
pub use password::{hash_password, verify_password};
