pub mod error;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod validation;

pub use error::AuthError;
pub use handlers::AuthState;
pub use middleware::session_middleware;
pub use services::{AuthService, CodeDelivery, LogDelivery, SessionStore, TwoFactorStore};
