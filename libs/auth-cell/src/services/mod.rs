pub mod auth;
pub mod session;
pub mod two_factor;

pub use auth::AuthService;
pub use session::SessionStore;
pub use two_factor::{CodeDelivery, LogDelivery, TwoFactorStore};
