// Authentication module
// User registration, login, and profile lookup backed by signed bearer
// tokens and an abstract credential store.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, logout_handler, profile_handler, register_handler};
pub use middleware::Bearer;
pub use models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User, UserView};
pub use repository::{InMemoryUserStore, PgUserStore, UserStore};
pub use service::AuthService;
pub use token::{TokenClaims, TokenCodec};
