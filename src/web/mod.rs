//! Web front end.
//!
//! Server-rendered HTML pages for browsing boards, posting, and account
//! management. Requests are authenticated through a session cookie;
//! protected pages redirect anonymous visitors to the login page.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod templates;
pub mod urls;

pub use error::PageError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
pub use state::AppState;
