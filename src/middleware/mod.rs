pub mod response;
pub mod session;

pub use response::{ApiResponse, PageFormat};
pub use session::{session_middleware, JwtSessionProvider, Session, SessionProvider};
