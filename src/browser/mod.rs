//! Browser automation module
//!
//! Session contract plus the agent-browser CLI implementation and the cookie
//! vault reader.

pub mod session;
pub mod vault;

pub use session::{AgentBrowserFactory, BrowserSession, SessionFactory};
pub use vault::CookieRecord;
