mod client;
mod errors;
pub mod user_agent;
pub use self::client::{Client, FetchConfig, DEFAULT_BASE_URL};
pub use self::errors::Error;
