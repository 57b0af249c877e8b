mod error;
mod settings;


pub use error::SessionError;
pub use settings::{Session, Settings, DEFAULT_PAGE_SIZE};
