pub mod authorize_handler;
pub mod token_handler;

pub use token_handler::AppState;
