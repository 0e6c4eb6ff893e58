pub mod clients;

pub use clients::{ClientStore, PgClientStore};
