pub mod consolidate;
pub mod engine;
pub mod error;
pub mod mindmap;
pub mod network;
pub mod recall;
pub mod stats;
pub mod store;
pub mod types;

pub use engine::Memory;
pub use error::{MemoryError, ParseError, StorageError};
pub use recall::RecallOptions;
pub use store::{LongTermStore, SqliteStore};
pub use types::{Engram, EngramType};
