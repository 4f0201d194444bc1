pub mod memory;
pub mod mindmap;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStorage;
pub use mindmap::{MindMapStore, StoreStats};
pub use sqlite::SqliteStorage;
pub use traits::StateStorage;
