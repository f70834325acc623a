pub mod cache;
pub mod firestore;
pub mod kv;

pub use cache::CacheService;
pub use firestore::FirestoreClient;
pub use kv::{Clock, KeyValueStore, ManualClock, MemoryStore, RedisStore, SystemClock};
