pub mod cache;
pub mod signals;

pub use cache::TtlCache;
pub use signals::{SignalStore, StoredEvaluation};
