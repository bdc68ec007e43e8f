pub mod pool;

pub use pool::{ScrapeSummary, WorkerPool};
