pub mod execution;

pub use execution::run_collection;
