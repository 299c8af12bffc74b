pub mod executor;

pub use executor::ToolExecutor;
