mod exec;

pub use exec::run_tool;
pub use exec::ToolFailure;
