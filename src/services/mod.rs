pub mod task_accessor;

pub use task_accessor::TaskAccessor;
