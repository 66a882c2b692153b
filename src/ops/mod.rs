pub mod quadrant;
pub mod task_ops;
