pub mod lifecycle;
pub mod retry;
pub mod types;

pub use lifecycle::LifecycleController;
pub use retry::RetryPolicy;
