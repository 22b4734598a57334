pub mod backlog;
pub mod live;

pub use live::LiveMonitor;
