pub mod directories;
pub mod instance_guard;
pub mod logging;
pub mod notifier;
pub mod shutdown;
pub mod track_log;
