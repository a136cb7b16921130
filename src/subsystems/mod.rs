pub mod monitor;

pub use monitor::MonitorSubsystem;
