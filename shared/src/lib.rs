pub mod log;
pub mod sdk;
