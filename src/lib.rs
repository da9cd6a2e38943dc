// counsel-ai - AI gateway, response cache and feedback analysis for the counselor scheduler

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod interaction;
pub mod secrets;
pub mod server;
pub mod utils;
