extern crate chrono;
extern crate curl;
extern crate getopts;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

pub mod check;
pub mod config;
pub mod errors;
pub mod http;
pub mod jenkins;

pub use check::{evaluate, failed_builds, report, Outcome, Status};
pub use config::{Config, Invocation};
pub use jenkins::{Build, JenkinsClient, JobApi};
