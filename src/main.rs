extern crate env_logger;
extern crate jenkins_job_check;

use std::env;
use std::io;
use std::process;

use jenkins_job_check::check::{self, Status};
use jenkins_job_check::config::{self, Invocation};
use jenkins_job_check::JenkinsClient;

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "check-jenkins-job-status".to_string());
    let args = args.collect::<Vec<_>>();

    let config = match config::parse(&program, &args, |k| env::var(k).ok()) {
        Ok(Invocation::Check(config)) => config,
        Ok(Invocation::Help(usage)) => {
            println!("{}", usage);
            process::exit(0);
        }
        Err(e) => {
            println!("error: {}", e);
            println!("{}", config::usage(&program));
            process::exit(Status::Unknown.exit_code());
        }
    };

    let client = JenkinsClient::new(&config.server_url, config.auth());
    let stdout = io::stdout();
    let outcome = check::evaluate(&client,
                                  &config.job_name,
                                  config.builds,
                                  &mut stdout.lock());
    println!("{}", outcome);
    process::exit(outcome.status.exit_code());
}
