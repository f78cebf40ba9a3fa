use std::fmt;

use getopts::{Matches, Options};

use errors::*;
use http::Auth;

pub const URL_VAR: &'static str = "JENKINS_URL";
pub const USER_VAR: &'static str = "JENKINS_USER";
pub const PASS_VAR: &'static str = "JENKINS_PASS";

#[derive(Clone)]
pub struct Config {
    pub server_url: String,
    pub job_name: String,
    pub builds: u32,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub enum Invocation {
    Help(String),
    Check(Config),
}

impl Config {
    pub fn auth(&self) -> Auth {
        Auth {
            user: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("job_name", &self.job_name)
            .field("builds", &self.builds)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("u", "url", "hostname running Jenkins API", "JENKINS-API-HOST");
    opts.optopt("j", "job", "name of the job", "JOB-NAME");
    opts.optopt("b", "builds", "number of failed builds to check", "COUNT");
    opts.optopt("U", "username", "username for the Jenkins instance", "USERNAME");
    opts.optopt("p",
                "password",
                "password for the Jenkins instance, defaults to $JENKINS_PASS",
                "PASSWORD");
    opts.optflag("h", "help", "print this help message");
    opts
}

pub fn usage(program: &str) -> String {
    let brief = format!("usage: {} --job JOB-NAME --builds COUNT [options]", program);
    options().usage(&brief)
}

/// Resolves the configuration from `args` (without the program name),
/// falling back to `env` for the server URL and the credentials.
pub fn parse<F>(program: &str, args: &[String], env: F) -> MyResult<Invocation>
    where F: Fn(&str) -> Option<String>
{
    let matches = options().parse(args).map_err(|e| {
        MyError::from(MyErrorKind::Config(e.to_string()))
    })?;
    if matches.opt_present("h") {
        return Ok(Invocation::Help(usage(program)))
    }

    let job_name = required(&matches, "job")?;
    let builds = parse_builds(&required(&matches, "builds")?)?;
    let server_url = matches.opt_str("url")
        .or_else(|| env(URL_VAR))
        .ok_or_else(|| {
            config_error(format!("a server url is required, pass --url or set ${}",
                                 URL_VAR))
        })?;

    Ok(Invocation::Check(Config {
        server_url: server_url.trim_end_matches('/').to_string(),
        job_name: job_name,
        builds: builds,
        username: matches.opt_str("username").or_else(|| env(USER_VAR)),
        password: matches.opt_str("password").or_else(|| env(PASS_VAR)),
    }))
}

fn required(matches: &Matches, name: &str) -> MyResult<String> {
    match matches.opt_str(name) {
        Some(ref s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(config_error(format!("missing required option --{}", name))),
    }
}

fn parse_builds(s: &str) -> MyResult<u32> {
    let n = s.trim().parse::<u32>().chain_err(|| {
        MyErrorKind::Config(format!("--builds must be a positive integer, got {:?}", s))
    })?;
    if n == 0 {
        return Err(config_error("--builds must be at least 1".to_string()))
    }
    Ok(n)
}

fn config_error(msg: String) -> MyError {
    MyErrorKind::Config(msg).into()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    fn check(argv: &[&str], env: &[(&str, &str)]) -> MyResult<Config> {
        let env = env.iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        match parse("check", &args(argv), |k| env.get(k).cloned())? {
            Invocation::Check(config) => Ok(config),
            Invocation::Help(_) => panic!("unexpected help"),
        }
    }

    #[test]
    fn explicit_flags() {
        let config = check(&["-u", "https://ci.example.com/", "-j", "build_ticket_box",
                             "-b", "5", "-U", "alice", "-p", "secret"],
                           &[(URL_VAR, "https://other"), (PASS_VAR, "nope")]).unwrap();
        assert_eq!(config.server_url, "https://ci.example.com");
        assert_eq!(config.job_name, "build_ticket_box");
        assert_eq!(config.builds, 5);
        assert_eq!(config.username, Some("alice".to_string()));
        assert_eq!(config.password, Some("secret".to_string()));
    }

    #[test]
    fn environment_fallbacks() {
        let config = check(&["--job", "myjob", "--builds", "3"],
                           &[(URL_VAR, "https://ci"), (USER_VAR, "bob"), (PASS_VAR, "pw")])
            .unwrap();
        assert_eq!(config.server_url, "https://ci");
        assert_eq!(config.username, Some("bob".to_string()));
        assert_eq!(config.auth().password, Some("pw".to_string()));
    }

    #[test]
    fn credentials_are_optional() {
        let config = check(&["-j", "myjob", "-b", "1", "-u", "https://ci"], &[]).unwrap();
        assert_eq!(config.username, None);
        assert_eq!(config.password, None);
    }

    #[test]
    fn missing_required_inputs() {
        assert!(check(&["-b", "5", "-u", "https://ci"], &[]).is_err());
        assert!(check(&["-j", "myjob", "-u", "https://ci"], &[]).is_err());
        assert!(check(&["-j", "myjob", "-b", "5"], &[]).is_err());
    }

    #[test]
    fn builds_must_be_a_positive_integer() {
        for bad in &["abc", "0", "-3", "2.5", ""] {
            let err = check(&["-j", "myjob", "-u", "https://ci", "-b", *bad], &[]);
            assert!(err.is_err(), "{:?} accepted", bad);
        }
        let config = check(&["-j", "myjob", "-u", "https://ci", "-b", " 7 "], &[]).unwrap();
        assert_eq!(config.builds, 7);
    }

    #[test]
    fn help_flag() {
        match parse("check", &args(&["--help"]), |_| None).unwrap() {
            Invocation::Help(usage) => assert!(usage.contains("--builds")),
            Invocation::Check(_) => panic!("expected help"),
        }
    }

    #[test]
    fn debug_hides_password() {
        let config = check(&["-j", "myjob", "-b", "1", "-u", "https://ci", "-p", "hunter2"],
                           &[]).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
