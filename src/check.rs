use std::fmt;
use std::io::Write;

use errors::*;
use jenkins::JobApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Critical,
    /// The check itself could not complete.
    Unknown,
}

impl Status {
    pub fn exit_code(&self) -> i32 {
        match *self {
            Status::Ok => 0,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            Status::Ok => "OK",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub message: String,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CheckJenkinsJobStatus {}: {}", self.status, self.message)
    }
}

/// Walks backwards from the current build of `job` until `builds` resolved
/// builds have been seen and returns how many of them failed.
///
/// Every inspected build gets a `"{name} ----> {result}"` line on `out`.
/// Running builds and builds that no longer exist are skipped without
/// counting towards `builds`. The walk never goes past the oldest build the
/// server still keeps.
pub fn failed_builds<C, W>(client: &C,
                           job: &str,
                           builds: u32,
                           out: &mut W) -> MyResult<u32>
    where C: JobApi + ?Sized,
          W: Write
{
    let mut current = client.current_build_number(job)?;
    let oldest = client.oldest_build_number(job)?;
    let mut remaining = builds;
    let mut failed = 0;
    info!("inspecting {} resolved builds of {} from #{}", builds, job, current);

    while remaining > 0 {
        if current < oldest.max(1) {
            return Err(MyErrorKind::HistoryExhausted(job.to_string()).into())
        }
        let build = match client.build_details(job, current) {
            Ok(build) => build,
            Err(MyError(MyErrorKind::BuildNotFound(..), _)) => {
                warn!("build #{} of {} is missing, skipping", current, job);
                current -= 1;
                continue
            }
            Err(e) => return Err(e),
        };
        writeln!(out,
                 "{} ----> {}",
                 build.display_name,
                 build.result.as_ref().map(|s| &s[..]).unwrap_or(""))?;
        if let Some(started) = build.started_at() {
            debug!("build #{} started at {}", build.number, started);
        }
        current -= 1;

        if !build.is_resolved() {
            continue
        }
        if build.is_failure() {
            failed += 1;
        }
        remaining -= 1;
    }

    info!("{} of the last {} {} builds failed", failed, builds, job);
    Ok(failed)
}

pub fn report(job: &str, builds: u32, failed: u32) -> Outcome {
    if failed >= builds {
        Outcome {
            status: Status::Critical,
            message: format!("The last {} {} jobs are failing", builds, job),
        }
    } else {
        Outcome {
            status: Status::Ok,
            message: format!("Less than {} {} jobs are failing", builds, job),
        }
    }
}

/// Runs the whole check, turning any lookup error into an `Unknown` outcome.
pub fn evaluate<C, W>(client: &C, job: &str, builds: u32, out: &mut W) -> Outcome
    where C: JobApi + ?Sized,
          W: Write
{
    match failed_builds(client, job, builds, out) {
        Ok(failed) => report(job, builds, failed),
        Err(e) => {
            for cause in e.iter() {
                error!("{}", cause);
            }
            Outcome {
                status: Status::Unknown,
                message: format!("Error looking up Jenkins job: {}: {}", job, e),
            }
        }
    }
}
