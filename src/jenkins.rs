use chrono::{DateTime, TimeZone, Utc};

use errors::*;
use http::{self, Auth};

#[derive(Deserialize, Debug)]
pub struct Job {
    pub name: String,
    #[serde(rename = "nextBuildNumber")]
    pub next_build_number: i64,
    #[serde(rename = "firstBuild")]
    pub first_build: Option<BuildRef>,
}

#[derive(Deserialize, Debug)]
pub struct BuildRef {
    pub number: i64,
    pub url: Option<String>,
}

impl Job {
    /// Oldest build still kept by the server. Without any builds this is
    /// past the current build, so there is nothing to walk.
    pub fn oldest_build_number(&self) -> i64 {
        self.first_build.as_ref().map_or(self.next_build_number, |b| b.number)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Build {
    pub number: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub result: Option<String>,
    #[serde(default)]
    pub building: bool,
    pub timestamp: Option<i64>,
    pub duration: Option<i64>,
    pub url: Option<String>,
}

impl Build {
    /// A build stays unresolved while it's still running.
    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_failure(&self) -> bool {
        self.result.as_ref().map_or(false, |r| r == "FAILURE")
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// The slice of the Jenkins API the job check needs.
pub trait JobApi {
    /// Number of the most recent build, which may still be running.
    fn current_build_number(&self, job: &str) -> MyResult<i64>;

    /// Number of the oldest build the server still keeps; older ones have
    /// been discarded.
    fn oldest_build_number(&self, _job: &str) -> MyResult<i64> {
        Ok(1)
    }

    fn build_details(&self, job: &str, number: i64) -> MyResult<Build>;
}

pub struct JenkinsClient {
    server_url: String,
    auth: Auth,
}

impl JenkinsClient {
    pub fn new(server_url: &str, auth: Auth) -> JenkinsClient {
        JenkinsClient {
            server_url: server_url.trim_end_matches('/').to_string(),
            auth: auth,
        }
    }

    fn job_url(&self, job: &str) -> String {
        format!("{}/job/{}", self.server_url, http::escape(job))
    }

    fn jenkins_get<T>(&self, url: &str) -> MyResult<T>
        where T: ::serde::de::DeserializeOwned
    {
        let headers = vec![format!("Accept: application/json")];
        http::get_json(&format!("{}/api/json", url), &self.auth, &headers)
    }
}

impl JobApi for JenkinsClient {
    fn current_build_number(&self, job: &str) -> MyResult<i64> {
        info!("obtaining the current build number of {}", job);
        let info: Job = self.jenkins_get(&self.job_url(job))?;
        Ok(info.next_build_number - 1)
    }

    fn oldest_build_number(&self, job: &str) -> MyResult<i64> {
        let info: Job = self.jenkins_get(&self.job_url(job))?;
        Ok(info.oldest_build_number())
    }

    fn build_details(&self, job: &str, number: i64) -> MyResult<Build> {
        let url = format!("{}/{}", self.job_url(job), number);
        match self.jenkins_get(&url) {
            Ok(build) => Ok(build),
            Err(MyError(MyErrorKind::BadStatus(404, _), _)) => {
                Err(MyErrorKind::BuildNotFound(job.to_string(), number).into())
            }
            Err(e) => Err(e),
        }
    }
}
