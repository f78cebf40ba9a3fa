use std::str;

use curl::easy::{Easy, List};
use serde::de::DeserializeOwned;
use serde_json;

use errors::*;

pub struct Response {
    pub code: u32,
    pub body: Vec<u8>,
}

/// Credentials sent with every request as HTTP basic auth.
#[derive(Clone, Default)]
pub struct Auth {
    pub user: Option<String>,
    pub password: Option<String>,
}

pub fn get_json<T>(url: &str, auth: &Auth, headers: &[String]) -> MyResult<T>
    where T: DeserializeOwned
{
    let response = get(url, auth, headers)?;
    let json = str::from_utf8(&response.body)?;
    let ret = serde_json::from_str(json).chain_err(|| {
        format!("failed to decode: {:#?}", json)
    })?;
    Ok(ret)
}

pub fn get(url: &str, auth: &Auth, headers: &[String]) -> MyResult<Response> {
    let mut handle = Easy::new();
    let mut list = List::new();
    list.append("User-Agent: check-jenkins-job-status")?;
    for header in headers {
        list.append(header)?;
    }

    if let Some(ref user) = auth.user {
        handle.username(user)?;
    }
    if let Some(ref pass) = auth.password {
        handle.password(pass)?;
    }

    handle.http_headers(list)?;
    handle.get(true)?;
    handle.url(url)?;

    perform(handle, url)
}

pub fn perform(mut easy: Easy, url: &str) -> MyResult<Response> {
    debug!("fetching: {}", url);
    let mut data = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|buf| {
            data.extend_from_slice(buf);
            Ok(buf.len())
        })?;
        transfer.perform()?;
    }
    debug!("finished: {}", url);

    check_status(easy.response_code()?, data)
}

fn check_status(code: u32, body: Vec<u8>) -> MyResult<Response> {
    match code {
        200 | 204 => Ok(Response { code: code, body: body }),
        code => {
            let body = String::from_utf8_lossy(&body).into_owned();
            Err(MyErrorKind::BadStatus(code, body).into())
        }
    }
}

/// Percent-encodes a path, leaving `/` separators alone.
pub fn escape(path: &str) -> String {
    let mut easy = Easy::new();
    path.split('/')
        .map(|segment| easy.url_encode(segment.as_bytes()))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_codes_pass_through() {
        let response = check_status(200, b"{}".to_vec()).unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body, b"{}");
        assert!(check_status(204, Vec::new()).is_ok());
    }

    #[test]
    fn other_codes_are_errors() {
        let err = check_status(401, b"denied".to_vec()).err().unwrap();
        match *err.kind() {
            MyErrorKind::BadStatus(401, ref body) => assert_eq!(body, "denied"),
            ref other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn escapes_path_segments() {
        assert_eq!(escape("plain-job"), "plain-job");
        assert_eq!(escape("my job/x"), "my%20job/x");
        assert_eq!(escape("a&b/c d"), "a%26b/c%20d");
    }
}
