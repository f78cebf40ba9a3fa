use std::io;
use std::num;
use std::str;

use curl;
use serde_json;

error_chain! {
    types {
        MyError, MyErrorKind, MyChainErr, MyResult;
    }

    foreign_links {
        Curl(curl::Error);
        Json(serde_json::Error);
        NotUtf8(str::Utf8Error);
        Io(io::Error);
        ParseInt(num::ParseIntError);
    }

    errors {
        BadStatus(code: u32, body: String) {
            description("unexpected http status")
            display("not a 200 code: {}\n\n{}\n", code, body)
        }

        BuildNotFound(job: String, number: i64) {
            description("build not found")
            display("build #{} of {} does not exist", number, job)
        }

        HistoryExhausted(job: String) {
            description("ran out of builds")
            display("ran out of builds to inspect for {}", job)
        }

        Config(msg: String) {
            description("invalid configuration")
            display("{}", msg)
        }
    }
}
