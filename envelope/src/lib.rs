//! Response envelope
//!
//! Every machine-readable result is wrapped as `{"code":..,"msg":..,"data":..}`.
//! `code` is 0 on success and non-zero on failure, `msg` carries the error text and
//! `data` is `null` when there is nothing to return.
//!
//! ```
//! use pemrsa_envelope::Response;
//!
//! let resp: Response = Response::fail_with_msg("invalid public key format");
//! assert_eq!(
//!     r#"{"code":1,"msg":"invalid public key format","data":null}"#,
//!     serde_json::to_string(&resp).unwrap()
//! );
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const CODE_OK: i32 = 0;
pub const CODE_FAIL: i32 = 1;

/// Generic response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T = serde_json::Value> {
    /// Non-zero means failure.
    pub code: i32,
    pub msg: String,
    pub data: Option<T>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData<T> {
    pub list: Vec<T>,
    pub total: i64,
}

impl<T> Response<T> {
    pub fn ok() -> Self {
        Self {
            code: CODE_OK,
            msg: String::new(),
            data: None,
        }
    }

    pub fn fail() -> Self {
        Self::fail_with_code_and_msg(CODE_FAIL, "")
    }

    pub fn fail_with_msg(msg: impl Into<String>) -> Self {
        Self::fail_with_code_and_msg(CODE_FAIL, msg)
    }

    pub fn fail_with_code_and_msg(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            code: CODE_OK,
            msg: String::new(),
            data: Some(data),
        }
    }

    pub fn bool(ok: bool) -> Self {
        if ok { Self::ok() } else { Self::fail() }
    }

    /// `msg` is only kept on failure.
    pub fn bool_with_msg(ok: bool, msg: impl Into<String>) -> Self {
        if ok {
            Self::ok()
        } else {
            Self::fail_with_msg(msg)
        }
    }

    /// Failure response carrying the error's display text.
    pub fn from_error(err: &impl Display) -> Self {
        Self::fail_with_msg(err.to_string())
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl<T> Response<PageData<T>> {
    pub fn page(list: Vec<T>, total: i64) -> Self {
        Self::data(PageData { list, total })
    }
}

impl<T, E: Display> From<Result<T, E>> for Response<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::data(data),
            Err(err) => Self::from_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct User {
        id: i32,
        username: String,
    }

    fn users() -> Vec<User> {
        vec![
            User {
                id: 1,
                username: "alice".to_string(),
            },
            User {
                id: 2,
                username: "bob".to_string(),
            },
        ]
    }

    #[rstest]
    #[case::ok(Response::ok(), r#"{"code":0,"msg":"","data":null}"#)]
    #[case::fail(Response::fail(), r#"{"code":1,"msg":"","data":null}"#)]
    #[case::fail_with_msg(Response::fail_with_msg("boom"), r#"{"code":1,"msg":"boom","data":null}"#)]
    #[case::custom_code(
        Response::fail_with_code_and_msg(404, "not found"),
        r#"{"code":404,"msg":"not found","data":null}"#
    )]
    #[case::bool_true(Response::bool(true), r#"{"code":0,"msg":"","data":null}"#)]
    #[case::bool_false(Response::bool(false), r#"{"code":1,"msg":"","data":null}"#)]
    #[case::bool_with_msg_true(Response::bool_with_msg(true, "ignored"), r#"{"code":0,"msg":"","data":null}"#)]
    #[case::bool_with_msg_false(
        Response::bool_with_msg(false, "denied"),
        r#"{"code":1,"msg":"denied","data":null}"#
    )]
    #[case::data(Response::data(json!({"bits": 2048})), r#"{"code":0,"msg":"","data":{"bits":2048}}"#)]
    fn test_response_json(#[case] resp: Response, #[case] expected: &str) {
        assert_eq!(expected, serde_json::to_string(&resp).unwrap());
    }

    #[rstest]
    #[case::ok(Response::ok(), true)]
    #[case::bool_true(Response::bool(true), true)]
    #[case::data(Response::data(serde_json::json!(1)), true)]
    #[case::fail(Response::fail(), false)]
    #[case::bool_false(Response::bool(false), false)]
    fn test_response_code(#[case] resp: Response, #[case] success: bool) {
        assert_eq!(success, resp.code == CODE_OK);
        assert_eq!(!success, resp.code == CODE_FAIL);
    }

    #[test]
    fn test_page_json() {
        let resp = Response::page(users(), 2);
        assert_eq!(
            r#"{"code":0,"msg":"","data":{"list":[{"id":1,"username":"alice"},{"id":2,"username":"bob"}],"total":2}}"#,
            serde_json::to_string(&resp).unwrap()
        );
    }

    #[test]
    fn test_data_with_page_data() {
        let resp = Response::data(PageData {
            list: users(),
            total: 2,
        });
        assert_eq!(
            serde_json::to_value(Response::page(users(), 2)).unwrap(),
            serde_json::to_value(resp).unwrap()
        );
    }

    #[test]
    fn test_from_error() {
        let err = std::fmt::Error;
        let resp: Response = Response::from_error(&err);
        assert_eq!(CODE_FAIL, resp.code);
        assert_eq!(err.to_string(), resp.msg);
        assert!(!resp.is_ok());
    }

    #[test]
    fn test_from_result() {
        let ok: Response<u32> = Ok::<u32, String>(7).into();
        assert_eq!(Some(7), ok.data);
        assert!(ok.is_ok());

        let err: Response<u32> = Err::<u32, String>("bad input".to_string()).into();
        assert_eq!(None, err.data);
        assert_eq!("bad input", err.msg);
    }

    #[test]
    fn test_deserialize() {
        let resp: Response = serde_json::from_str(r#"{"code":1,"msg":"x","data":null}"#).unwrap();
        assert_eq!(Response::fail_with_msg("x"), resp);
    }
}
