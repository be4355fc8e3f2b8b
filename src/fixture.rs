//! Synthetic request/response pairs for handler tests.
//!
//! [`new_request`] builds what a proxy handler would see for one incoming
//! call: the request, the host it was addressed to, an empty response to
//! fill in, and the transport facts of the session.

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Request, Response, Uri, Version};

use crate::error::RequestError;

/// Transport facts of the connection a request arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Negotiated protocol, e.g. `"HTTP/1.1"`.
    pub protocol: String,
    /// Whether the request came in over TLS.
    pub secure: bool,
}

#[derive(Debug)]
pub struct SyntheticRequest {
    pub request: Request<()>,
    /// Value of the `Host` the request was addressed to. Defaults to the URL
    /// authority and is overridden by a `"Host"` request header.
    pub host: String,
    pub response: Response<()>,
    pub session: Session,
}

/// Build a [`SyntheticRequest`] for `method url`.
///
/// A request header keyed exactly `"Host"` sets [`SyntheticRequest::host`]
/// instead of being added to the header map; any other spelling is an
/// ordinary header. An empty method means `GET`.
pub fn new_request<QK, QV, RK, RV>(
    url: &str,
    method: &str,
    req_headers: impl IntoIterator<Item = (QK, QV)>,
    resp_headers: impl IntoIterator<Item = (RK, RV)>,
) -> Result<SyntheticRequest, RequestError>
where
    QK: AsRef<str>,
    QV: AsRef<str>,
    RK: AsRef<str>,
    RV: AsRef<str>,
{
    let method = parse_method(method)?;
    let uri = url.parse::<Uri>().map_err(|e| RequestError::MalformedUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let mut host = uri
        .authority()
        .map(|a| strip_userinfo(a.as_str()).to_string())
        .unwrap_or_default();

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .version(Version::HTTP_11)
        .body(())
        .map_err(|e| RequestError::MalformedUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    for (name, value) in req_headers {
        let (name, value) = (name.as_ref(), value.as_ref());
        if name == "Host" {
            host = value.to_string();
            continue;
        }
        append_header(request.headers_mut(), name, value)?;
    }

    let mut response = Response::new(());
    let session = Session {
        protocol: format!("{:?}", request.version()),
        secure: url.to_ascii_lowercase().starts_with("https"),
    };

    for (name, value) in resp_headers {
        append_header(response.headers_mut(), name.as_ref(), value.as_ref())?;
    }

    Ok(SyntheticRequest {
        request,
        host,
        response,
        session,
    })
}

fn parse_method(method: &str) -> Result<Method, RequestError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| RequestError::InvalidMethod(method.to_string()))
}

fn strip_userinfo(authority: &str) -> &str {
    authority.rsplit_once('@').map_or(authority, |(_, host)| host)
}

fn append_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), RequestError> {
    let invalid = |message: String| RequestError::InvalidHeader {
        name: name.to_string(),
        message,
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    headers.append(header_name, header_value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [(&str, &str); 0] = [];

    #[test]
    fn host_header_overrides_url_host() {
        let r = new_request("https://example.com", "GET", [("Host", "alt.example.com")], NONE).unwrap();
        assert_eq!(r.host, "alt.example.com");
        assert!(r.session.secure);
        assert!(r.request.headers().get("host").is_none());
    }

    #[test]
    fn plain_http_is_not_secure() {
        let r = new_request("http://example.com/health", "GET", NONE, NONE).unwrap();
        assert!(!r.session.secure);
        assert_eq!(r.host, "example.com");
        assert_eq!(r.session.protocol, "HTTP/1.1");
        assert_eq!(r.request.uri().path(), "/health");
    }

    #[test]
    fn scheme_check_ignores_case() {
        let r = new_request("HTTPS://Example.com:8443/", "POST", NONE, NONE).unwrap();
        assert!(r.session.secure);
        assert_eq!(r.request.method(), Method::POST);
    }

    #[test]
    fn lowercase_host_is_an_ordinary_header() {
        let r = new_request("http://example.com", "GET", [("host", "other.example.com")], NONE).unwrap();
        assert_eq!(r.host, "example.com");
        assert_eq!(r.request.headers()["host"], "other.example.com");
    }

    #[test]
    fn request_and_response_headers_applied() {
        let r = new_request(
            "http://example.com",
            "GET",
            vec![("X-Forwarded-For".to_string(), "10.0.0.9".to_string())],
            [("Cache-Control", "no-store"), ("Set-Cookie", "a=1"), ("Set-Cookie", "b=2")],
        )
        .unwrap();
        assert_eq!(r.request.headers()["x-forwarded-for"], "10.0.0.9");
        assert_eq!(r.response.headers()["cache-control"], "no-store");
        assert_eq!(r.response.headers().get_all("set-cookie").iter().count(), 2);
    }

    #[test]
    fn response_starts_empty() {
        let r = new_request("http://example.com", "GET", NONE, NONE).unwrap();
        assert!(r.response.headers().is_empty());
    }

    #[test]
    fn userinfo_not_part_of_host() {
        let r = new_request("http://user:pw@example.com:8080/", "GET", NONE, NONE).unwrap();
        assert_eq!(r.host, "example.com:8080");
    }

    #[test]
    fn empty_method_defaults_to_get() {
        let r = new_request("http://example.com", "", NONE, NONE).unwrap();
        assert_eq!(r.request.method(), Method::GET);
    }

    #[test]
    fn invalid_method_rejected() {
        let err = new_request("http://example.com", "BAD METHOD", NONE, NONE).unwrap_err();
        assert!(matches!(err, RequestError::InvalidMethod(m) if m == "BAD METHOD"));
    }

    #[test]
    fn malformed_url_rejected() {
        let err = new_request("http://exa mple.com", "GET", NONE, NONE).unwrap_err();
        assert!(matches!(err, RequestError::MalformedUrl { .. }));
    }

    #[test]
    fn invalid_header_rejected() {
        let err = new_request("http://example.com", "GET", [("bad header", "x")], NONE).unwrap_err();
        assert!(matches!(err, RequestError::InvalidHeader { ref name, .. } if name == "bad header"));
    }
}
