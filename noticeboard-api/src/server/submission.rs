use axum::{
    extract::FromRequestParts,
    http::{HeaderName, HeaderValue, request::Parts},
};
use headers::{Header, HeaderMapExt};
use std::convert::Infallible;

static X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// The `X-Requested-With` header browsers' script code sets on background requests.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct XRequestedWith(HeaderValue);

impl XRequestedWith {
    #[must_use]
    pub fn is_xml_http_request(&self) -> bool {
        self.0.as_bytes().eq_ignore_ascii_case(b"XMLHttpRequest")
    }
}

impl Header for XRequestedWith {
    fn name() -> &'static HeaderName {
        &X_REQUESTED_WITH
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .cloned()
            .map(Self)
            .ok_or_else(headers::Error::invalid)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        values.extend(std::iter::once(self.0.clone()));
    }
}

/// How a form was submitted, which decides between a redirect and a JSON reply.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Submission {
    /// Plain HTML form post; answered with a redirect.
    Form,
    /// Background request from page script; answered with a JSON status object.
    Async,
}

impl<S> FromRequestParts<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_async = parts
            .headers
            .typed_get::<XRequestedWith>()
            .is_some_and(|header| header.is_xml_http_request());

        Ok(if is_async { Self::Async } else { Self::Form })
    }
}

#[cfg(test)]
mod tests {
    use crate::server::submission::{Submission, XRequestedWith};
    use axum::{
        extract::FromRequestParts,
        http::{HeaderValue, Request},
    };
    use headers::HeaderMapExt;

    async fn submission_for(header: Option<&'static str>) -> Submission {
        let mut builder = Request::builder().uri("/create_post");
        if let Some(value) = header {
            builder = builder.header("x-requested-with", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();

        Submission::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn detects_background_requests() {
        assert_eq!(submission_for(None).await, Submission::Form);
        assert_eq!(
            submission_for(Some("XMLHttpRequest")).await,
            Submission::Async
        );
        assert_eq!(
            submission_for(Some("xmlhttprequest")).await,
            Submission::Async
        );
        assert_eq!(submission_for(Some("fetch")).await, Submission::Form);
    }

    #[test]
    fn header_round_trip() {
        let mut headers = axum::http::HeaderMap::new();
        headers.typed_insert(XRequestedWith(HeaderValue::from_static("XMLHttpRequest")));
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
        assert!(
            headers
                .typed_get::<XRequestedWith>()
                .unwrap()
                .is_xml_http_request()
        );
    }
}
