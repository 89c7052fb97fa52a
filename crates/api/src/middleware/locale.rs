//! `Accept-Language` negotiation.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use erp_core::i18n::Locale;

/// Locale used for messages in the response. Falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    pub fn from_parts(parts: &Parts) -> Self {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(Locale::negotiate)
            .unwrap_or_default();
        RequestLocale(locale)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACCEPT_LANGUAGE, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn negotiates_from_header() {
        assert_eq!(RequestLocale::from_parts(&parts(Some("de-DE,de;q=0.9"))).0, Locale::De);
        assert_eq!(RequestLocale::from_parts(&parts(Some("zh-CN"))).0, Locale::ZhCn);
    }

    #[test]
    fn missing_or_unsupported_header_is_english() {
        assert_eq!(RequestLocale::from_parts(&parts(None)).0, Locale::En);
        assert_eq!(RequestLocale::from_parts(&parts(Some("ko-KR"))).0, Locale::En);
    }
}
