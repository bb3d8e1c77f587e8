//! Session authenticators backed by the `session_id` cookie.

use async_trait::async_trait;
use axum::http::{HeaderMap, header::COOKIE};

use crate::domain::{AuthError, SessionAuthenticator, UserId};

/// Name of the cookie carrying the session credential
pub const SESSION_COOKIE: &str = "session_id";

/// Extract the session token from the request's `Cookie` headers.
///
/// Empty values count as absent.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Accepts a session whose token is the numeric id of a logged-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSessionAuthenticator;

#[async_trait]
impl SessionAuthenticator for CookieSessionAuthenticator {
    async fn authenticate(&self, token: Option<String>) -> Result<Option<UserId>, AuthError> {
        let token = token.ok_or(AuthError::MissingCredential)?;
        let value = token
            .parse::<u64>()
            .map_err(|_| AuthError::InvalidCredential)?;
        let user_id = UserId::new(value).map_err(|_| AuthError::InvalidCredential)?;
        Ok(Some(user_id))
    }
}

/// Admits every request without a user identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuthenticator;

#[async_trait]
impl SessionAuthenticator for AnonymousAuthenticator {
    async fn authenticate(&self, _token: Option<String>) -> Result<Option<UserId>, AuthError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_session_token_found_among_cookies() {
        // テスト項目: 複数の Cookie の中から session_id を取り出せる
        // given (前提条件):
        let headers = headers_with_cookie(&["theme=dark; session_id=42; lang=ja"]);

        // when (操作):
        let token = session_token_from_headers(&headers);

        // then (期待する結果):
        assert_eq!(token, Some("42".to_string()));
    }

    #[test]
    fn test_session_token_in_second_cookie_header() {
        // テスト項目: 2 つ目の Cookie ヘッダーにある session_id も取り出せる
        // given (前提条件):
        let headers = headers_with_cookie(&["theme=dark", "session_id=\"7\""]);

        // when (操作):
        let token = session_token_from_headers(&headers);

        // then (期待する結果):
        assert_eq!(token, Some("7".to_string()));
    }

    #[test]
    fn test_session_token_absent_or_empty() {
        // テスト項目: session_id が無い・空の場合は None
        // given (前提条件):
        let none = HeaderMap::new();
        let other = headers_with_cookie(&["session=1"]);
        let empty = headers_with_cookie(&["session_id="]);

        // when (操作) / then (期待する結果):
        assert_eq!(session_token_from_headers(&none), None);
        assert_eq!(session_token_from_headers(&other), None);
        assert_eq!(session_token_from_headers(&empty), None);
    }

    #[tokio::test]
    async fn test_cookie_authenticator_accepts_numeric_user() {
        // テスト項目: 数値のセッションはユーザー ID として受理される
        // given (前提条件):
        let authenticator = CookieSessionAuthenticator;

        // when (操作):
        let result = authenticator.authenticate(Some("12".to_string())).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(UserId::new(12).unwrap())));
    }

    #[tokio::test]
    async fn test_cookie_authenticator_rejects_bad_sessions() {
        // テスト項目: セッションが無い・数値でない・0 の場合は拒否される
        // given (前提条件):
        let authenticator = CookieSessionAuthenticator;

        // when (操作):
        let missing = authenticator.authenticate(None).await;
        let garbage = authenticator.authenticate(Some("abc".to_string())).await;
        let zero = authenticator.authenticate(Some("0".to_string())).await;

        // then (期待する結果):
        assert_eq!(missing, Err(AuthError::MissingCredential));
        assert_eq!(garbage, Err(AuthError::InvalidCredential));
        assert_eq!(zero, Err(AuthError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_anonymous_authenticator_admits_everyone() {
        // テスト項目: 匿名認証はセッションの有無にかかわらず受理する
        // given (前提条件):
        let authenticator = AnonymousAuthenticator;

        // when (操作):
        let without = authenticator.authenticate(None).await;
        let with = authenticator.authenticate(Some("5".to_string())).await;

        // then (期待する結果):
        assert_eq!(without, Ok(None));
        assert_eq!(with, Ok(None));
    }
}
