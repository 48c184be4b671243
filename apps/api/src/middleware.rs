use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use fieldgate_core::{AppError, SiteId, UserIdentity};

use crate::api_config::parse_list;
use crate::error::ApiResult;
use crate::state::AppState;

pub const HOST_TOKEN_HEADER: &str = "x-fieldgate-token";
pub const SITE_HEADER: &str = "x-fieldgate-site";
pub const SUBJECT_HEADER: &str = "x-fieldgate-subject";
pub const ROLES_HEADER: &str = "x-fieldgate-roles";
pub const CAPABILITIES_HEADER: &str = "x-fieldgate-capabilities";
pub const SUPER_ADMIN_HEADER: &str = "x-fieldgate-super-admin";

/// Authenticates the host and attaches the acting user it reports.
pub async fn require_host_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers(), &state.host_token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Resolves the acting user from trusted host headers.
pub fn identity_from_headers(
    headers: &HeaderMap,
    host_token: &str,
) -> Result<UserIdentity, AppError> {
    let presented = header_value(headers, HOST_TOKEN_HEADER)?
        .ok_or_else(|| AppError::Unauthorized("host token is required".to_owned()))?;
    if !tokens_match(presented, host_token) {
        return Err(AppError::Unauthorized("host token is invalid".to_owned()));
    }

    let site_id = header_value(headers, SITE_HEADER)?
        .ok_or_else(|| AppError::Validation(format!("{SITE_HEADER} header is required")))?
        .trim()
        .parse::<u64>()
        .map_err(|error| AppError::Validation(format!("invalid {SITE_HEADER} header: {error}")))
        .and_then(SiteId::new)?;

    let subject = header_value(headers, SUBJECT_HEADER)?
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{SUBJECT_HEADER} header is required")))?;

    let roles = header_value(headers, ROLES_HEADER)?
        .map(parse_list)
        .unwrap_or_default();
    let capabilities = header_value(headers, CAPABILITIES_HEADER)?
        .map(parse_list)
        .unwrap_or_default();
    let is_super_admin = header_value(headers, SUPER_ADMIN_HEADER)?
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false);

    Ok(UserIdentity::new(subject, subject, site_id)
        .with_roles(roles)
        .with_capabilities(capabilities)
        .with_super_admin(is_super_admin))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::Validation(format!("{name} header must be visible ASCII")))
        })
        .transpose()
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    let presented = presented.as_bytes();
    let expected = expected.as_bytes();
    if presented.len() != expected.len() {
        return false;
    }

    presented
        .iter()
        .zip(expected)
        .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
        == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use fieldgate_core::AppError;

    use super::{
        CAPABILITIES_HEADER, HOST_TOKEN_HEADER, ROLES_HEADER, SITE_HEADER, SUBJECT_HEADER,
        SUPER_ADMIN_HEADER, identity_from_headers,
    };

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn identity_is_built_from_headers() {
        let identity = identity_from_headers(
            &headers(&[
                (HOST_TOKEN_HEADER, TOKEN),
                (SITE_HEADER, "3"),
                (SUBJECT_HEADER, "42"),
                (ROLES_HEADER, "franchisee, corporate"),
                (CAPABILITIES_HEADER, "edit_pages"),
                (SUPER_ADMIN_HEADER, "false"),
            ]),
            TOKEN,
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(identity.subject(), "42");
        assert_eq!(identity.site_id().as_u64(), 3);
        assert_eq!(identity.roles(), ["franchisee", "corporate"]);
        assert!(identity.has_capability("edit_pages"));
        assert!(!identity.is_super_admin());
    }

    #[test]
    fn wrong_token_is_unauthorized() {
        let result = identity_from_headers(
            &headers(&[
                (HOST_TOKEN_HEADER, "fedcba9876543210fedcba9876543210"),
                (SITE_HEADER, "3"),
                (SUBJECT_HEADER, "42"),
            ]),
            TOKEN,
        );
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        let result = identity_from_headers(&headers(&[(SITE_HEADER, "3")]), TOKEN);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn site_zero_is_rejected() {
        let result = identity_from_headers(
            &headers(&[
                (HOST_TOKEN_HEADER, TOKEN),
                (SITE_HEADER, "0"),
                (SUBJECT_HEADER, "42"),
            ]),
            TOKEN,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn super_admin_flag_is_read() {
        let identity = identity_from_headers(
            &headers(&[
                (HOST_TOKEN_HEADER, TOKEN),
                (SITE_HEADER, "1"),
                (SUBJECT_HEADER, "1"),
                (SUPER_ADMIN_HEADER, "1"),
            ]),
            TOKEN,
        )
        .unwrap_or_else(|_| unreachable!());

        assert!(identity.is_super_admin());
        assert!(identity.roles().is_empty());
    }
}
