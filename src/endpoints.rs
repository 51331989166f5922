//! The API endpoint URIs.
//!
//! Every route is served twice: once under [API_V1] and once at the legacy
//! unversioned path, with identical behavior. For endpoints that take a
//! parameter, e.g. '/transactions/{id}', use [format_endpoint].

/// The prefix the versioned copy of every route lives under.
pub const API_V1: &str = "/api/v1";

/// The route for the health check.
pub const HEALTH: &str = "/health";
/// The route to create or list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{id}";
/// The route for the dashboard summary.
pub const DASHBOARD_SUMMARY: &str = "/dashboard/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{id}', '{id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter. If no parameter is found in `endpoint_path`, the
/// function returns the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::HEALTH,
            endpoints::TRANSACTIONS,
            endpoints::DASHBOARD_SUMMARY,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
            assert_endpoint_is_valid_uri(&format!("{}{}", endpoints::API_V1, endpoint));
        }

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, 1));
    }

    #[test]
    fn format_endpoint_replaces_the_parameter() {
        assert_eq!(
            format_endpoint(endpoints::TRANSACTION, 42),
            "/transactions/42"
        );
    }

    #[test]
    fn format_endpoint_without_parameter_is_identity() {
        assert_eq!(
            format_endpoint(endpoints::TRANSACTIONS, 42),
            endpoints::TRANSACTIONS
        );
    }
}
