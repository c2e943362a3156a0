//! GraphQL request execution shared by every Shopify client.

use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};

use super::{GraphQLError, GraphQLErrorLocation, ShopifyError};

/// Build the HTTP client used for Shopify calls.
///
/// No timeout unless one is configured; a slow call simply stays pending.
pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, ShopifyError> {
    let mut builder = reqwest::Client::builder().user_agent("WishlistSync/1.0");
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Execute a GraphQL query against `endpoint`.
///
/// `auth` is the `(header, value)` pair carrying the API credential.
pub(crate) async fn execute<Q: GraphQLQuery>(
    client: &reqwest::Client,
    endpoint: &str,
    auth: (&str, &str),
    variables: Q::Variables,
) -> Result<Q::ResponseData, ShopifyError> {
    let request_body = Q::build_query(variables);

    let response = client
        .post(endpoint)
        .header(auth.0, auth.1)
        .header("Content-Type", "application/json")
        .json(&request_body)
        .send()
        .await?;

    let status = response.status();

    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ShopifyError::RateLimited(retry_after));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ShopifyError::Unauthorized(format!(
            "{} rejected the access token ({status})",
            request_body.operation_name
        )));
    }

    // Get response body as text first for better error diagnostics
    let response_text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            operation = request_body.operation_name,
            body = %response_text.chars().take(500).collect::<String>(),
            "Shopify API returned non-success status"
        );
        return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
            "HTTP {status}: {}",
            response_text.chars().take(200).collect::<String>()
        ))]));
    }

    let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                operation = request_body.operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");

        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            operation = request_body.operation_name,
            body = %response_text.chars().take(500).collect::<String>(),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
    })
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_graphql_error_keeps_path_and_location() {
        let raw: graphql_client::Error = serde_json::from_value(serde_json::json!({
            "message": "Invalid global id",
            "locations": [{ "line": 3, "column": 7 }],
            "path": ["nodes", 1]
        }))
        .unwrap();

        let converted = convert_graphql_error(raw);
        assert_eq!(converted.message, "Invalid global id");
        assert_eq!(converted.locations.len(), 1);
        assert_eq!(converted.locations[0].line, 3);
        assert_eq!(converted.path, vec![serde_json::json!("nodes"), serde_json::json!(1)]);
    }

    #[test]
    fn test_http_client_builds_without_timeout() {
        assert!(http_client(None).is_ok());
        assert!(http_client(Some(Duration::from_secs(5))).is_ok());
    }
}
