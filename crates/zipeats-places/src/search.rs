//! Multi-page text search.

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::{
    RawPlace, TextSearchResponse, STATUS_OK, STATUS_REQUEST_DENIED, STATUS_ZERO_RESULTS,
};

/// Hard stop on page requests; the provider serves at most three pages.
const MAX_PAGES: usize = 10;

const REQUEST_DENIED_HELP: &str = "Google Places API error: REQUEST_DENIED. This usually means:
1. Places API is not enabled in Google Cloud Console
2. Billing is not enabled on your Google Cloud project
3. API key has restrictions (IP/referrer) blocking the request
4. API key is invalid

Please check: https://console.cloud.google.com/apis/library/places-backend.googleapis.com";

impl PlacesClient {
    /// Collects up to `max_places` restaurants near `zip_code` across result pages.
    ///
    /// Pages are fetched strictly in sequence. Before each next-page token is
    /// used the client sleeps for `page_token_delay`, since the provider rejects
    /// tokens that are too fresh. Pagination stops when no token is returned,
    /// the cap is reached, or a later page answers with a non-`OK` status.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Provider`] if the first page status is neither `OK`
    ///   nor `ZERO_RESULTS`.
    /// - [`PlacesError::Http`] or [`PlacesError::Deserialize`] if any page
    ///   request fails in transport.
    pub async fn search_restaurants(&self, zip_code: &str) -> Result<Vec<RawPlace>, PlacesError> {
        let query = format!("restaurants in {zip_code}");
        let url = self.build_url(
            "textsearch/json",
            &[("query", query.as_str()), ("type", "restaurant")],
        );
        let first: TextSearchResponse = self.request_json(url, "textsearch(first page)").await?;

        if first.status != STATUS_OK && first.status != STATUS_ZERO_RESULTS {
            let err = provider_error(&first.status, first.error_message.as_deref());
            tracing::error!(
                zip_code,
                status = %first.status,
                error_message = first.error_message.as_deref().unwrap_or_default(),
                "text search rejected"
            );
            return Err(err);
        }

        let max_places = self.options.max_places;
        let mut places = first.results;
        let mut next_token = first.next_page_token;
        let mut pages = 1usize;

        while let Some(token) = next_token.take() {
            if places.len() >= max_places {
                break;
            }
            if pages >= MAX_PAGES {
                tracing::warn!(zip_code, pages, "page limit reached, stopping pagination");
                break;
            }

            tokio::time::sleep(self.options.page_token_delay).await;

            let url = self.build_url("textsearch/json", &[("pagetoken", token.as_str())]);
            let page: TextSearchResponse = self
                .request_json(url, &format!("textsearch(page {})", pages + 1))
                .await?;
            pages += 1;

            if page.status != STATUS_OK {
                tracing::warn!(
                    zip_code,
                    page = pages,
                    status = %page.status,
                    "next page not OK, keeping results collected so far"
                );
                break;
            }

            places.extend(page.results);
            next_token = page.next_page_token;
        }

        places.truncate(max_places);
        tracing::info!(zip_code, pages, places = places.len(), "text search complete");
        Ok(places)
    }
}

/// Builds the user-facing diagnostic for a rejected first page.
pub(crate) fn provider_error(status: &str, error_message: Option<&str>) -> PlacesError {
    let message = if status == STATUS_REQUEST_DENIED {
        REQUEST_DENIED_HELP.to_string()
    } else {
        match error_message {
            Some(detail) if !detail.is_empty() => {
                format!("Google Places API error: {status}. {detail}")
            }
            _ => format!("Google Places API error: {status}"),
        }
    };
    PlacesError::Provider {
        status: status.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_denied_gets_setup_checklist() {
        let err = provider_error("REQUEST_DENIED", Some("The provided API key is invalid."));
        let msg = err.to_string();
        assert!(msg.starts_with("Google Places API error: REQUEST_DENIED. This usually means:"));
        assert!(msg.contains("Billing is not enabled"));
        assert!(!msg.contains("The provided API key is invalid."));
    }

    #[test]
    fn other_statuses_append_provider_message() {
        let err = provider_error("INVALID_REQUEST", Some("Missing query"));
        assert_eq!(
            err.to_string(),
            "Google Places API error: INVALID_REQUEST. Missing query"
        );
    }

    #[test]
    fn status_alone_when_no_message() {
        let err = provider_error("OVER_QUERY_LIMIT", None);
        assert_eq!(err.to_string(), "Google Places API error: OVER_QUERY_LIMIT");
        assert!(matches!(err, PlacesError::Provider { status, .. } if status == "OVER_QUERY_LIMIT"));
    }
}
