//! Client-side form validation, matching what the backend's validation layer
//! will reject anyway so users get feedback before a round trip.

/// Minimum plausible length for a Shopify access token
const MIN_ACCESS_TOKEN_LENGTH: usize = 10;

/// Loose email shape check: one `@` with a dot somewhere after it.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !local.contains(char::is_whitespace)
        && !domain.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// A Shopify store URL: http(s) with a myshopify.com or shopify.com host.
pub fn is_valid_shopify_url(url: &str) -> bool {
    let rest = if let Some(rest) = url.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        return false;
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return false;
    }
    let host = host.split(':').next().unwrap_or("");
    host == "myshopify.com"
        || host == "shopify.com"
        || host.ends_with(".myshopify.com")
        || host.ends_with(".shopify.com")
}

/// Access tokens short enough to be a paste error are rejected up front.
pub fn is_plausible_access_token(token: &str) -> bool {
    token.len() >= MIN_ACCESS_TOKEN_LENGTH && !token.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("x@y.com"));
        assert!(is_valid_email("owner+test@acme.example.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@y.com"));
        assert!(!is_valid_email("x@nodot"));
        assert!(!is_valid_email("x@y..com"));
        assert!(!is_valid_email("spaced out@y.com"));
    }

    #[test]
    fn test_is_valid_shopify_url() {
        assert!(is_valid_shopify_url("https://y.myshopify.com"));
        assert!(is_valid_shopify_url("https://acme.myshopify.com/admin"));
        assert!(is_valid_shopify_url("http://shopify.com"));

        assert!(!is_valid_shopify_url("https://example.com"));
        assert!(!is_valid_shopify_url("y.myshopify.com")); // no scheme
        assert!(!is_valid_shopify_url("https://notmyshopify.net"));
        assert!(!is_valid_shopify_url(""));
    }

    #[test]
    fn test_is_plausible_access_token() {
        assert!(is_plausible_access_token("shpat_00000000"));
        assert!(!is_plausible_access_token("short"));
        assert!(!is_plausible_access_token("has whitespace in it"));
    }
}
