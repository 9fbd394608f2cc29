/// Host-platform cookie domain matching: a filter matches the cookie's own
/// domain and every subdomain of it. Leading dots and ASCII case are ignored.
pub fn domain_matches(cookie_domain: &str, filter: &str) -> bool {
    let cookie = canonical(cookie_domain);
    let filter = canonical(filter);
    if filter.is_empty() {
        return true;
    }
    if cookie == filter {
        return true;
    }
    cookie
        .strip_suffix(filter.as_str())
        .is_some_and(|prefix| prefix.ends_with('.'))
}

fn canonical(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::domain_matches;

    #[test]
    fn exact_and_leading_dot() {
        assert!(domain_matches("example.com", "example.com"));
        assert!(domain_matches(".example.com", "example.com"));
        assert!(domain_matches("example.com", ".Example.COM"));
    }

    #[test]
    fn subdomains_match_but_lookalikes_do_not() {
        assert!(domain_matches("www.example.com", "example.com"));
        assert!(domain_matches(".a.b.example.com", "example.com"));
        assert!(!domain_matches("badexample.com", "example.com"));
        assert!(!domain_matches("example.com", "www.example.com"));
    }
}
