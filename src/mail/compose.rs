/// Gmail web compose endpoint
pub const GMAIL_COMPOSE_BASE: &str = "https://mail.google.com/mail/?view=cm&fs=1";

/// Link that opens a pre-filled Gmail draft.
///
/// Each value is percent-encoded on its own, so `&`, `=` and newlines survive.
pub fn gmail_compose_url(to: &str, subject: &str, body: &str) -> String {
    format!(
        "{}&to={}&su={}&body={}",
        GMAIL_COMPOSE_BASE,
        urlencoding::encode(to),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_url_encodes_each_part() {
        let url = gmail_compose_url("bob@gmail.com", "Hi & welcome", "line one\nline=two");
        assert_eq!(
            url,
            "https://mail.google.com/mail/?view=cm&fs=1&to=bob%40gmail.com&su=Hi%20%26%20welcome&body=line%20one%0Aline%3Dtwo"
        );
    }

    #[test]
    fn test_compose_url_with_empty_fields() {
        let url = gmail_compose_url("bob@gmail.com", "", "");
        assert!(url.ends_with("&su=&body="));
    }
}
