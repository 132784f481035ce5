//! Device metadata derived from request headers.
//!
//! The parsed browser/OS/device-type values are advisory only (they feed
//! the device list shown to users); deduplication keys on the
//! [`fingerprint`], never on the parsed fields.

use sha2::{Digest, Sha256};

/// Parsed, advisory device metadata from a User-Agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device_type: Option<String>,
}

/// Best-effort User-Agent classification.
///
/// Substring matching only -- unknown agents yield `None` fields rather
/// than guesses. Match order matters: Chromium-family browsers embed
/// each other's product tokens.
pub fn parse_user_agent(ua: &str) -> DeviceInfo {
    if ua.trim().is_empty() {
        return DeviceInfo::default();
    }
    DeviceInfo {
        browser: parse_browser(ua),
        os: parse_os(ua),
        device_type: Some(parse_device_type(ua).to_string()),
    }
}

fn parse_browser(ua: &str) -> Option<String> {
    let browser = if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
        "Chrome"
    } else if ua.contains("Firefox/") || ua.contains("FxiOS/") {
        "Firefox"
    } else if ua.contains("Safari/") {
        "Safari"
    } else {
        return None;
    };
    Some(browser.to_string())
}

fn parse_os(ua: &str) -> Option<String> {
    // iPhone/iPad report "like Mac OS X", so check them first.
    let os = if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("Windows NT") {
        "Windows"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "macOS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        return None;
    };
    Some(os.to_string())
}

fn parse_device_type(ua: &str) -> &'static str {
    if ua.contains("iPad") || ua.contains("Tablet") {
        "tablet"
    } else if ua.contains("Mobile") || ua.contains("iPhone") {
        "mobile"
    } else if ua.contains("Android") {
        // Android tablets omit the "Mobile" token.
        "tablet"
    } else {
        "desktop"
    }
}

/// Stable fingerprint for "same device on the same network" detection.
///
/// SHA-256 over the User-Agent and a truncated IP prefix, hex-encoded.
/// Truncating the address keeps the fingerprint stable across DHCP churn
/// within one network, so a retried sign-in collapses to one session.
pub fn fingerprint(user_agent: Option<&str>, ip_address: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.unwrap_or("").as_bytes());
    hasher.update(b"\n");
    hasher.update(ip_prefix(ip_address.unwrap_or("")).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Network prefix of an IP address: first three octets for IPv4, first
/// four groups for IPv6. Unparseable input is used verbatim.
pub fn ip_prefix(ip: &str) -> String {
    if ip.contains(':') {
        let groups: Vec<&str> = ip.split(':').take(4).collect();
        groups.join(":")
    } else {
        let octets: Vec<&str> = ip.split('.').collect();
        if octets.len() == 4 {
            octets[..3].join(".")
        } else {
            ip.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                                 AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 \
                                 Mobile/15E148 Safari/604.1";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const EDGE_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                            (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

    #[test]
    fn test_parse_chrome_on_windows() {
        let info = parse_user_agent(CHROME_WIN);
        assert_eq!(info.browser.as_deref(), Some("Chrome"));
        assert_eq!(info.os.as_deref(), Some("Windows"));
        assert_eq!(info.device_type.as_deref(), Some("desktop"));
    }

    #[test]
    fn test_parse_safari_on_iphone() {
        let info = parse_user_agent(SAFARI_IPHONE);
        assert_eq!(info.browser.as_deref(), Some("Safari"));
        assert_eq!(info.os.as_deref(), Some("iOS"));
        assert_eq!(info.device_type.as_deref(), Some("mobile"));
    }

    #[test]
    fn test_parse_firefox_on_linux() {
        let info = parse_user_agent(FIREFOX_LINUX);
        assert_eq!(info.browser.as_deref(), Some("Firefox"));
        assert_eq!(info.os.as_deref(), Some("Linux"));
        assert_eq!(info.device_type.as_deref(), Some("desktop"));
    }

    #[test]
    fn test_edge_is_not_chrome() {
        let info = parse_user_agent(EDGE_WIN);
        assert_eq!(info.browser.as_deref(), Some("Edge"));
    }

    #[test]
    fn test_empty_agent_yields_nothing() {
        assert_eq!(parse_user_agent(""), DeviceInfo::default());
        assert_eq!(parse_user_agent("   "), DeviceInfo::default());
    }

    #[test]
    fn test_fingerprint_stable_within_network() {
        let a = fingerprint(Some(CHROME_WIN), Some("203.0.113.10"));
        let b = fingerprint(Some(CHROME_WIN), Some("203.0.113.250"));
        assert_eq!(a, b, "same /24 must yield the same fingerprint");
    }

    #[test]
    fn test_fingerprint_differs_across_networks() {
        let a = fingerprint(Some(CHROME_WIN), Some("203.0.113.10"));
        let b = fingerprint(Some(CHROME_WIN), Some("198.51.100.10"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_differs_across_agents() {
        let a = fingerprint(Some(CHROME_WIN), Some("203.0.113.10"));
        let b = fingerprint(Some(FIREFOX_LINUX), Some("203.0.113.10"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_ip_prefix() {
        assert_eq!(ip_prefix("203.0.113.10"), "203.0.113");
        assert_eq!(ip_prefix("2001:db8:85a3:8d3:1319:8a2e:370:7348"), "2001:db8:85a3:8d3");
        assert_eq!(ip_prefix("not-an-ip"), "not-an-ip");
    }
}
