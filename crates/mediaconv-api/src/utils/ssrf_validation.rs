//! URL screening for the image-from-URL path
//!
//! Rejects non-http(s) schemes, hosts outside an optional allowlist and,
//! when private-network blocking is on, loopback/private/link-local targets
//! including hostnames that resolve to them.

use std::net::{IpAddr, Ipv6Addr};
use tokio::net::lookup_host;

/// Parse and screen a URL before it is fetched.
///
/// * `allow_private_ips` - skip the private-network checks (tests, trusted deployments)
/// * `allowlist` - if set, only these domains and their subdomains are accepted
pub async fn validate_url(
    url: &str,
    allow_private_ips: bool,
    allowlist: Option<&[String]>,
) -> Result<reqwest::Url, String> {
    let parsed_url = reqwest::Url::parse(url).map_err(|e| format!("Invalid URL format: {}", e))?;

    let host = screen_url(&parsed_url, allow_private_ips, allowlist)?;

    if allow_private_ips || host.parse::<IpAddr>().is_ok() {
        return Ok(parsed_url);
    }

    // Resolve and check every address to catch public names pointing inward
    let port = parsed_url.port_or_known_default().unwrap_or(80);
    match lookup_host((host.as_str(), port)).await {
        Ok(addrs) => {
            for addr in addrs {
                if is_private_ip(&addr.ip()) {
                    return Err(format!(
                        "Hostname resolves to private/internal IP address: {}",
                        addr.ip()
                    ));
                }
            }
        }
        Err(e) => {
            // The fetch itself will fail and report this
            tracing::warn!(host = %host, error = %e, "Failed to resolve hostname during URL validation");
        }
    }

    Ok(parsed_url)
}

/// Checks that need no DNS lookup: scheme, allowlist, literal private
/// addresses and internal hostnames. Returns the lowercased host.
///
/// Also applied to every redirect hop, where resolving is not possible.
pub fn screen_url(
    url: &reqwest::Url,
    allow_private_ips: bool,
    allowlist: Option<&[String]>,
) -> Result<String, String> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err("URL must start with http:// or https://".to_string());
    }

    let host = url
        .host_str()
        .ok_or_else(|| "URL must have a host".to_string())?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_lowercase();

    if let Some(allowed_domains) = allowlist {
        let is_allowed = allowed_domains.iter().any(|allowed| {
            let allowed = allowed.to_lowercase();
            // Exact match or subdomain match (cdn.example.com matches example.com)
            host == allowed || host.ends_with(&format!(".{}", allowed))
        });

        if !is_allowed {
            return Err(format!(
                "URL hostname '{}' is not in the allowed list",
                host
            ));
        }
    }

    if allow_private_ips {
        return Ok(host);
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err("Private/internal IP addresses are not allowed".to_string());
        }
        return Ok(host);
    }

    if host == "localhost"
        || host.ends_with(".localhost")
        || host.ends_with(".local")
        || host.ends_with(".internal")
    {
        return Err("Localhost and internal hostnames are not allowed".to_string());
    }

    Ok(host)
}

/// Loopback, RFC 1918, link-local, multicast, unspecified and IPv6 ULA addresses
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private()
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_multicast()
                || ipv4.is_unspecified()
                || ipv4.is_broadcast()
                || ipv4.octets()[0] == 0
        }
        IpAddr::V6(ipv6) => {
            if let Some(mapped) = ipv6.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(mapped));
            }
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                || ipv6.is_multicast()
                || is_ipv6_link_local(ipv6)
                || is_ipv6_unique_local(ipv6)
        }
    }
}

/// fe80::/10
fn is_ipv6_link_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xffc0 == 0xfe80
}

/// fc00::/7
fn is_ipv6_unique_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xfe00 == 0xfc00
}
