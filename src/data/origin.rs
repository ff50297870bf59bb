use {crate::config::SERVER, std::fmt};

/// The parts of the page URL that decide where the scan server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Including the trailing colon, e.g. `"https:"`.
    pub protocol: String,
    pub hostname: String,
    /// Empty when the URL carries no explicit port.
    pub port: String,
}

impl PageLocation {
    /// What a desktop build pretends to be served from.
    pub fn local() -> Self {
        Self {
            protocol: "http:".to_string(),
            hostname: "localhost".to_string(),
            port: String::new(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Option<Self> {
        let location = web_sys::window()?.location();
        Some(Self {
            protocol: location.protocol().ok()?,
            hostname: location.hostname().ok()?,
            port: location.port().ok()?,
        })
    }
}

/// Base URL of the scan server, shared by HTTP and the realtime channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOrigin(String);

impl ServerOrigin {
    /// Same origin when the page already comes from the server port, plain
    /// `localhost` for local development, otherwise the page host on the
    /// server port.
    pub fn from_location(loc: &PageLocation) -> Self {
        if loc.port == SERVER.port.to_string() {
            return Self(format!("{}//{}:{}", loc.protocol, loc.hostname, SERVER.port));
        }
        if SERVER.local_hosts.contains(&loc.hostname.as_str()) {
            return Self(SERVER.local_origin.to_string());
        }
        Self(format!("{}//{}:{}", loc.protocol, loc.hostname, SERVER.port))
    }

    /// Explicit override; a trailing slash is dropped so paths join cleanly.
    pub fn from_url(url: &str) -> Self {
        Self(url.trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn filter_url(&self) -> String {
        format!("{}{}", self.0, SERVER.filter_path)
    }
}

impl fmt::Display for ServerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(protocol: &str, hostname: &str, port: &str) -> PageLocation {
        PageLocation {
            protocol: protocol.to_string(),
            hostname: hostname.to_string(),
            port: port.to_string(),
        }
    }

    #[test]
    fn served_from_server_port_uses_same_origin() {
        let origin = ServerOrigin::from_location(&loc("https:", "scan.example.com", "5001"));
        assert_eq!(origin.as_str(), "https://scan.example.com:5001");
        let origin = ServerOrigin::from_location(&loc("http:", "127.0.0.1", "5001"));
        assert_eq!(origin.as_str(), "http://127.0.0.1:5001");
    }

    #[test]
    fn local_hosts_on_other_ports_go_to_plain_localhost() {
        for host in ["localhost", "127.0.0.1"] {
            let origin = ServerOrigin::from_location(&loc("https:", host, "8080"));
            assert_eq!(origin.as_str(), "http://localhost:5001");
        }
        assert_eq!(
            ServerOrigin::from_location(&PageLocation::local()).as_str(),
            "http://localhost:5001"
        );
    }

    #[test]
    fn production_hosts_keep_protocol_and_switch_port() {
        let origin = ServerOrigin::from_location(&loc("https:", "scan.example.com", ""));
        assert_eq!(origin.as_str(), "https://scan.example.com:5001");
        assert_eq!(origin.filter_url(), "https://scan.example.com:5001/filter");
    }

    #[test]
    fn override_drops_trailing_slash() {
        assert_eq!(
            ServerOrigin::from_url("http://10.0.0.2:5001/").filter_url(),
            "http://10.0.0.2:5001/filter"
        );
    }
}
