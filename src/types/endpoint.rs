use std::fmt;

/// Remote control server address, kept as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: String,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }

    /// Parses a saved `host:port` entry. The first `:`-separated segment is
    /// the host and the second the port; anything after that is ignored.
    pub fn from_address(address: &str) -> Self {
        let mut parts = address.split(':');
        let host = parts.next().unwrap_or("");
        let port = parts.next().unwrap_or("");
        Self::new(host, port)
    }

    /// 主机和端口都非空时才会发送通知
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.port.is_empty()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn control_url(&self) -> String {
        format!("http://{}:{}/control", self.host, self.port)
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
