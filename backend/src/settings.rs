//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from CLI flags, `SAFETY_*` environment variables or a
//! configuration file. Unset values fall back to the defaults below.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_OPERATOR_ORG;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEFAULT_MAIL_FROM: &str = "no-reply@safetynett.local";

/// Runtime configuration for the backend process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SAFETY")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; the in-memory adapters are used when unset.
    pub database_url: Option<String>,
    /// Directory holding uploaded logos and attachments.
    pub uploads_dir: Option<PathBuf>,
    /// HTTP mail relay endpoint; messages are only logged when unset.
    pub mail_relay_url: Option<String>,
    /// `From` address for relayed mail.
    pub mail_from: Option<String>,
    /// Organisation whose members see every tenant.
    pub operator_org: Option<String>,
    /// Mail relay request timeout in seconds.
    #[ortho_config(default = 10)]
    pub mail_timeout_secs: u64,
}

impl AppSettings {
    /// Configured bind address, or `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Uploads directory, or `uploads` relative to the working directory.
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
    }

    /// Mail relay endpoint, ignoring blank values.
    pub fn mail_relay_url(&self) -> Option<&str> {
        self.mail_relay_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Sender address for relayed mail.
    pub fn mail_from(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Operator organisation name.
    pub fn operator_org(&self) -> &str {
        self.operator_org
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .unwrap_or(DEFAULT_OPERATOR_ORG)
    }

    /// Mail relay request timeout.
    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }
}
