use std::{
    env,
    net::{IpAddr, Ipv4Addr},
};

use config::{Config, ConfigError, Environment, File};
use sap_server::{config::SapServerConfig, scope::SapScope};
use serde::Deserialize;

use crate::{
    AppCli,
    errors::{AppError, AppResult},
    util::parse_log_level,
};

#[derive(Debug, Deserialize)]
pub(crate) struct Logger {
    pub(crate) level: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SapSection {
    pub(crate) enable: bool,
    pub(crate) listen_scopes: Vec<String>,
    pub(crate) send_scopes: Vec<String>,
    pub(crate) port: u16,
}

impl Default for SapSection {
    fn default() -> Self {
        Self {
            enable: true,
            listen_scopes: vec!["ipv4-global".to_owned()],
            send_scopes: vec!["ipv4-global".to_owned()],
            port: sap_formats::SAP_PORT,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RtspSection {
    pub(crate) enable: bool,
    pub(crate) address: IpAddr,
    pub(crate) port: u16,
}

impl Default for RtspSection {
    fn default() -> Self {
        Self {
            enable: true,
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 554,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) logger: Logger,
    #[serde(default)]
    pub(crate) sap_server: SapSection,
    #[serde(default)]
    pub(crate) rtsp_server: RtspSection,
}

fn parse_scope(name: &str) -> AppResult<SapScope> {
    match name {
        "ipv4-global" => Ok(SapScope::Ipv4Global),
        "ipv4-admin" => Ok(SapScope::Ipv4Administered),
        "ipv6-link-local" => Ok(SapScope::Ipv6LinkLocal),
        "ipv6-ipv4" => Ok(SapScope::Ipv6Ipv4Scoped),
        "ipv6-admin-local" => Ok(SapScope::Ipv6AdminLocal),
        "ipv6-site-local" => Ok(SapScope::Ipv6SiteLocal),
        other => Err(AppError::ConfigError(ConfigError::Message(format!(
            "unknown sap scope: {}",
            other
        )))),
    }
}

impl AppConfig {
    pub(crate) fn new(config_path: Option<String>) -> AppResult<Self> {
        let config_path_composed = config_path.or_else(|| env::var("CAES67_CONFIG").ok());
        let Some(path) = config_path_composed else {
            return Ok(Self::default());
        };
        let result = Config::builder()
            .add_source(File::with_name(path.as_str()))
            .add_source(Environment::with_prefix("caes67"))
            .build()?;
        let config = result.try_deserialize()?;
        Ok(config)
    }

    pub(crate) fn apply(&mut self, cli_args: &AppCli) {
        if let Some(log_level) = &cli_args.log_level {
            self.logger.level = log_level.clone();
        }
        if let Some(sap_port) = cli_args.sap_port {
            self.sap_server.port = sap_port;
        }
        if let Some(rtsp_port) = cli_args.rtsp_port {
            self.rtsp_server.port = rtsp_port;
        }
    }

    pub(crate) fn validate(&self) -> AppResult<()> {
        let _ = parse_log_level(&self.logger.level)?;
        let _ = self.sap_config()?;
        Ok(())
    }

    pub(crate) fn sap_config(&self) -> AppResult<SapServerConfig> {
        let parse_scopes = |names: &[String]| -> AppResult<Vec<SapScope>> {
            names.iter().map(|name| parse_scope(name)).collect()
        };
        Ok(SapServerConfig {
            listen_scopes: parse_scopes(&self.sap_server.listen_scopes)?,
            send_scopes: parse_scopes(&self.sap_server.send_scopes)?,
            port: self.sap_server.port,
            ..Default::default()
        })
    }
}
