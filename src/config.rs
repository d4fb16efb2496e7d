mod types;

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::net::lookup_host;
use tracing::{debug, info};

pub use self::types::*;

#[derive(Deserialize, Debug, Clone)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Config {
    pub fn update(&mut self, args: crate::cli::Args) {
        fn set_if_some<T>(dst: &mut T, v: Option<T>) {
            if let Some(v) = v {
                *dst = v;
            }
        }

        set_if_some(&mut self.host, args.host);
        set_if_some(&mut self.port, args.port);
        set_if_some(&mut self.endpoint, args.endpoint);
    }

    /// Brings the values into the shape the rest of the program expects.
    pub fn normalize(&mut self) {
        let endpoint = self.endpoint.trim();

        self.endpoint = if endpoint.starts_with('/') {
            endpoint.into()
        } else {
            format!("/{endpoint}")
        };
    }

    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        let (host, port) = (self.host.as_str(), self.port);

        lookup_host((host, port))
            .await
            .with_context(|| anyhow!("could not resolve `{host}`"))?
            .next()
            .ok_or_else(|| anyhow!("`{host}` did not resolve to any address"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".into(),
            port: 3000,
            endpoint: "/".into(),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

pub fn load(search_paths: &[PathBuf]) -> Result<Config> {
    let Some((path, contents)) = read_first_existing(search_paths)? else {
        info!("No config file found, using the defaults");

        return Ok(Default::default());
    };

    let cfg = toml::from_str(&contents)
        .with_context(|| anyhow!("`{}` is not a valid config file", path.display()))?;
    info!("Loaded the config from `{}`", path.display());

    Ok(cfg)
}

fn read_first_existing(search_paths: &[PathBuf]) -> Result<Option<(&Path, String)>> {
    for path in search_paths {
        match fs::read_to_string(path) {
            Ok(contents) => return Ok(Some((path.as_path(), contents))),

            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(file = %path.display(), "No config file here");
            }

            Err(e) => {
                return Err(e).with_context(|| {
                    anyhow!("could not read the config file `{}`", path.display())
                });
            }
        }
    }

    Ok(None)
}
