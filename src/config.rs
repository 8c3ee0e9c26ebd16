use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::controller::RemoveAbsent;
use crate::error::{config_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub api_base: String,
    pub remove_absent: RemoveAbsent,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Ok(Self {
            host: try_load("PLACEPICKER_HOST", "127.0.0.1")?,
            port: try_load("PLACEPICKER_PORT", "3000")?,
            data_dir: try_load("PLACEPICKER_DATA_DIR", "./data")?,
            images_dir: try_load("PLACEPICKER_IMAGES_DIR", "./images")?,
            api_base: try_load("PLACEPICKER_API_BASE", "http://localhost:3000")?,
            remove_absent: try_load("PLACEPICKER_REMOVE_ABSENT", "write")?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, Error> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| config_error(format!("invalid listen address: {}", e)))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        config_error(format!("invalid {}: {}", key, e))
    })
}

#[test]
fn defaults_parse() {
    let port: u16 = try_load("PLACEPICKER_TEST_UNSET_PORT", "3000").unwrap();
    assert_eq!(port, 3000);

    let policy: RemoveAbsent = try_load("PLACEPICKER_TEST_UNSET_POLICY", "skip").unwrap();
    assert_eq!(policy, RemoveAbsent::Skip);
}

#[test]
fn bad_value_is_config_error() {
    let err = try_load::<u16>("PLACEPICKER_TEST_UNSET_PORT", "not-a-port").unwrap_err();
    assert_eq!(err.code, 1);
}
