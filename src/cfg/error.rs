use eyre::{Report, Result, eyre};

// Config failures are only ever reported, never matched on, so they stay
// plain eyre reports.
pub type ConfigResult<T> = Result<T, Report>;

pub fn config_load_error(source: std::io::Error) -> Report {
    eyre!("config load error: {}", source)
}

pub fn serde_yaml_error(source: serde_yaml::Error) -> Report {
    eyre!("serde yaml error: {}", source)
}
