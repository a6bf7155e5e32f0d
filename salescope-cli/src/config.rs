use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "salescope.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataSection,
    pub catalog: CatalogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    pub input: String,
    pub enriched_output: String,
    pub report_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub base_url: String,
    /// Max products to request per run
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataSection {
                input: "data/sales_data.txt".to_string(),
                enriched_output: "data/enriched_sales_data.txt".to_string(),
                report_output: "output/sales_report.txt".to_string(),
            },
            catalog: CatalogSection {
                base_url: "https://dummyjson.com".to_string(),
                limit: 100,
                timeout_secs: 10,
            },
        }
    }
}

/// Load `salescope.toml` from the working directory, falling back to
/// defaults when it does not exist.
pub fn load_config() -> Result<Config> {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {CONFIG_FILE}"))?;
    Ok(toml::from_str(&s).with_context(|| format!("parse {CONFIG_FILE}"))?)
}

pub fn init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        println!("Config already exists: {CONFIG_FILE}");
        return Ok(());
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {CONFIG_FILE}"))?;
    println!("Wrote {CONFIG_FILE}");
    Ok(())
}
