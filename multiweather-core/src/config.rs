use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::model::{ReadingRequest, SensorMap};
use crate::vendor::VendorId;

/// Stored credentials and station settings for a single vendor. Every field is
/// optional here; the vendor parameter objects enforce what they actually need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apisec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ret_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_passwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_lid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_sn: Option<SensorMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Station timezone code (HT, AT, PT, MT, CT, ET).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
}

impl StationConfig {
    /// Seed a request with the stored credentials; the caller supplies the
    /// window afterwards.
    pub fn to_request(&self) -> ReadingRequest {
        ReadingRequest {
            sn: self.sn.clone(),
            apikey: self.apikey.clone(),
            apisec: self.apisec.clone(),
            token: self.token.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            ret_form: self.ret_form.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            user_passwd: self.user_passwd.clone(),
            station_id: self.station_id.clone(),
            station_lid: self.station_lid.clone(),
            sid: self.sid.clone(),
            pid: self.pid.clone(),
            mac: self.mac.clone(),
            sensor_sn: self.sensor_sn.clone(),
            interval: self.interval,
            tz: self.tz.clone(),
            ..ReadingRequest::default()
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default vendor id, e.g. "spectrum" or "zentra".
    pub default_vendor: Option<String>,

    /// Example TOML:
    /// [vendors.spectrum]
    /// sn = "50400123"
    /// apikey = "..."
    /// tz = "ET"
    pub vendors: HashMap<String, StationConfig>,
}

impl Config {
    /// Return the default vendor as a strongly-typed VendorId.
    pub fn default_vendor_id(&self) -> Result<VendorId> {
        let s = self.default_vendor.as_ref().ok_or_else(|| {
            anyhow!(
                "No default vendor configured.\n\
                 Hint: run `multiweather configure <vendor>` (e.g. `multiweather configure spectrum`) first."
            )
        })?;

        Ok(VendorId::try_from(s.as_str())?)
    }

    pub fn vendor_config(&self, id: VendorId) -> Option<&StationConfig> {
        self.vendors.get(id.as_str())
    }

    pub fn is_vendor_configured(&self, id: VendorId) -> bool {
        self.vendors.contains_key(id.as_str())
    }

    /// Store default vendor as string.
    pub fn set_default_vendor(&mut self, id: VendorId) {
        self.default_vendor = Some(id.as_str().to_string());
    }

    /// Set/replace a vendor's stored credentials; the first configured vendor
    /// becomes the default.
    pub fn upsert_vendor(&mut self, id: VendorId, station: StationConfig) {
        self.vendors.insert(id.as_str().to_string(), station);

        if self.default_vendor.is_none() {
            self.default_vendor = Some(id.to_string());
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "multiweather", "multiweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_station() -> StationConfig {
        StationConfig {
            sn: Some("50400123".to_string()),
            apikey: Some("KEY".to_string()),
            tz: Some("ET".to_string()),
            ..StationConfig::default()
        }
    }

    #[test]
    fn default_vendor_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_vendor_id().unwrap_err();

        assert!(err.to_string().contains("No default vendor configured"));
    }

    #[test]
    fn first_configured_vendor_becomes_default() {
        let mut cfg = Config::default();

        cfg.upsert_vendor(VendorId::Spectrum, spectrum_station());

        let default = cfg.default_vendor_id().expect("default vendor must exist");
        assert_eq!(default, VendorId::Spectrum);
        assert!(cfg.is_vendor_configured(VendorId::Spectrum));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_vendor(VendorId::Spectrum, spectrum_station());
        cfg.upsert_vendor(VendorId::Zentra, StationConfig::default());

        let default = cfg.default_vendor_id().expect("default vendor must exist");

        assert_eq!(default, VendorId::Spectrum);
        assert!(cfg.is_vendor_configured(VendorId::Zentra));
    }

    #[test]
    fn set_default_vendor_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_vendor(VendorId::Spectrum, spectrum_station());
        cfg.set_default_vendor(VendorId::Zentra);

        let default = cfg.default_vendor_id().expect("default vendor must exist");
        assert_eq!(default, VendorId::Zentra);
    }

    #[test]
    fn stored_credentials_seed_a_request() {
        let request = spectrum_station().to_request();
        assert_eq!(request.sn.as_deref(), Some("50400123"));
        assert_eq!(request.apikey.as_deref(), Some("KEY"));
        assert_eq!(request.tz.as_deref(), Some("ET"));
        assert!(request.start_datetime.is_none());
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.upsert_vendor(VendorId::Spectrum, spectrum_station());

        let encoded = toml::to_string_pretty(&cfg).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();

        assert_eq!(decoded.default_vendor.as_deref(), Some("spectrum"));
        let station = decoded.vendor_config(VendorId::Spectrum).unwrap();
        assert_eq!(station.sn.as_deref(), Some("50400123"));
        assert!(station.token.is_none());
    }
}
