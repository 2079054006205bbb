use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use inquire::Text;

use multiweather_core::config::{Config, StationConfig};
use multiweather_core::model::SensorMap;
use multiweather_core::timezone::{self, TzCode};
use multiweather_core::vendor::{self, VendorId};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "multiweather", version, about = "Weather station readings across vendor APIs")]
pub struct Cli {
    /// Log level for diagnostic output (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific vendor.
    Configure {
        /// Vendor short name, e.g. "spectrum" or "zentra".
        vendor: String,
    },

    /// Fetch readings for a time window and write the raw envelope to disk.
    Fetch {
        /// Vendor short name; defaults to the configured default vendor.
        vendor: Option<String>,

        /// Window start, station-local, `YYYY-MM-DD HH:MM:SS`.
        /// Defaults to two hours ago.
        #[arg(long)]
        start: Option<String>,

        /// Window end, station-local, `YYYY-MM-DD HH:MM:SS`.
        /// Defaults to one hour after the start.
        #[arg(long)]
        end: Option<String>,

        /// Station timezone code, overriding the configured one.
        #[arg(long)]
        tz: Option<String>,

        /// Directory the raw vendor response is written into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// List supported vendors.
    Vendors,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { vendor } => configure(&vendor),
            Command::Fetch { vendor, start, end, tz, out } => {
                fetch(vendor.as_deref(), start.as_deref(), end.as_deref(), tz.as_deref(), &out)
                    .await
            }
            Command::Vendors => {
                for id in VendorId::all() {
                    println!("{id}");
                }
                Ok(())
            }
        }
    }
}

fn prompt(label: &str) -> Result<Option<String>> {
    let answer = Text::new(label)
        .prompt()
        .with_context(|| format!("Failed to read '{label}'"))?;
    let answer = answer.trim();
    Ok(if answer.is_empty() { None } else { Some(answer.to_string()) })
}

fn required(label: &str) -> Result<String> {
    prompt(label)?.with_context(|| format!("'{label}' must not be empty"))
}

/// Interactively collect the credential fields the vendor needs and store them
/// in the config file.
fn configure(vendor: &str) -> Result<()> {
    let id = VendorId::try_from(vendor)?;
    let mut station = StationConfig::default();

    match id {
        VendorId::Campbell => {
            station.username = Some(required("Username (email):")?);
            station.user_passwd = Some(required("Password:")?);
            station.station_id = Some(required("Station id (alphanumeric):")?);
            station.station_lid = Some(required("Station legacy id:")?);
        }
        VendorId::Davis => {
            station.sn = Some(required("Station serial number:")?);
            station.apikey = Some(required("API key:")?);
            station.apisec = Some(required("API secret:")?);
        }
        VendorId::Onset => {
            station.sn = Some(required("Logger serial number:")?);
            station.client_id = Some(required("OAuth client id:")?);
            station.client_secret = Some(required("OAuth client secret:")?);
            station.user_id = Some(required("Numeric user id:")?);
            station.ret_form = Some("JSON".to_string());
            let sensors = SensorMap {
                atemp: prompt("Temperature sensor serial (optional):")?,
                pcpn: prompt("Precipitation sensor serial (optional):")?,
                relh: prompt("Humidity sensor serial (optional):")?,
            };
            if sensors.atemp.is_some() || sensors.pcpn.is_some() || sensors.relh.is_some() {
                station.sensor_sn = Some(sensors);
            }
        }
        VendorId::Rainwise => {
            let mac = required("Station MAC:")?;
            station.username = Some(mac.clone());
            station.mac = Some(mac);
            let sid = required("Site id:")?;
            station.sid = Some(sid.clone());
            station.pid = Some(sid);
        }
        VendorId::Spectrum => {
            station.sn = Some(required("Station serial number:")?);
            station.apikey = Some(required("Customer API key:")?);
        }
        VendorId::Zentra => {
            station.sn = Some(required("Device serial number:")?);
            station.token = Some(required("API token:")?);
        }
    }
    station.tz = prompt("Station timezone code (HT, AT, PT, MT, CT, ET):")?;

    let mut cfg = Config::load()?;
    cfg.upsert_vendor(id, station);
    cfg.save()?;

    println!("Saved {id} configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn fetch(
    vendor: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    tz: Option<&str>,
    out: &Path,
) -> Result<()> {
    let cfg = Config::load()?;
    let id = match vendor {
        Some(name) => VendorId::try_from(name)?,
        None => cfg.default_vendor_id()?,
    };
    let Some(station) = cfg.vendor_config(id) else {
        bail!(
            "Vendor '{id}' is not configured.\n\
             Hint: run `multiweather configure {id}` first."
        );
    };

    let mut request = station.to_request();
    if let Some(tz) = tz {
        request.tz = Some(tz.to_string());
    }
    let code = match request.tz.as_deref() {
        Some(code) => TzCode::try_from(code)?,
        None => bail!("No timezone configured for '{id}'; pass --tz or reconfigure the vendor."),
    };

    let start_utc = match start {
        Some(s) => parse_local(s, code)?,
        None => Utc::now() - Duration::hours(2),
    };
    let end_utc = match end {
        Some(s) => parse_local(s, code)?,
        None => start_utc + Duration::hours(1),
    };
    request.start_datetime = Some(start_utc);
    request.end_datetime = Some(end_utc);

    let readings = vendor::get_reading_for(id, &request).await?;

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;
    let path = out.join(format!("{id}.json"));
    let envelope = serde_json::to_string_pretty(&readings.raw)
        .context("Failed to serialize raw response envelope")?;
    fs::write(&path, envelope)
        .with_context(|| format!("Failed to write raw response: {}", path.display()))?;

    if readings.raw.is_success() {
        println!("{} records from {id}; raw response written to {}", readings.records.len(), path.display());
    } else {
        println!(
            "{id} request failed ({}): {}\nraw response written to {}",
            readings.raw.status_code,
            readings.raw.error_msg,
            path.display()
        );
    }
    for record in &readings.records {
        println!(
            "{}  atemp={}  pcpn={}  relh={}",
            record.data_datetime,
            fmt_value(record.atemp),
            fmt_value(record.pcpn),
            fmt_value(record.relh),
        );
    }

    Ok(())
}

fn parse_local(stamp: &str, code: TzCode) -> Result<DateTime<Utc>> {
    let naive = timezone::parse_flexible(stamp)
        .with_context(|| format!("Invalid date/time '{stamp}', expected YYYY-MM-DD HH:MM:SS"))?;
    Ok(timezone::local_to_utc(naive, code)?)
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
