use std::env;
use std::fmt;
use std::path::Path;

use config::{Config, Environment, File};
use num_rational::BigRational;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de::{self, Visitor};
use time::Duration;

use crate::controller::Controller;
use crate::error::Result;
use crate::rational;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// An exact rational read from configuration.
///
/// Accepts integers, floats and strings such as `"1/3"` or `"0.1"`. Floats are
/// read through their shortest decimal text, so `0.1` is exactly one tenth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exact(pub BigRational);

impl Exact {
    pub fn into_inner(self) -> BigRational {
        self.0
    }
}

impl Serialize for Exact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Exact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExactVisitor)
    }
}

struct ExactVisitor;

impl Visitor<'_> for ExactVisitor {
    type Value = Exact;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer, a finite float or a rational string such as \"1/3\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Exact, E> {
        Ok(Exact(BigRational::from_integer(v.into())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Exact, E> {
        Ok(Exact(BigRational::from_integer(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Exact, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("non-finite value {v}")));
        }
        self.visit_str(&v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Exact, E> {
        rational::parse(v).map(Exact).map_err(E::custom)
    }
}

fn default_cycle_secs() -> i64 {
    1
}

/// Gains, setpoint and bounds of one controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub p: Option<Exact>,
    #[serde(default)]
    pub i: Option<Exact>,
    #[serde(default)]
    pub d: Option<Exact>,
    #[serde(default)]
    pub setpoint: Option<Exact>,
    #[serde(default)]
    pub min: Option<Exact>,
    #[serde(default)]
    pub max: Option<Exact>,
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: i64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            p: None,
            i: None,
            d: None,
            setpoint: None,
            min: None,
            max: None,
            cycle_secs: default_cycle_secs(),
        }
    }
}

impl Tuning {
    /// Builds a controller; values missing here are zero-filled on first use.
    pub fn build(&self) -> Controller {
        let mut controller = Controller::default().with_cycle(Duration::seconds(self.cycle_secs));

        if let Some(Exact(p)) = &self.p {
            controller.set_p(p.clone());
        }
        if let Some(Exact(i)) = &self.i {
            controller.set_i(i.clone());
        }
        if let Some(Exact(d)) = &self.d {
            controller.set_d(d.clone());
        }
        if let Some(Exact(setpoint)) = &self.setpoint {
            controller.set_setpoint(setpoint.clone());
        }
        controller.set_min(self.min.clone().map(Exact::into_inner));
        controller.set_max(self.max.clone().map(Exact::into_inner));

        controller
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub controller: Tuning,
}

impl Settings {
    /// Loads `configs/default`, the optional `configs/{RUN_MODE}` overlay and
    /// `PIDCTL__*` environment overrides, in that order.
    pub fn new() -> Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Self::from_dir("configs", &run_mode)
    }

    /// Same load order as [`Settings::new`], rooted at `dir`.
    pub fn from_dir(dir: impl AsRef<Path>, run_mode: &str) -> Result<Self> {
        let dir = dir.as_ref();

        let settings: Settings = Config::builder()
            .add_source(File::from(dir.join("default")))
            .add_source(File::from(dir.join(run_mode)).required(false))
            .add_source(
                Environment::with_prefix("PIDCTL")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        tracing::info!(dir = %dir.display(), run_mode = %run_mode, "Loaded controller settings");

        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        tracing::info!(path = %path.display(), "Loaded controller settings");

        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
