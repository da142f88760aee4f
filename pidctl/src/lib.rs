//! Discrete-time PID controller over exact rational arithmetic.
//!
//! [`Controller`] is the core: every term is computed with [`BigRational`],
//! so the integral can accumulate for as long as the loop runs without
//! floating-point drift. [`ControllerF64`] converts at the boundary for
//! callers that work in `f64`.

pub mod controller;
pub mod error;
pub mod float64;
pub mod rational;
pub mod settings;

pub use controller::{ControlTerms, Controller, enforce_range};
pub use error::{Error, Result};
pub use float64::ControllerF64;
pub use settings::{Settings, Tuning};

pub use num_rational::BigRational;
pub use time::Duration;
