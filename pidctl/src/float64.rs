use time::Duration;

use crate::controller::Controller;
use crate::error::Result;
use crate::rational::{from_f64, to_f64};

/// [`Controller`] with `f64` inputs and outputs.
///
/// Values are converted exactly on the way in and rounded to the nearest
/// `f64` on the way out; all arithmetic in between stays exact.
#[derive(Debug)]
pub struct ControllerF64 {
    controller: Controller,
}

impl ControllerF64 {
    pub fn new(p: f64, i: f64, d: f64, setpoint: f64) -> Result<Self> {
        let mut controller =
            Controller::new(from_f64(p)?, from_f64(i)?, from_f64(d)?, from_f64(setpoint)?);
        controller.ensure_initialized();

        Ok(Self { controller })
    }

    pub fn set_setpoint(&mut self, setpoint: f64) -> Result<&mut Self> {
        self.controller.set_setpoint(from_f64(setpoint)?);
        Ok(self)
    }

    pub fn set_min(&mut self, min: f64) -> Result<&mut Self> {
        self.controller.set_min(Some(from_f64(min)?));
        Ok(self)
    }

    pub fn set_max(&mut self, max: f64) -> Result<&mut Self> {
        self.controller.set_max(Some(from_f64(max)?));
        Ok(self)
    }

    pub fn clear_min(&mut self) -> &mut Self {
        self.controller.set_min(None);
        self
    }

    pub fn clear_max(&mut self) -> &mut Self {
        self.controller.set_max(None);
        self
    }

    /// Feeds a measurement assuming the controller's fixed cycle elapsed.
    pub fn compute(&mut self, pv: f64) -> Result<f64> {
        let output = self.controller.compute(from_f64(pv)?);
        to_f64(&output)
    }

    pub fn accumulate(&mut self, pv: f64, elapsed: Duration) -> Result<f64> {
        let output = self.controller.accumulate(from_f64(pv)?, elapsed);
        to_f64(&output)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }
}

impl From<Controller> for ControllerF64 {
    fn from(mut controller: Controller) -> Self {
        controller.ensure_initialized();
        Self { controller }
    }
}
