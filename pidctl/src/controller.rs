use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use time::Duration;

/// Breakdown of a single [`Controller::accumulate_terms`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTerms {
    pub proportional: BigRational,
    /// The accumulated integral after clamping, as stored for the next call.
    pub integral: BigRational,
    /// Derivative contribution, already scaled by `D`.
    pub derivative: BigRational,
    /// Sum of the three terms after range enforcement.
    pub output: BigRational,
}

/// PID controller over exact rationals.
///
/// Gains, setpoint and rolling state left unset are zero-filled once, before
/// the first computation. `min` and `max` are never defaulted: `None` means
/// the output is unbounded on that side.
///
/// A controller belongs to one control loop. `ensure_initialized` and
/// `accumulate` take `&mut self`, so first use is already exclusive; sharing
/// one instance across threads requires an external lock around each call.
#[derive(Debug, Clone)]
pub struct Controller {
    p: Option<BigRational>,
    i: Option<BigRational>,
    d: Option<BigRational>,
    setpoint: Option<BigRational>,
    min: Option<BigRational>,
    max: Option<BigRational>,
    cycle: Duration,

    previous_measurement: Option<BigRational>,
    accumulated_integral: Option<BigRational>,
    initialized: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            p: None,
            i: None,
            d: None,
            setpoint: None,
            min: None,
            max: None,
            cycle: Duration::SECOND,
            previous_measurement: None,
            accumulated_integral: None,
            initialized: false,
        }
    }
}

impl Controller {
    pub fn new(p: BigRational, i: BigRational, d: BigRational, setpoint: BigRational) -> Self {
        Self {
            p: Some(p),
            i: Some(i),
            d: Some(d),
            setpoint: Some(setpoint),
            ..Default::default()
        }
    }

    pub fn with_min(mut self, min: BigRational) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: BigRational) -> Self {
        self.max = Some(max);
        self
    }

    /// Fixed sampling period assumed by [`Controller::compute`].
    pub fn with_cycle(mut self, cycle: Duration) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn set_p(&mut self, p: BigRational) {
        self.p = Some(p);
    }

    pub fn set_i(&mut self, i: BigRational) {
        self.i = Some(i);
    }

    pub fn set_d(&mut self, d: BigRational) {
        self.d = Some(d);
    }

    pub fn set_setpoint(&mut self, setpoint: BigRational) {
        self.setpoint = Some(setpoint);
    }

    pub fn set_min(&mut self, min: Option<BigRational>) {
        self.min = min;
    }

    pub fn set_max(&mut self, max: Option<BigRational>) {
        self.max = max;
    }

    pub fn set_cycle(&mut self, cycle: Duration) {
        self.cycle = cycle;
    }

    pub fn p(&self) -> Option<&BigRational> {
        self.p.as_ref()
    }

    pub fn i(&self) -> Option<&BigRational> {
        self.i.as_ref()
    }

    pub fn d(&self) -> Option<&BigRational> {
        self.d.as_ref()
    }

    pub fn setpoint(&self) -> Option<&BigRational> {
        self.setpoint.as_ref()
    }

    pub fn min(&self) -> Option<&BigRational> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&BigRational> {
        self.max.as_ref()
    }

    pub fn cycle(&self) -> Duration {
        self.cycle
    }

    pub fn previous_measurement(&self) -> Option<&BigRational> {
        self.previous_measurement.as_ref()
    }

    pub fn accumulated_integral(&self) -> Option<&BigRational> {
        self.accumulated_integral.as_ref()
    }

    /// Zero-fills unset gains, setpoint and rolling state. Runs its body at
    /// most once per instance; values already present are left untouched.
    pub fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }

        for slot in [
            &mut self.p,
            &mut self.i,
            &mut self.d,
            &mut self.setpoint,
            &mut self.previous_measurement,
            &mut self.accumulated_integral,
        ] {
            slot.get_or_insert_with(BigRational::zero);
        }
        self.initialized = true;

        tracing::debug!("PID controller state initialized");
    }

    /// Feeds one measurement taken `elapsed` after the previous one and
    /// returns the next control output.
    pub fn accumulate(&mut self, measurement: BigRational, elapsed: Duration) -> BigRational {
        self.accumulate_terms(measurement, elapsed).output
    }

    /// Same as [`Controller::accumulate`] with the configured fixed cycle.
    pub fn compute(&mut self, measurement: BigRational) -> BigRational {
        let cycle = self.cycle;
        self.accumulate(measurement, cycle)
    }

    pub fn accumulate_terms(
        &mut self,
        measurement: BigRational,
        elapsed: Duration,
    ) -> ControlTerms {
        self.ensure_initialized();

        let zero = BigRational::zero();
        let previous = self
            .previous_measurement
            .replace(measurement.clone())
            .unwrap_or_else(BigRational::zero);
        // Sub-second remainders are dropped, truncating toward zero.
        let dt = BigRational::from_integer(BigInt::from(elapsed.whole_seconds()));

        let p = self.p.as_ref().unwrap_or(&zero);
        let i = self.i.as_ref().unwrap_or(&zero);
        let d = self.d.as_ref().unwrap_or(&zero);
        let setpoint = self.setpoint.as_ref().unwrap_or(&zero);

        let error = setpoint - &measurement;

        let proportional = p * &error;

        // The stored sum itself is clamped to avoid integral windup.
        let previous_integral = self
            .accumulated_integral
            .take()
            .unwrap_or_else(BigRational::zero);
        let integral = &error * &dt * i + previous_integral;
        let integral = enforce_range(integral, self.min.as_ref(), self.max.as_ref());
        self.accumulated_integral = Some(integral.clone());

        let derivative = if dt.is_positive() {
            -((&measurement - &previous) / &dt)
        } else {
            BigRational::zero()
        };
        let derivative = derivative * d;

        let output = &proportional + &integral + &derivative;
        let output = enforce_range(output, self.min.as_ref(), self.max.as_ref());

        tracing::trace!(
            %measurement,
            %error,
            %dt,
            %proportional,
            %integral,
            %derivative,
            %output,
            "PID accumulate"
        );

        ControlTerms {
            proportional,
            integral,
            derivative,
            output,
        }
    }

    /// Zeroes the previous measurement and the accumulated integral. Gains,
    /// setpoint and bounds are kept.
    pub fn reset(&mut self) {
        self.ensure_initialized();
        self.previous_measurement = Some(BigRational::zero());
        self.accumulated_integral = Some(BigRational::zero());
        tracing::debug!("PID controller state reset");
    }
}

/// Bounds `value` to `[min, max]`. `max` is checked first, so it wins when
/// `min > max`.
pub fn enforce_range(
    value: BigRational,
    min: Option<&BigRational>,
    max: Option<&BigRational>,
) -> BigRational {
    match (min, max) {
        (_, Some(max)) if value > *max => max.clone(),
        (Some(min), _) if value < *min => min.clone(),
        _ => value,
    }
}
