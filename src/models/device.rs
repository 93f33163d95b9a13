//! Terminal device model.
//!
//! Devices originate tasks. Their weights decide how much delay and energy
//! each count in the objective; mobile devices care about battery, fixed
//! ones only about latency.

use serde::{Deserialize, Serialize};

/// A terminal device (sensor, robot controller, mobile client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalDevice {
    /// Unique device identifier.
    pub id: String,
    /// Power drawn while transmitting (W).
    pub transmission_power: f64,
    /// Power drawn while waiting for remote execution (W).
    pub idle_power: f64,
    /// Battery-powered device.
    pub is_mobile: bool,
    /// Weight of delay in the objective.
    pub delay_weight: f64,
    /// Weight of energy in the objective.
    pub energy_weight: f64,
    /// Remaining battery energy (J). `None` = mains powered.
    pub residual_energy: Option<f64>,
    /// Local CPU rate (Hz), if the device can process tasks itself.
    pub computing_resource: Option<f64>,
}

impl TerminalDevice {
    /// Default delay/energy weights of a mobile device.
    pub const MOBILE_WEIGHTS: (f64, f64) = (0.7, 0.3);
    /// Default delay/energy weights of a fixed device.
    pub const FIXED_WEIGHTS: (f64, f64) = (1.0, 0.0);

    /// Creates a battery-powered device with mobile weights.
    pub fn mobile(
        id: impl Into<String>,
        transmission_power: f64,
        idle_power: f64,
        residual_energy: f64,
    ) -> Self {
        let (delay_weight, energy_weight) = Self::MOBILE_WEIGHTS;
        Self {
            id: id.into(),
            transmission_power,
            idle_power,
            is_mobile: true,
            delay_weight,
            energy_weight,
            residual_energy: Some(residual_energy),
            computing_resource: None,
        }
    }

    /// Creates a mains-powered device with fixed weights.
    pub fn fixed(id: impl Into<String>, transmission_power: f64, idle_power: f64) -> Self {
        let (delay_weight, energy_weight) = Self::FIXED_WEIGHTS;
        Self {
            id: id.into(),
            transmission_power,
            idle_power,
            is_mobile: false,
            delay_weight,
            energy_weight,
            residual_energy: None,
            computing_resource: None,
        }
    }

    /// Overrides the objective weights.
    pub fn with_weights(mut self, delay_weight: f64, energy_weight: f64) -> Self {
        self.delay_weight = delay_weight;
        self.energy_weight = energy_weight;
        self
    }

    /// Sets the local CPU rate (Hz).
    pub fn with_computing_resource(mut self, hz: f64) -> Self {
        self.computing_resource = Some(hz);
        self
    }

    /// Whether the battery can cover `joules` (always true for fixed devices).
    pub fn can_afford(&self, joules: f64) -> bool {
        match self.residual_energy {
            None => true,
            Some(remaining) => remaining >= joules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_defaults() {
        let d = TerminalDevice::mobile("D1", 0.5, 0.1, 1000.0);
        assert!(d.is_mobile);
        assert!((d.delay_weight - 0.7).abs() < 1e-12);
        assert!((d.energy_weight - 0.3).abs() < 1e-12);
        assert_eq!(d.residual_energy, Some(1000.0));
    }

    #[test]
    fn test_fixed_defaults() {
        let d = TerminalDevice::fixed("D2", 1.0, 0.2);
        assert!(!d.is_mobile);
        assert!((d.delay_weight - 1.0).abs() < 1e-12);
        assert!((d.energy_weight - 0.0).abs() < 1e-12);
        assert!(d.residual_energy.is_none());
        assert!(d.can_afford(f64::MAX));
    }

    #[test]
    fn test_battery_budget() {
        let d = TerminalDevice::mobile("D1", 0.5, 0.1, 10.0);
        assert!(d.can_afford(10.0));
        assert!(!d.can_afford(10.5));
    }

    #[test]
    fn test_weight_override() {
        let d = TerminalDevice::fixed("D", 1.0, 0.1)
            .with_weights(0.5, 0.5)
            .with_computing_resource(5.0e8);
        assert!((d.energy_weight - 0.5).abs() < 1e-12);
        assert_eq!(d.computing_resource, Some(5.0e8));
    }
}
