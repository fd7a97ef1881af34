// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Startup configuration for the supervisor and its collaborators.
//!
//! Everything here is chosen once before the main loop starts and is never mutated afterwards.
//! The `Default` impls return the reference calibration.

/// Loop iterations between two battery checks.
pub const HEALTH_CHECK_PERIOD: u16 = 256;

/// Raw ADC samples summed per battery reading.
pub const BATTERY_SAMPLES: u8 = 7;

/// Divisor applied to the sample sum. Deliberately not equal to `BATTERY_SAMPLES`.
pub const BATTERY_DIVISOR: u16 = 5;

/// Readings below this are under-voltage (≈3.3 V with the reference sense divider).
pub const BATTERY_THRESHOLD: u16 = 745;

/// On/off cycles of the fail-safe alert.
pub const ALERT_CYCLES: u16 = 100;

/// Duration of one alert phase in milliseconds.
pub const ALERT_PHASE_MS: u16 = 100;

/// Baud rate of the command serial port.
pub const COMMAND_BAUD: u32 = 9600;

/// Battery sampling calibration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HealthConfig {
    pub samples: u8,
    pub divisor: u16,
    pub threshold: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            samples: BATTERY_SAMPLES,
            divisor: BATTERY_DIVISOR,
            threshold: BATTERY_THRESHOLD,
        }
    }
}

/// Fail-safe alert timing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AlertConfig {
    pub cycles: u16,
    pub phase_ms: u16,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cycles: ALERT_CYCLES,
            phase_ms: ALERT_PHASE_MS,
        }
    }
}

/// When the main loop re-arms the watchdog.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LivenessPolicy {
    /// Only after a non-zero command id was decoded. A silent link therefore ends in a
    /// watchdog reset.
    #[default]
    OnCommand,
    /// Once per loop iteration, whether or not a command arrived.
    EveryIteration,
}

/// Supervisor configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SupervisorConfig {
    pub health_period: u16,
    pub health: HealthConfig,
    pub alert: AlertConfig,
    pub liveness: LivenessPolicy,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            health_period: HEALTH_CHECK_PERIOD,
            health: HealthConfig::default(),
            alert: AlertConfig::default(),
            liveness: LivenessPolicy::default(),
        }
    }
}

/// Which serial port carries command frames.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SerialPort {
    /// The debug USART. Logging is unavailable in this mode.
    Primary,
    /// A dedicated second USART. The debug USART carries log output.
    #[default]
    Secondary,
}

/// Transport capabilities selected at startup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TransportConfig {
    pub port: SerialPort,
    pub baud: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: SerialPort::default(),
            baud: COMMAND_BAUD,
        }
    }
}
