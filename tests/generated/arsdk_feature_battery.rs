//! Generated, do not edit!
//!
//! Battery status.
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

#[path = "arsdk_feature_battery_impl.rs"]
mod imp;

/// Registration id of [`ArsdkFeatureBattery`]: feature id * 256 + class id.
pub const ARSDK_FEATURE_BATTERY_UID: u16 = 0x0300;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArsdkFeatureBatteryAlert {
    ArsdkFeatureBatteryAlertNone = 0,
    ArsdkFeatureBatteryAlertLowPower = 1,
    ArsdkFeatureBatteryAlertCritical = 2,
    /// Value not known when these bindings were generated.
    ArsdkFeatureBatteryAlertSdkCoreUnknown = -1,
}

/// Number of declared values of [`ArsdkFeatureBatteryAlert`].
pub const ArsdkFeatureBatteryAlertCnt: usize = 3;

/// Event handlers of [`ArsdkFeatureBattery`]. Every handler is optional; the default does nothing.
pub trait ArsdkFeatureBatteryCallback {
    /// Charge level changed.
    fn onBatteryUpdate(&mut self, level: usize) {}

    /// Alert raised.
    fn onAlertChanged(&mut self, alert: ArsdkFeatureBatteryAlert) {}
}

/// Encoders and decode dispatcher of `battery`.
pub struct ArsdkFeatureBattery;
