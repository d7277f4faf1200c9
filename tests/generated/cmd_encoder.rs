//! Generated, do not edit!
//!
//! Encoders of every event, for tests that play the device side.
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

pub struct CmdEncoder;

impl CmdEncoder {
    /// States the drone can reach.
    pub fn commonCapabilitiesEncoder(statesBitField: u32) -> impl Fn(&mut crate::mock_arsdk::Cmd) -> i32 {
        move |wire_cmd| crate::mock_arsdk::cmd_enc::common_capabilities(wire_cmd, statesBitField as u8)
    }

    /// Charge level changed.
    pub fn batteryBatteryUpdateEncoder(level: usize) -> impl Fn(&mut crate::mock_arsdk::Cmd) -> i32 {
        move |wire_cmd| crate::mock_arsdk::cmd_enc::battery_battery_update(wire_cmd, level as u8)
    }

    /// Alert raised.
    pub fn batteryAlertChangedEncoder(alert: crate::arsdk_features::arsdk_feature_battery::ArsdkFeatureBatteryAlert) -> impl Fn(&mut crate::mock_arsdk::Cmd) -> i32 {
        move |wire_cmd| crate::mock_arsdk::cmd_enc::battery_alert_changed(wire_cmd, alert as i32)
    }
}
