//! Generated, do not edit!
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

use super::*;

impl ArsdkFeatureBatteryAlert {
    /// Declared values, in declaration order.
    pub const VALUES: [ArsdkFeatureBatteryAlert; 3] = [ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertNone, ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertLowPower, ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertCritical];

    /// Value for wire value `raw`; the unknown sentinel when `raw` was not declared.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertNone,
            1 => ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertLowPower,
            2 => ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertCritical,
            _ => ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertSdkCoreUnknown,
        }
    }

    /// Position in declaration order; `None` for the unknown sentinel.
    pub fn ordinal(self) -> Option<usize> {
        match self {
            ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertNone => Some(0),
            ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertLowPower => Some(1),
            ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertCritical => Some(2),
            ArsdkFeatureBatteryAlert::ArsdkFeatureBatteryAlertSdkCoreUnknown => None,
        }
    }
}

impl ArsdkFeatureBattery {
    /// Decode `command` and invoke the matching handler of `callback`.
    ///
    /// Returns the command id, -1 when `command` is absent or not addressed to this unit,
    /// or the codec's negative status when decoding fails.
    pub fn decode(command: Option<&crate::mock_arsdk::Cmd>, callback: &mut dyn ArsdkFeatureBatteryCallback) -> i32 {
        let Some(command) = command else {
            return -1;
        };
        if command.prj_id != 3 || command.cls_id != 0 {
            return -1;
        }
        let dec_res = match command.cmd_id {
            7 => callBatteryUpdate(command, callback),
            8 => callAlertChanged(command, callback),
            _ => return -1,
        };
        if dec_res < 0 { dec_res } else { i32::from(command.cmd_id) }
    }
}

fn callBatteryUpdate(wire_cmd: &crate::mock_arsdk::Cmd, event_callback: &mut dyn ArsdkFeatureBatteryCallback) -> i32 {
    let mut level: u8 = 0;
    let dec_res = crate::mock_arsdk::cmd_dec::battery_battery_update(wire_cmd, &mut level);
    if dec_res < 0 {
        return dec_res;
    }
    event_callback.onBatteryUpdate(level as usize);
    0
}

fn callAlertChanged(wire_cmd: &crate::mock_arsdk::Cmd, event_callback: &mut dyn ArsdkFeatureBatteryCallback) -> i32 {
    let mut alert: i32 = 0;
    let dec_res = crate::mock_arsdk::cmd_dec::battery_alert_changed(wire_cmd, &mut alert);
    if dec_res < 0 {
        return dec_res;
    }
    event_callback.onAlertChanged(ArsdkFeatureBatteryAlert::from_raw(alert));
    0
}
