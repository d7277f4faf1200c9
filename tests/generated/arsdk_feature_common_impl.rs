//! Generated, do not edit!
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

use super::*;

impl ArsdkFeatureCommonFlyingState {
    /// Declared values, in declaration order.
    pub const VALUES: [ArsdkFeatureCommonFlyingState; 3] = [ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateIdle, ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateFlying, ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateLanding];

    /// Value for wire value `raw`; the unknown sentinel when `raw` was not declared.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateIdle,
            1 => ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateFlying,
            2 => ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateLanding,
            _ => ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateSdkCoreUnknown,
        }
    }

    /// Position in declaration order; `None` for the unknown sentinel.
    pub fn ordinal(self) -> Option<usize> {
        match self {
            ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateIdle => Some(0),
            ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateFlying => Some(1),
            ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateLanding => Some(2),
            ArsdkFeatureCommonFlyingState::ArsdkFeatureCommonFlyingStateSdkCoreUnknown => None,
        }
    }
}

impl ArsdkFeatureCommonFlyingStateBitField {
    /// `val` is set in `bitfield`.
    pub fn isSet(val: ArsdkFeatureCommonFlyingState, bitfield: u32) -> bool {
        match val.ordinal() {
            Some(ordinal) => bitfield & (1u32 << ordinal) != 0,
            None => false,
        }
    }

    /// Calls `f` once per value set in `bitfield`, in declaration order.
    pub fn forAllSetIn(bitfield: u32, mut f: impl FnMut(ArsdkFeatureCommonFlyingState)) {
        for val in ArsdkFeatureCommonFlyingState::VALUES {
            if Self::isSet(val, bitfield) {
                f(val);
            }
        }
    }
}

impl ArsdkFeatureCommon {
    /// Rename the drone.
    pub fn setNameEncoder(name: String) -> impl Fn(&mut crate::mock_arsdk::Cmd) -> i32 {
        move |wire_cmd| crate::mock_arsdk::cmd_enc::common_set_name(wire_cmd, name.as_str())
    }

    /// Decode `command` and invoke the matching handler of `callback`.
    ///
    /// Returns the command id, -1 when `command` is absent or not addressed to this unit,
    /// or the codec's negative status when decoding fails.
    pub fn decode(command: Option<&crate::mock_arsdk::Cmd>, callback: &mut dyn ArsdkFeatureCommonCallback) -> i32 {
        let Some(command) = command else {
            return -1;
        };
        if command.prj_id != 0 || command.cls_id != 0 {
            return -1;
        }
        let dec_res = match command.cmd_id {
            3 => callCapabilities(command, callback),
            _ => return -1,
        };
        if dec_res < 0 { dec_res } else { i32::from(command.cmd_id) }
    }
}

fn callCapabilities(wire_cmd: &crate::mock_arsdk::Cmd, event_callback: &mut dyn ArsdkFeatureCommonCallback) -> i32 {
    let mut statesBitField: u8 = 0;
    let dec_res = crate::mock_arsdk::cmd_dec::common_capabilities(wire_cmd, &mut statesBitField);
    if dec_res < 0 {
        return dec_res;
    }
    event_callback.onCapabilities(statesBitField as u32);
    0
}
