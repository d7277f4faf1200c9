//! Generated, do not edit!
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

use super::*;

/// Uid and name of every generated unit, ascending Uid.
pub const FEATURE_UIDS: &[(u16, &str)] = &[
    (arsdk_feature_common::ARSDK_FEATURE_COMMON_UID, "common"),
    (arsdk_feature_battery::ARSDK_FEATURE_BATTERY_UID, "battery"),
];
