//! Generated, do not edit!
//!
//! Every feature binding generated from the schema.
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

#[path = "arsdk_feature_common.rs"]
pub mod arsdk_feature_common;

#[path = "arsdk_feature_battery.rs"]
pub mod arsdk_feature_battery;

#[path = "arsdk_features_uids.rs"]
mod uids;
pub use uids::FEATURE_UIDS;
