//! Generated, do not edit!
//!
//! Settings common to every product.
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

#[path = "arsdk_feature_common_impl.rs"]
mod imp;

/// Registration id of [`ArsdkFeatureCommon`]: feature id * 256 + class id.
pub const ARSDK_FEATURE_COMMON_UID: u16 = 0x0000;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArsdkFeatureCommonFlyingState {
    ArsdkFeatureCommonFlyingStateIdle = 0,
    ArsdkFeatureCommonFlyingStateFlying = 1,
    ArsdkFeatureCommonFlyingStateLanding = 2,
    /// Value not known when these bindings were generated.
    ArsdkFeatureCommonFlyingStateSdkCoreUnknown = -1,
}

/// Number of declared values of [`ArsdkFeatureCommonFlyingState`].
pub const ArsdkFeatureCommonFlyingStateCnt: usize = 3;

/// [`ArsdkFeatureCommonFlyingState`] values seen as flags, one bit per declaration position.
pub struct ArsdkFeatureCommonFlyingStateBitField;

/// Storage of a [`ArsdkFeatureCommonFlyingState`] bitfield.
pub type ArsdkFeatureCommonFlyingStateBitFieldRepr = u32;

/// Event handlers of [`ArsdkFeatureCommon`]. Every handler is optional; the default does nothing.
pub trait ArsdkFeatureCommonCallback {
    /// States the drone can reach.
    fn onCapabilities(&mut self, statesBitField: u32) {}
}

/// Encoders and decode dispatcher of `common`.
pub struct ArsdkFeatureCommon;
