//! Generated, do not edit!
//!
//! Expected commands: reference commands built from literal arguments and
//! matched against the commands sent by the code under test.
#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]

/// Command expected by a test.
pub trait ExpectedCmd {
    /// Reference wire command.
    fn cmd(&self) -> &crate::mock_arsdk::Cmd;

    /// Same command id as [`ExpectedCmd::cmd`]; with `check_params`, also equal arguments.
    fn matches(&self, cmd: &crate::mock_arsdk::Cmd, check_params: bool) -> bool;

    /// Full contents of the reference command.
    fn describe(&self) -> String {
        self.cmd().describe()
    }
}

/// Rename the drone.
pub struct ExpectedCmdCommonSetName {
    cmd: crate::mock_arsdk::Cmd,
}

impl ExpectedCmdCommonSetName {
    /// `None` when the codec rejects the arguments.
    pub fn new(name: String) -> Option<Self> {
        let mut wire_cmd = crate::mock_arsdk::Cmd::default();
        let enc_res = crate::arsdk_features::arsdk_feature_common::ArsdkFeatureCommon::setNameEncoder(name)(&mut wire_cmd);
        if enc_res < 0 {
            return None;
        }
        Some(ExpectedCmdCommonSetName { cmd: wire_cmd })
    }
}

impl ExpectedCmd for ExpectedCmdCommonSetName {
    fn cmd(&self) -> &crate::mock_arsdk::Cmd {
        &self.cmd
    }

    fn matches(&self, cmd: &crate::mock_arsdk::Cmd, check_params: bool) -> bool {
        if cmd.id() != self.cmd.id() {
            return false;
        }
        if !check_params {
            return true;
        }
        let mut expected_name: &str = "";
        if crate::mock_arsdk::cmd_dec::common_set_name(&self.cmd, &mut expected_name) < 0 {
            return false;
        }
        let mut actual_name: &str = "";
        if crate::mock_arsdk::cmd_dec::common_set_name(cmd, &mut actual_name) < 0 {
            return false;
        }
        expected_name == actual_name
    }
}

/// Boxed [`ExpectedCmdCommonSetName`].
pub fn commonSetName(name: String) -> Option<Box<dyn ExpectedCmd>> {
    ExpectedCmdCommonSetName::new(name).map(|e| Box::new(e) as Box<dyn ExpectedCmd>)
}
