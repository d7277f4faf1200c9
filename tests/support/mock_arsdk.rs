//! In-memory stand-in for the `arsdk` codec, covering the wire functions of
//! `tests/generated/features.schema`.

use arsdkgen::codec::{EINVAL, EPROTO};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cmd {
    pub prj_id: u8,
    pub cls_id: u8,
    pub cmd_id: u16,
    pub payload: Vec<u8>,
}

impl Cmd {
    pub fn addressed(prj_id: u8, cls_id: u8, cmd_id: u16) -> Self {
        Cmd {
            prj_id,
            cls_id,
            cmd_id,
            payload: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        u32::from(self.prj_id) << 24 | u32::from(self.cls_id) << 16 | u32::from(self.cmd_id)
    }

    pub fn describe(&self) -> String {
        format!("{}:{}:{} {:?}", self.prj_id, self.cls_id, self.cmd_id, self.payload)
    }
}

pub mod cmd_enc {
    use super::*;

    pub fn common_set_name(cmd: &mut Cmd, name: &str) -> i32 {
        if name.contains('\0') {
            return -EINVAL;
        }
        *cmd = Cmd::addressed(0, 0, 1);
        cmd.payload.extend_from_slice(name.as_bytes());
        cmd.payload.push(0);
        0
    }

    pub fn common_capabilities(cmd: &mut Cmd, states: u8) -> i32 {
        *cmd = Cmd::addressed(0, 0, 3);
        cmd.payload.push(states);
        0
    }

    pub fn battery_battery_update(cmd: &mut Cmd, level: u8) -> i32 {
        *cmd = Cmd::addressed(3, 0, 7);
        cmd.payload.push(level);
        0
    }

    pub fn battery_alert_changed(cmd: &mut Cmd, alert: i32) -> i32 {
        *cmd = Cmd::addressed(3, 0, 8);
        cmd.payload.extend_from_slice(&alert.to_le_bytes());
        0
    }
}

pub mod cmd_dec {
    use super::*;

    pub fn common_set_name<'a>(cmd: &'a Cmd, name: &mut &'a str) -> i32 {
        let Some(end) = cmd.payload.iter().position(|b| *b == 0) else {
            return -EPROTO;
        };
        match std::str::from_utf8(&cmd.payload[..end]) {
            Ok(s) => {
                *name = s;
                0
            }
            Err(_) => -EPROTO,
        }
    }

    pub fn common_capabilities(cmd: &Cmd, states: &mut u8) -> i32 {
        read_u8(cmd, states)
    }

    pub fn battery_battery_update(cmd: &Cmd, level: &mut u8) -> i32 {
        read_u8(cmd, level)
    }

    pub fn battery_alert_changed(cmd: &Cmd, alert: &mut i32) -> i32 {
        match cmd.payload.get(..4) {
            Some(&[a, b, c, d]) => {
                *alert = i32::from_le_bytes([a, b, c, d]);
                0
            }
            _ => -EPROTO,
        }
    }

    fn read_u8(cmd: &Cmd, out: &mut u8) -> i32 {
        match cmd.payload.first() {
            Some(b) => {
                *out = *b;
                0
            }
            None => -EPROTO,
        }
    }
}
