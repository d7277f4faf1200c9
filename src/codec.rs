//! Wire command buffer and the codec seam.
//!
//! Bindings never touch payload bytes themselves: they hand already-mapped arguments
//! to a [`WireCodec`] and get back a status. [`ArsdkCodec`] is a reference codec
//! (little endian, NUL-terminated strings, length-prefixed multisettings) used by the
//! runtime bindings, the tests and the tooling.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::dispatch::CommandKey;
use crate::dump::hex_string;
use crate::schema::{ArgType, IntType, Message};
use crate::value::Value;

pub const EINVAL: i32 = 22;
pub const EPROTO: i32 = 71;

/// Size of the command header: project id, class id, command id (u16).
pub const HEADER_LEN: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("{message}: expected {expected} arguments, got {actual}")]
    ArgCount {
        message: String,
        expected: usize,
        actual: usize,
    },
    #[error("{message}.{arg}: expected {expected}, got {actual}")]
    ArgType {
        message: String,
        arg: String,
        expected: String,
        actual: &'static str,
    },
    #[error("{message}.{arg}: {reason}")]
    InvalidArgument {
        message: String,
        arg: String,
        reason: String,
    },
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Header mismatch: expected {expected}, got {actual}")]
    HeaderMismatch { expected: CommandKey, actual: CommandKey },
}

impl CodecError {
    /// Negative errno-style status handed back through the bindings.
    pub fn status(&self) -> i32 {
        match self {
            CodecError::ArgCount { .. } | CodecError::ArgType { .. } | CodecError::InvalidArgument { .. } => {
                -EINVAL
            }
            CodecError::Io(_) | CodecError::Malformed(_) | CodecError::HeaderMismatch { .. } => -EPROTO,
        }
    }
}

/// Owned wire command: header triple plus payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cmd {
    pub prj_id: u8,
    pub cls_id: u8,
    pub cmd_id: u16,
    payload: Vec<u8>,
}

impl Cmd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triple packed as `prj << 24 | cls << 16 | cmd`.
    pub fn id(&self) -> u32 {
        u32::from(self.prj_id) << 24 | u32::from(self.cls_id) << 16 | u32::from(self.cmd_id)
    }

    pub fn key(&self) -> CommandKey {
        CommandKey::new(self.prj_id, self.cls_id, self.cmd_id)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Reset the buffer to an empty command addressed by `key`.
    pub fn reset(&mut self, key: CommandKey) {
        self.prj_id = key.feature_id;
        self.cls_id = key.class_id;
        self.cmd_id = key.cmd_id;
        self.payload.clear();
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.push(self.prj_id);
        out.push(self.cls_id);
        out.extend_from_slice(&self.cmd_id.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Cmd, CodecError> {
        let mut r = Cursor::new(bytes);
        let prj_id = r.read_u8()?;
        let cls_id = r.read_u8()?;
        let cmd_id = r.read_u16::<LittleEndian>()?;
        Ok(Cmd {
            prj_id,
            cls_id,
            cmd_id,
            payload: bytes[HEADER_LEN..].to_vec(),
        })
    }

    /// Header and raw payload, e.g. `3:0:7 [0a]`.
    pub fn describe(&self) -> String {
        format!(
            "{}:{}:{} [{}]",
            self.prj_id,
            self.cls_id,
            self.cmd_id,
            hex_string(&self.payload)
        )
    }
}

/// Packs and unpacks the arguments of one message.
pub trait WireCodec {
    /// Write `args` into `cmd`, addressed by `key`. On failure `cmd` content is unspecified.
    fn encode(&self, cmd: &mut Cmd, key: CommandKey, message: &Message, args: &[Value]) -> Result<(), CodecError>;

    /// Read every argument of `message` from `cmd`, which must be addressed by `key`.
    fn decode(&self, cmd: &Cmd, key: CommandKey, message: &Message) -> Result<Vec<Value>, CodecError>;
}

/// Reference little-endian codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArsdkCodec;

impl WireCodec for ArsdkCodec {
    fn encode(&self, cmd: &mut Cmd, key: CommandKey, message: &Message, args: &[Value]) -> Result<(), CodecError> {
        if args.len() != message.args.len() {
            return Err(CodecError::ArgCount {
                message: message.name.clone(),
                expected: message.args.len(),
                actual: args.len(),
            });
        }
        let mut payload = Vec::new();
        for (arg, value) in message.args.iter().zip(args) {
            if !value.fits(&arg.ty) {
                return Err(CodecError::ArgType {
                    message: message.name.clone(),
                    arg: arg.name.clone(),
                    expected: describe_type(&arg.ty),
                    actual: value.kind(),
                });
            }
            self.write_value(&mut payload, &arg.ty, value).map_err(|reason| CodecError::InvalidArgument {
                message: message.name.clone(),
                arg: arg.name.clone(),
                reason,
            })?;
        }
        cmd.reset(key);
        cmd.payload = payload;
        Ok(())
    }

    fn decode(&self, cmd: &Cmd, key: CommandKey, message: &Message) -> Result<Vec<Value>, CodecError> {
        if cmd.key() != key {
            return Err(CodecError::HeaderMismatch {
                expected: key,
                actual: cmd.key(),
            });
        }
        let mut r = Cursor::new(cmd.payload());
        message
            .args
            .iter()
            .map(|arg| self.read_value(&mut r, &arg.ty))
            .collect()
    }
}

impl ArsdkCodec {
    fn write_value(&self, w: &mut Vec<u8>, ty: &ArgType, v: &Value) -> Result<(), String> {
        let io = |e: std::io::Error| e.to_string();
        if let (ArgType::Bitfield { storage, .. }, Value::Bitfield(raw)) = (ty, v) {
            return write_bitfield(w, *storage, *raw).map_err(io);
        }
        match v {
            Value::U8(x) => w.write_u8(*x).map_err(io),
            Value::U16(x) => w.write_u16::<LittleEndian>(*x).map_err(io),
            Value::U32(x) => w.write_u32::<LittleEndian>(*x).map_err(io),
            Value::U64(x) => w.write_u64::<LittleEndian>(*x).map_err(io),
            Value::I8(x) => w.write_i8(*x).map_err(io),
            Value::I16(x) => w.write_i16::<LittleEndian>(*x).map_err(io),
            Value::I32(x) | Value::Enum(x) => w.write_i32::<LittleEndian>(*x).map_err(io),
            Value::I64(x) => w.write_i64::<LittleEndian>(*x).map_err(io),
            Value::Float(x) => w.write_f32::<LittleEndian>(*x).map_err(io),
            Value::Double(x) => w.write_f64::<LittleEndian>(*x).map_err(io),
            Value::Str(s) => {
                if s.contains('\0') {
                    return Err("string contains NUL".to_string());
                }
                w.write_all(s.as_bytes()).map_err(io)?;
                w.write_u8(0).map_err(io)
            }
            Value::Bitfield(_) => Err(format!("bitfield value for {}", describe_type(ty))),
            Value::MultiSetting(bytes) => {
                let len = u16::try_from(bytes.len())
                    .map_err(|_| format!("multisetting of {} bytes exceeds 65535", bytes.len()))?;
                w.write_u16::<LittleEndian>(len).map_err(io)?;
                w.write_all(bytes).map_err(io)
            }
        }
    }

    fn read_value(&self, r: &mut Cursor<&[u8]>, ty: &ArgType) -> Result<Value, CodecError> {
        Ok(match ty {
            ArgType::Int(it) => read_int(r, *it)?,
            ArgType::Float => Value::Float(r.read_f32::<LittleEndian>()?),
            ArgType::Double => Value::Double(r.read_f64::<LittleEndian>()?),
            ArgType::String => {
                let mut buf = Vec::new();
                loop {
                    match r.read_u8()? {
                        0 => break,
                        b => buf.push(b),
                    }
                }
                let s = String::from_utf8(buf).map_err(|e| CodecError::Malformed(e.to_string()))?;
                Value::Str(s)
            }
            ArgType::Enum(_) => Value::Enum(r.read_i32::<LittleEndian>()?),
            ArgType::Bitfield { storage, .. } => {
                let raw = match read_int(r, storage.unsigned())? {
                    Value::U8(x) => x as u64,
                    Value::U16(x) => x as u64,
                    Value::U32(x) => x as u64,
                    Value::U64(x) => x,
                    other => return Err(CodecError::Malformed(format!("bitfield read as {}", other.kind()))),
                };
                Value::Bitfield(raw)
            }
            ArgType::MultiSetting(_) => {
                let len = r.read_u16::<LittleEndian>()? as usize;
                let mut buf = vec![0u8; len];
                r.read_exact(&mut buf)?;
                Value::MultiSetting(buf)
            }
        })
    }
}

fn read_int(r: &mut Cursor<&[u8]>, it: IntType) -> Result<Value, CodecError> {
    Ok(match it {
        IntType::U8 => Value::U8(r.read_u8()?),
        IntType::U16 => Value::U16(r.read_u16::<LittleEndian>()?),
        IntType::U32 => Value::U32(r.read_u32::<LittleEndian>()?),
        IntType::U64 => Value::U64(r.read_u64::<LittleEndian>()?),
        IntType::I8 => Value::I8(r.read_i8()?),
        IntType::I16 => Value::I16(r.read_i16::<LittleEndian>()?),
        IntType::I32 => Value::I32(r.read_i32::<LittleEndian>()?),
        IntType::I64 => Value::I64(r.read_i64::<LittleEndian>()?),
    })
}

fn write_bitfield(w: &mut Vec<u8>, storage: IntType, raw: u64) -> std::io::Result<()> {
    match storage.bits() {
        8 => w.write_u8(raw as u8),
        16 => w.write_u16::<LittleEndian>(raw as u16),
        32 => w.write_u32::<LittleEndian>(raw as u32),
        _ => w.write_u64::<LittleEndian>(raw),
    }
}

fn describe_type(ty: &ArgType) -> String {
    match ty {
        ArgType::Int(it) => it.rust_name().to_string(),
        ArgType::Float => "float".to_string(),
        ArgType::Double => "double".to_string(),
        ArgType::String => "string".to_string(),
        ArgType::Enum(name) => format!("enum {}", name),
        ArgType::Bitfield { enumeration, storage } => format!("bitfield<{}> {}", storage.rust_name(), enumeration),
        ArgType::MultiSetting(name) => format!("multisetting {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message() -> Message {
        Message::event("state", 5)
            .arg("level", ArgType::Int(IntType::U8))
            .arg("name", ArgType::String)
            .arg("mode", ArgType::Enum("mode".into()))
            .arg(
                "modes",
                ArgType::Bitfield {
                    enumeration: "mode".into(),
                    storage: IntType::U16,
                },
            )
            .arg("settings", ArgType::MultiSetting("settings".into()))
            .arg("altitude", ArgType::Double)
    }

    fn args() -> Vec<Value> {
        vec![
            Value::U8(42),
            Value::Str("Drone1".into()),
            Value::Enum(7),
            Value::Bitfield(0b101),
            Value::MultiSetting(vec![9, 8, 7]),
            Value::Double(12.5),
        ]
    }

    #[test]
    fn payload_layout() {
        let key = CommandKey::new(3, 0, 5);
        let mut cmd = Cmd::new();
        ArsdkCodec.encode(&mut cmd, key, &message(), &args()).unwrap();
        assert_eq!(cmd.key(), key);
        assert_eq!(cmd.id(), 0x0300_0005);
        let p = cmd.payload();
        assert_eq!(p[0], 42);
        assert_eq!(&p[1..8], b"Drone1\0");
        assert_eq!(&p[8..12], &7i32.to_le_bytes());
        assert_eq!(&p[12..14], &[0b101, 0]);
        assert_eq!(&p[14..16], &[3, 0]);
        assert_eq!(&p[16..19], &[9, 8, 7]);
        assert_eq!(p.len(), 27);
        let decoded = ArsdkCodec.decode(&cmd, key, &message()).unwrap();
        assert_eq!(decoded, args());
    }

    #[test]
    fn bytes_roundtrip_keeps_header() {
        let key = CommandKey::new(1, 4, 300);
        let mut cmd = Cmd::new();
        ArsdkCodec.encode(&mut cmd, key, &message(), &args()).unwrap();
        let back = Cmd::from_bytes(&cmd.to_bytes()).unwrap();
        assert_eq!(back, cmd);
        assert!(Cmd::from_bytes(&[1, 2]).is_err());
    }

    #[test]
    fn argument_errors_are_einval() {
        let key = CommandKey::new(3, 0, 5);
        let mut cmd = Cmd::new();
        let err = ArsdkCodec.encode(&mut cmd, key, &message(), &[]).unwrap_err();
        assert_eq!(err.status(), -EINVAL);
        let mut bad = args();
        bad[0] = Value::U16(42);
        let err = ArsdkCodec.encode(&mut cmd, key, &message(), &bad).unwrap_err();
        assert!(matches!(err, CodecError::ArgType { .. }));
        assert_eq!(err.status(), -EINVAL);
        let mut bad = args();
        bad[1] = Value::Str("a\0b".into());
        assert_eq!(ArsdkCodec.encode(&mut cmd, key, &message(), &bad).unwrap_err().status(), -EINVAL);
    }

    #[test]
    fn truncated_and_misaddressed_are_eproto() {
        let key = CommandKey::new(3, 0, 5);
        let mut cmd = Cmd::new();
        ArsdkCodec.encode(&mut cmd, key, &message(), &args()).unwrap();
        let bytes = cmd.to_bytes();
        let short = Cmd::from_bytes(&bytes[..bytes.len() - 3]).unwrap();
        assert_eq!(ArsdkCodec.decode(&short, key, &message()).unwrap_err().status(), -EPROTO);
        let err = ArsdkCodec.decode(&cmd, CommandKey::new(3, 0, 6), &message()).unwrap_err();
        assert!(matches!(err, CodecError::HeaderMismatch { .. }));
        assert_eq!(err.status(), -EPROTO);
    }

    #[test]
    fn describe_shows_header_and_payload() {
        let m = Message::event("level", 7).arg("level", ArgType::Int(IntType::U8));
        let mut cmd = Cmd::new();
        ArsdkCodec
            .encode(&mut cmd, CommandKey::new(3, 0, 7), &m, &[Value::U8(10)])
            .unwrap();
        assert_eq!(cmd.describe(), "3:0:7 [0a]");
    }

    fn int_arg() -> impl Strategy<Value = (ArgType, Value)> {
        prop_oneof![
            any::<u8>().prop_map(|x| (ArgType::Int(IntType::U8), Value::U8(x))),
            any::<u16>().prop_map(|x| (ArgType::Int(IntType::U16), Value::U16(x))),
            any::<u32>().prop_map(|x| (ArgType::Int(IntType::U32), Value::U32(x))),
            any::<u64>().prop_map(|x| (ArgType::Int(IntType::U64), Value::U64(x))),
            any::<i8>().prop_map(|x| (ArgType::Int(IntType::I8), Value::I8(x))),
            any::<i16>().prop_map(|x| (ArgType::Int(IntType::I16), Value::I16(x))),
            any::<i32>().prop_map(|x| (ArgType::Int(IntType::I32), Value::I32(x))),
            any::<i64>().prop_map(|x| (ArgType::Int(IntType::I64), Value::I64(x))),
        ]
    }

    fn bitfield_arg() -> impl Strategy<Value = (ArgType, Value)> {
        let storage = prop_oneof![
            Just(IntType::U8),
            Just(IntType::U16),
            Just(IntType::U32),
            Just(IntType::U64),
            Just(IntType::I16),
        ];
        (storage, any::<u64>()).prop_map(|(storage, raw)| {
            let bits = storage.bits();
            let raw = if bits == 64 { raw } else { raw & ((1u64 << bits) - 1) };
            let ty = ArgType::Bitfield {
                enumeration: "mode".into(),
                storage,
            };
            (ty, Value::Bitfield(raw))
        })
    }

    fn other_arg() -> impl Strategy<Value = (ArgType, Value)> {
        prop_oneof![
            (-1.0e30f32..1.0e30f32).prop_map(|x| (ArgType::Float, Value::Float(x))),
            (-1.0e300f64..1.0e300f64).prop_map(|x| (ArgType::Double, Value::Double(x))),
            "\\PC{0,24}".prop_map(|s| (ArgType::String, Value::Str(s))),
            any::<i32>().prop_map(|x| (ArgType::Enum("mode".into()), Value::Enum(x))),
            prop::collection::vec(any::<u8>(), 0..64)
                .prop_map(|b| (ArgType::MultiSetting("settings".into()), Value::MultiSetting(b))),
        ]
    }

    fn typed_value() -> impl Strategy<Value = (ArgType, Value)> {
        prop_oneof![int_arg(), bitfield_arg(), other_arg()]
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(fields in prop::collection::vec(typed_value(), 0..8), cmd_id in any::<u16>()) {
            let key = CommandKey::new(7, 2, cmd_id);
            let mut m = Message::event("random", cmd_id);
            for (i, (ty, _)) in fields.iter().enumerate() {
                m = m.arg(&format!("a{}", i), ty.clone());
            }
            let values: Vec<Value> = fields.into_iter().map(|(_, v)| v).collect();
            let mut cmd = Cmd::new();
            prop_assert!(ArsdkCodec.encode(&mut cmd, key, &m, &values).is_ok());
            let back = Cmd::from_bytes(&cmd.to_bytes()).unwrap();
            prop_assert_eq!(ArsdkCodec.decode(&back, key, &m).unwrap(), values);
        }
    }
}
