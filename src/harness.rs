//! Verification harness emitter: `expected_cmd.rs` (one matcher per command) and
//! `cmd_encoder.rs` (encoders for every event, for tests playing the device side).
//!
//! Both files live outside the bindings and reach generated types through
//! [`GenConfig::bindings_path`].

use crate::config::GenConfig;
use crate::dispatch::FeatureTables;
use crate::emit::{message_doc, Emitter, ALLOW, HEADER};
use crate::naming;
use crate::schema::{Arg, FeatureUnit, Message, Schema};
use crate::types::{compare_policy, ComparePolicy, Scope};
use crate::writer::Writer;

pub const EXPECTED_CMD_FILE: &str = "expected_cmd.rs";
pub const CMD_ENCODER_FILE: &str = "cmd_encoder.rs";

/// File name prefixes owned by the harness, for stale-file cleanup.
pub const FILE_PREFIXES: &[&str] = &["expected_cmd", "cmd_encoder"];

pub struct HarnessEmitter<'a> {
    config: &'a GenConfig,
    emitter: Emitter<'a>,
}

impl<'a> HarnessEmitter<'a> {
    pub fn new(schema: &'a Schema, config: &'a GenConfig) -> Self {
        HarnessEmitter {
            config,
            emitter: Emitter::new(schema, config),
        }
    }

    fn codec(&self) -> &str {
        &self.config.codec_path
    }

    fn root(&self) -> Scope<'_> {
        Scope::Root(&self.config.bindings_path)
    }

    fn unit_path(&self, unit: &FeatureUnit) -> String {
        let mapper = self.emitter.mapper();
        format!(
            "{}::{}::{}",
            self.config.bindings_path,
            mapper.unit_module(unit),
            mapper.unit_type(unit)
        )
    }

    pub fn expected_cmd_unit(&self, tables: &[FeatureTables]) -> String {
        let codec = self.codec();
        let mut w = Writer::new();
        w.line(HEADER);
        w.line("//!");
        w.line("//! Expected commands: reference commands built from literal arguments and");
        w.line("//! matched against the commands sent by the code under test.");
        w.line(ALLOW);
        w.blank();
        w.line("/// Command expected by a test.");
        w.open("pub trait ExpectedCmd {");
        w.line("/// Reference wire command.");
        w.line(format!("fn cmd(&self) -> &{}::Cmd;", codec));
        w.blank();
        w.line("/// Same command id as [`ExpectedCmd::cmd`]; with `check_params`, also equal arguments.");
        w.line(format!("fn matches(&self, cmd: &{}::Cmd, check_params: bool) -> bool;", codec));
        w.blank();
        w.line("/// Full contents of the reference command.");
        w.open("fn describe(&self) -> String {");
        w.line("self.cmd().describe()");
        w.close("}");
        w.close("}");

        for t in tables {
            for entry in t.encode.commands() {
                self.expected_cmd(&mut w, &t.unit, entry.message, &entry.wire_function);
            }
        }
        w.finish()
    }

    fn expected_cmd(&self, w: &mut Writer, unit: &FeatureUnit, m: &Message, wire_function: &str) {
        let codec = self.codec();
        let unit_name = unit.name();
        let ty = naming::expected_cmd_type_name(&unit_name, &m.name);
        let params = self.emitter.params(unit, m, self.root());
        let signature: Vec<String> = params.iter().map(|(n, t)| format!("{}: {}", n, t)).collect();
        let names: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();

        w.blank();
        message_doc(w, m);
        w.open(format!("pub struct {} {{", ty));
        w.line(format!("cmd: {}::Cmd,", codec));
        w.close("}");

        w.blank();
        w.open(format!("impl {} {{", ty));
        w.line("/// `None` when the codec rejects the arguments.");
        w.open(format!("pub fn new({}) -> Option<Self> {{", signature.join(", ")));
        w.line(format!("let mut wire_cmd = {}::Cmd::default();", codec));
        w.line(format!(
            "let enc_res = {}::{}({})(&mut wire_cmd);",
            self.unit_path(unit),
            naming::encoder_name(&m.name),
            names.join(", ")
        ));
        w.open("if enc_res < 0 {");
        w.line("return None;");
        w.close("}");
        w.line(format!("Some({} {{ cmd: wire_cmd }})", ty));
        w.close("}");
        w.close("}");

        w.blank();
        w.open(format!("impl ExpectedCmd for {} {{", ty));
        w.open(format!("fn cmd(&self) -> &{}::Cmd {{", codec));
        w.line("&self.cmd");
        w.close("}");
        w.blank();
        w.open(format!("fn matches(&self, cmd: &{}::Cmd, check_params: bool) -> bool {{", codec));
        w.open("if cmd.id() != self.cmd.id() {");
        w.line("return false;");
        w.close("}");
        if m.args.is_empty() {
            w.line("true");
        } else {
            w.open("if !check_params {");
            w.line("return true;");
            w.close("}");
            for side in ["expected", "actual"] {
                let mapper = self.emitter.mapper();
                for a in &m.args {
                    let wire = mapper.wire_type(a);
                    w.line(format!(
                        "let mut {}: {} = {};",
                        local(side, a),
                        mapper.render_wire_local(&wire),
                        mapper.render_wire_default(&wire)
                    ));
                }
                let source = if side == "expected" { "&self.cmd" } else { "cmd" };
                let outs: String = m.args.iter().map(|a| format!(", &mut {}", local(side, a))).collect();
                w.open(format!(
                    "if {}::cmd_dec::{}({}{}) < 0 {{",
                    codec, wire_function, source, outs
                ));
                w.line("return false;");
                w.close("}");
            }
            let checks: Vec<String> = m.args.iter().map(compare_expr).collect();
            w.line(checks.join(" && "));
        }
        w.close("}");
        w.close("}");

        w.blank();
        w.line(format!("/// Boxed [`{}`].", ty));
        w.open(format!(
            "pub fn {}({}) -> Option<Box<dyn ExpectedCmd>> {{",
            naming::command_name(&unit_name, &m.name),
            signature.join(", ")
        ));
        w.line(format!(
            "{}::new({}).map(|e| Box::new(e) as Box<dyn ExpectedCmd>)",
            ty,
            names.join(", ")
        ));
        w.close("}");
    }

    pub fn cmd_encoder_unit(&self, tables: &[FeatureTables]) -> String {
        let codec = self.codec();
        let mut w = Writer::new();
        w.line(HEADER);
        w.line("//!");
        w.line("//! Encoders of every event, for tests that play the device side.");
        w.line(ALLOW);
        w.blank();
        w.line("pub struct CmdEncoder;");
        w.blank();
        w.open("impl CmdEncoder {");
        let mut first = true;
        for t in tables {
            let unit = &t.unit;
            for entry in t.encode.events() {
                let m = entry.message;
                if !first {
                    w.blank();
                }
                first = false;
                message_doc(&mut w, m);
                let signature: Vec<String> = self
                    .emitter
                    .params(unit, m, self.root())
                    .into_iter()
                    .map(|(n, t)| format!("{}: {}", n, t))
                    .collect();
                w.open(format!(
                    "pub fn {}({}) -> impl Fn(&mut {}::Cmd) -> i32 {{",
                    naming::harness_encoder_name(&unit.name(), &m.name),
                    signature.join(", "),
                    codec
                ));
                w.line(format!(
                    "move |wire_cmd| {}::cmd_enc::{}(wire_cmd{})",
                    codec,
                    entry.wire_function,
                    self.emitter.wire_args(unit, m)
                ));
                w.close("}");
            }
        }
        w.close("}");
        w.finish()
    }
}

fn local(side: &str, a: &Arg) -> String {
    format!("{}_{}", side, naming::arg_param_name(a))
}

fn compare_expr(a: &Arg) -> String {
    let (e, x) = (local("expected", a), local("actual", a));
    match compare_policy(&a.ty) {
        ComparePolicy::Text | ComparePolicy::Numeric => format!("{} == {}", e, x),
        ComparePolicy::Bytes => format!("{}.as_bytes() == {}.as_bytes()", e, x),
    }
}
