//! Binding emitter: Rust source for every unit plus the two aggregate units.
//!
//! Each unit yields an interface file (Uid constant, enums, bitfield helper types,
//! callback trait, marker struct) and an implementation file (enum and bitfield helper
//! bodies, encoders, decode dispatcher, one decode-and-invoke step per event). The
//! implementation file is a private child module of the interface file.
//!
//! Generated code talks to the codec through this interface, rooted at
//! [`GenConfig::codec_path`]:
//!
//! ```text
//! Cmd { prj_id: u8, cls_id: u8, cmd_id: u16, .. }   Default, id() -> u32, describe() -> String
//! cmd_enc::<unit>_<message>(&mut Cmd, args..) -> i32
//! cmd_dec::<unit>_<message>(&Cmd, &mut out..) -> i32
//! multiset::<Name>                                  Debug + Clone + Default, as_bytes() -> &[u8]
//! ```
//!
//! Locals and closure parameters introduced by the emitter contain an underscore; derived
//! parameter names never do, so the two cannot collide.

use std::collections::BTreeSet;

use crate::bitfield::BitfieldWidth;
use crate::config::GenConfig;
use crate::dispatch::FeatureTables;
use crate::naming;
use crate::schema::{Arg, Enum, FeatureUnit, Message, Schema};
use crate::types::{PublicType, Scope, TypeMapper};
use crate::writer::Writer;

pub(crate) const HEADER: &str = "//! Generated, do not edit!";
pub(crate) const ALLOW: &str = "#![allow(non_snake_case, non_camel_case_types, non_upper_case_globals, dead_code, unused_imports, unused_variables)]";

pub struct Emitter<'a> {
    schema: &'a Schema,
    config: &'a GenConfig,
    mapper: TypeMapper<'a>,
}

impl<'a> Emitter<'a> {
    pub fn new(schema: &'a Schema, config: &'a GenConfig) -> Self {
        Emitter {
            schema,
            config,
            mapper: TypeMapper::new(schema, &config.prefix, &config.codec_path),
        }
    }

    pub fn mapper(&self) -> &TypeMapper<'a> {
        &self.mapper
    }

    pub fn interface_file(&self, unit: &FeatureUnit) -> String {
        format!("{}.rs", self.mapper.unit_module(unit))
    }

    pub fn implementation_file(&self, unit: &FeatureUnit) -> String {
        format!("{}_impl.rs", self.mapper.unit_module(unit))
    }

    fn codec(&self) -> &str {
        &self.config.codec_path
    }

    fn enum_type(&self, unit: &FeatureUnit, e: &Enum) -> String {
        naming::enum_type_name(&self.config.prefix, &unit.feature.name, &e.name)
    }

    /// `name: Type` pairs of a message's arguments, in declaration order.
    pub(crate) fn params(&self, unit: &FeatureUnit, m: &Message, scope: Scope) -> Vec<(String, String)> {
        m.args
            .iter()
            .map(|a| {
                let ty = self.mapper.public_type(unit, a);
                (param_ident(a), self.mapper.render_public(&ty, scope))
            })
            .collect()
    }

    pub fn interface_unit(&self, tables: &FeatureTables) -> String {
        let unit = &tables.unit;
        let unit_type = self.mapper.unit_type(unit);
        let mut w = Writer::new();
        w.line(HEADER);
        let doc = unit_doc(unit);
        if !doc.is_empty() {
            w.line("//!");
            w.doc("//!", doc);
        }
        w.line(ALLOW);
        w.blank();

        let imports = self.imports(unit);
        for import in &imports {
            w.line(format!("use super::{};", import));
        }
        if !imports.is_empty() {
            w.blank();
        }
        w.line(format!("#[path = \"{}\"]", self.implementation_file(unit)));
        w.line("mod imp;");
        w.blank();
        w.line(format!("/// Registration id of [`{}`]: feature id * 256 + class id.", unit_type));
        w.line(format!(
            "pub const {}: u16 = {};",
            naming::constant_name(&unit_type),
            tables.uid
        ));

        for e in unit.enums() {
            self.enum_declaration(&mut w, unit, e);
        }

        w.blank();
        w.line(format!(
            "/// Event handlers of [`{}`]. Every handler is optional; the default does nothing.",
            unit_type
        ));
        w.open(format!("pub trait {} {{", naming::callback_trait_name(&unit_type)));
        for (i, m) in unit.events().into_iter().enumerate() {
            if i > 0 {
                w.blank();
            }
            message_doc(&mut w, m);
            let params: String = self
                .params(unit, m, Scope::Unit)
                .iter()
                .map(|(n, t)| format!(", {}: {}", n, t))
                .collect();
            w.line(format!(
                "fn {}(&mut self{}) {{}}",
                naming::event_handler_name(&m.name),
                params
            ));
        }
        w.close("}");

        w.blank();
        w.line(format!("/// Encoders and decode dispatcher of `{}`.", unit.name()));
        w.line(format!("pub struct {};", unit_type));
        w.finish()
    }

    /// Generated types used by the unit but declared elsewhere, relative to the aggregate.
    fn imports(&self, unit: &FeatureUnit) -> BTreeSet<String> {
        let own = self.mapper.unit_module(unit);
        unit.commands()
            .into_iter()
            .chain(unit.events())
            .flat_map(|m| m.args.iter())
            .filter_map(|a| match self.mapper.public_type(unit, a) {
                PublicType::Enum { module, name } if module != own => Some(format!("{}::{}", module, name)),
                PublicType::MultiSetting { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    fn enum_declaration(&self, w: &mut Writer, unit: &FeatureUnit, e: &Enum) {
        let ty = self.enum_type(unit, e);
        w.blank();
        w.doc("///", &e.doc);
        w.line("#[repr(i32)]");
        w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
        w.open(format!("pub enum {} {{", ty));
        for v in &e.values {
            w.doc("///", &v.doc);
            w.line(format!("{} = {},", naming::enum_value_name(&ty, &v.name), v.value));
        }
        w.line("/// Value not known when these bindings were generated.");
        w.line(format!("{} = {},", naming::unknown_value_name(&ty), e.unknown_value()));
        w.close("}");
        w.blank();
        w.line(format!("/// Number of declared values of [`{}`].", ty));
        w.line(format!(
            "pub const {}: usize = {};",
            naming::count_const_name(&ty),
            e.values.len()
        ));
        if e.used_like_bitfield {
            let bf = naming::bitfield_type_name(&ty);
            w.blank();
            w.line(format!("/// [`{}`] values seen as flags, one bit per declaration position.", ty));
            w.line(format!("pub struct {};", bf));
            w.blank();
            w.line(format!("/// Storage of a [`{}`] bitfield.", ty));
            w.line(format!(
                "pub type {}Repr = {};",
                bf,
                BitfieldWidth::declared(e.values.len()).rust_type()
            ));
        }
    }

    pub fn implementation_unit(&self, tables: &FeatureTables) -> String {
        let unit = &tables.unit;
        let unit_type = self.mapper.unit_type(unit);
        let callback = naming::callback_trait_name(&unit_type);
        let codec = self.codec();
        let mut w = Writer::new();
        w.line(HEADER);
        w.line(ALLOW);
        w.blank();
        w.line("use super::*;");

        for e in unit.enums() {
            self.enum_body(&mut w, unit, e);
        }

        w.blank();
        w.open(format!("impl {} {{", unit_type));
        for (i, entry) in tables.encode.commands().enumerate() {
            if i > 0 {
                w.blank();
            }
            let m = entry.message;
            message_doc(&mut w, m);
            let params: Vec<String> = self
                .params(unit, m, Scope::Unit)
                .into_iter()
                .map(|(n, t)| format!("{}: {}", n, t))
                .collect();
            w.open(format!(
                "pub fn {}({}) -> impl Fn(&mut {}::Cmd) -> i32 {{",
                naming::encoder_name(&m.name),
                params.join(", "),
                codec
            ));
            w.line(format!(
                "move |wire_cmd| {}::cmd_enc::{}(wire_cmd{})",
                codec,
                entry.wire_function,
                self.wire_args(unit, m)
            ));
            w.close("}");
        }
        if tables.encode.commands().next().is_some() {
            w.blank();
        }
        w.line("/// Decode `command` and invoke the matching handler of `callback`.");
        w.line("///");
        w.line("/// Returns the command id, -1 when `command` is absent or not addressed to this unit,");
        w.line("/// or the codec's negative status when decoding fails.");
        w.open(format!(
            "pub fn decode(command: Option<&{}::Cmd>, callback: &mut dyn {}) -> i32 {{",
            codec, callback
        ));
        w.open("let Some(command) = command else {");
        w.line("return -1;");
        w.close("};");
        w.open(format!(
            "if command.prj_id != {} || command.cls_id != {} {{",
            unit.feature_id(),
            unit.class_id()
        ));
        w.line("return -1;");
        w.close("}");
        if tables.dispatch.is_empty() {
            w.line("-1");
        } else {
            w.open("let dec_res = match command.cmd_id {");
            for (key, m) in tables.dispatch.entries() {
                w.line(format!(
                    "{} => {}(command, callback),",
                    key.cmd_id,
                    naming::call_step_name(&m.name)
                ));
            }
            w.line("_ => return -1,");
            w.close("};");
            w.line("if dec_res < 0 { dec_res } else { i32::from(command.cmd_id) }");
        }
        w.close("}");
        w.close("}");

        for (_, m) in tables.dispatch.entries() {
            self.call_step(&mut w, unit, m, &callback);
        }
        w.finish()
    }

    /// `, wire_expr` for every argument, as passed to an encode function.
    pub(crate) fn wire_args(&self, unit: &FeatureUnit, m: &Message) -> String {
        m.args
            .iter()
            .map(|a| format!(", {}", self.mapper.to_wire(unit, a, &param_ident(a))))
            .collect()
    }

    fn enum_body(&self, w: &mut Writer, unit: &FeatureUnit, e: &Enum) {
        let ty = self.enum_type(unit, e);
        let unknown = naming::unknown_value_name(&ty);
        let variants: Vec<String> = e
            .values
            .iter()
            .map(|v| format!("{}::{}", ty, naming::enum_value_name(&ty, &v.name)))
            .collect();
        w.blank();
        w.open(format!("impl {} {{", ty));
        w.line("/// Declared values, in declaration order.");
        w.line(format!(
            "pub const VALUES: [{}; {}] = [{}];",
            ty,
            variants.len(),
            variants.join(", ")
        ));
        w.blank();
        w.line("/// Value for wire value `raw`; the unknown sentinel when `raw` was not declared.");
        w.open("pub fn from_raw(raw: i32) -> Self {");
        w.open("match raw {");
        for (v, variant) in e.values.iter().zip(&variants) {
            w.line(format!("{} => {},", v.value, variant));
        }
        w.line(format!("_ => {}::{},", ty, unknown));
        w.close("}");
        w.close("}");
        w.blank();
        w.line("/// Position in declaration order; `None` for the unknown sentinel.");
        w.open("pub fn ordinal(self) -> Option<usize> {");
        w.open("match self {");
        for (i, variant) in variants.iter().enumerate() {
            w.line(format!("{} => Some({}),", variant, i));
        }
        w.line(format!("{}::{} => None,", ty, unknown));
        w.close("}");
        w.close("}");
        w.close("}");

        if e.used_like_bitfield {
            let width = BitfieldWidth::implemented(e.values.len()).rust_type();
            w.blank();
            w.open(format!("impl {} {{", naming::bitfield_type_name(&ty)));
            w.line("/// `val` is set in `bitfield`.");
            w.open(format!("pub fn isSet(val: {}, bitfield: {}) -> bool {{", ty, width));
            w.open("match val.ordinal() {");
            w.line(format!("Some(ordinal) => bitfield & (1{} << ordinal) != 0,", width));
            w.line("None => false,");
            w.close("}");
            w.close("}");
            w.blank();
            w.line("/// Calls `f` once per value set in `bitfield`, in declaration order.");
            w.open(format!(
                "pub fn forAllSetIn(bitfield: {}, mut f: impl FnMut({})) {{",
                width, ty
            ));
            w.open(format!("for val in {}::VALUES {{", ty));
            w.open("if Self::isSet(val, bitfield) {");
            w.line("f(val);");
            w.close("}");
            w.close("}");
            w.close("}");
            w.close("}");
        }
    }

    fn call_step(&self, w: &mut Writer, unit: &FeatureUnit, m: &Message, callback: &str) {
        let codec = self.codec();
        w.blank();
        w.open(format!(
            "fn {}(wire_cmd: &{}::Cmd, event_callback: &mut dyn {}) -> i32 {{",
            naming::call_step_name(&m.name),
            codec,
            callback
        ));
        for a in &m.args {
            let wire = self.mapper.wire_type(a);
            w.line(format!(
                "let mut {}: {} = {};",
                param_ident(a),
                self.mapper.render_wire_local(&wire),
                self.mapper.render_wire_default(&wire)
            ));
        }
        let outs: String = m.args.iter().map(|a| format!(", &mut {}", param_ident(a))).collect();
        w.line(format!(
            "let dec_res = {}::cmd_dec::{}(wire_cmd{});",
            codec,
            naming::wire_function_name(&unit.name(), &m.name),
            outs
        ));
        w.open("if dec_res < 0 {");
        w.line("return dec_res;");
        w.close("}");
        let publics: Vec<String> = m
            .args
            .iter()
            .map(|a| self.mapper.to_public(unit, a, &param_ident(a), Scope::Unit))
            .collect();
        w.line(format!(
            "event_callback.{}({});",
            naming::event_handler_name(&m.name),
            publics.join(", ")
        ));
        w.line("0");
        w.close("}");
    }

    /// Aggregate unit: declares every unit module and holds the multisetting handles.
    pub fn aggregate_unit(&self, tables: &[FeatureTables]) -> String {
        let mut w = Writer::new();
        w.line(HEADER);
        w.line("//!");
        w.line("//! Every feature binding generated from the schema.");
        w.line(ALLOW);
        for t in tables {
            w.blank();
            w.line(format!("#[path = \"{}\"]", self.interface_file(&t.unit)));
            w.line(format!("pub mod {};", self.mapper.unit_module(&t.unit)));
        }
        w.blank();
        w.line(format!("#[path = \"{}\"]", self.config.uids_file()));
        w.line("mod uids;");
        w.line("pub use uids::FEATURE_UIDS;");

        let mut emitted = BTreeSet::new();
        for feature in self.schema.features() {
            let unit = feature.unit_for(None);
            for ms in &feature.multisettings {
                let name = self.mapper.multisetting_type(&unit, &ms.name);
                if !emitted.insert(name.clone()) {
                    continue;
                }
                let native = self.mapper.multisetting_native(&ms.name);
                w.blank();
                w.doc("///", &ms.doc);
                w.line("#[derive(Debug, Clone, Default)]");
                w.open(format!("pub struct {} {{", name));
                w.line(format!("native: {},", native));
                w.close("}");
                w.blank();
                w.open(format!("impl {} {{", name));
                w.open(format!("pub fn from_native(native: {}) -> Self {{", native));
                w.line(format!("{} {{ native }}", name));
                w.close("}");
                w.blank();
                w.line("/// Native structure handed to the codec.");
                w.open(format!("pub fn native_settings(&self) -> &{} {{", native));
                w.line("&self.native");
                w.close("}");
                w.close("}");
            }
        }
        w.finish()
    }

    /// Aggregate table of every unit's Uid and name.
    pub fn uids_unit(&self, tables: &[FeatureTables]) -> String {
        let mut w = Writer::new();
        w.line(HEADER);
        w.line(ALLOW);
        w.blank();
        w.line("use super::*;");
        w.blank();
        w.line("/// Uid and name of every generated unit, ascending Uid.");
        w.open("pub const FEATURE_UIDS: &[(u16, &str)] = &[");
        for t in tables {
            let unit_type = self.mapper.unit_type(&t.unit);
            w.line(format!(
                "({}::{}, \"{}\"),",
                self.mapper.unit_module(&t.unit),
                naming::constant_name(&unit_type),
                t.unit.name()
            ));
        }
        w.close("];");
        w.finish()
    }
}

/// Escaped parameter identifier of an argument.
pub(crate) fn param_ident(a: &Arg) -> String {
    naming::rust_ident(&naming::arg_param_name(a))
}

fn unit_doc<'u>(unit: &FeatureUnit<'u>) -> &'u str {
    match unit.class {
        Some(class) if !class.doc.is_empty() => &class.doc,
        _ => &unit.feature.doc,
    }
}

/// Message doc followed by one line per documented argument.
pub(crate) fn message_doc(w: &mut Writer, m: &Message) {
    w.doc("///", &m.doc);
    let documented: Vec<&Arg> = m.args.iter().filter(|a| !a.doc.is_empty()).collect();
    if documented.is_empty() {
        return;
    }
    if !m.doc.is_empty() {
        w.line("///");
    }
    for a in documented {
        w.doc("///", &format!("- `{}`: {}", naming::arg_param_name(a), a.doc));
    }
}
