//! Code generation (spec.md §4.4).
//!
//! Grounded on the teacher's `RustCodeGenerator` (`aot/codegen/ir_codegen.rs`):
//! an output `String` buffer, an `indent_level`, and `write_line`/`indent`/
//! `dedent` helpers driving a single-pass IR walk. Unlike the teacher's
//! pluggable `CodeGenerator` trait (one backend among several), this
//! generator only ever lowers to the one JS-shaped target dialect §1
//! names, so there is no separate trait to implement.

mod exprs;
mod stmts;

use std::collections::HashMap;

use crate::entities::{Arenas, FuncId, StructId, VarId};
use crate::ir::Program;
use crate::stdlib::StdlibIds;

/// The CORE's only user-facing configuration surface (spec.md §7 ambient
/// note): there is no CLI or I/O layer, so indentation style is the one
/// knob left to expose.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub indent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { indent: "  ".to_string() }
    }
}

/// Lowers an optimized program to target source, with the default
/// indentation.
pub fn generate(program: &Program) -> String {
    generate_with_config(program, GeneratorConfig::default())
}

pub fn generate_with_config(program: &Program, config: GeneratorConfig) -> String {
    let mut generator = Generator::new(&program.arenas, &program.stdlib, config);
    generator.generate_program(&program.statements);
    generator.output
}

#[derive(Debug)]
struct Generator<'a> {
    arenas: &'a Arenas,
    stdlib: &'a StdlibIds,
    config: GeneratorConfig,
    output: String,
    indent_level: usize,
    next_suffix: usize,
    var_names: HashMap<usize, String>,
    func_names: HashMap<usize, String>,
    struct_names: HashMap<usize, String>,
    field_names: HashMap<(usize, usize), String>,
}

impl<'a> Generator<'a> {
    fn new(arenas: &'a Arenas, stdlib: &'a StdlibIds, config: GeneratorConfig) -> Self {
        Self {
            arenas,
            stdlib,
            config,
            output: String::new(),
            indent_level: 0,
            next_suffix: 1,
            var_names: HashMap::new(),
            func_names: HashMap::new(),
            struct_names: HashMap::new(),
            field_names: HashMap::new(),
        }
    }

    fn write_line(&mut self, line: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.config.indent);
        }
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn fresh_suffix(&mut self) -> usize {
        let suffix = self.next_suffix;
        self.next_suffix += 1;
        suffix
    }

    /// A synthetic name with no backing entity, for the fresh counting-loop
    /// iterators `repeat`/range lowering needs (spec.md §4.4: "fresh
    /// iterator name").
    fn fresh_name(&mut self, base: &str) -> String {
        let suffix = self.fresh_suffix();
        format!("{base}_{suffix}")
    }

    /// Entity-identity-keyed name mangling (spec.md §4.4): the first
    /// reference to an id allocates a monotonic `name_N`; every later
    /// reference to the *same* id reuses it, while two different entities
    /// that happen to share a source name get different suffixes, because
    /// the table is keyed by id, not by name.
    fn mangle_var(&mut self, id: VarId) -> String {
        if let Some(name) = self.var_names.get(&id.0) {
            return name.clone();
        }
        let suffix = self.fresh_suffix();
        let mangled = format!("{}_{suffix}", self.arenas.variable(id).name);
        self.var_names.insert(id.0, mangled.clone());
        mangled
    }

    fn mangle_func(&mut self, id: FuncId) -> String {
        if let Some(name) = self.func_names.get(&id.0) {
            return name.clone();
        }
        let suffix = self.fresh_suffix();
        let mangled = format!("{}_{suffix}", self.arenas.function(id).name);
        self.func_names.insert(id.0, mangled.clone());
        mangled
    }

    fn mangle_struct(&mut self, id: StructId) -> String {
        if let Some(name) = self.struct_names.get(&id.0) {
            return name.clone();
        }
        let suffix = self.fresh_suffix();
        let mangled = format!("{}_{suffix}", self.arenas.struct_(id).name);
        self.struct_names.insert(id.0, mangled.clone());
        mangled
    }

    fn mangle_field(&mut self, struct_id: StructId, field_index: usize) -> String {
        let key = (struct_id.0, field_index);
        if let Some(name) = self.field_names.get(&key) {
            return name.clone();
        }
        let suffix = self.fresh_suffix();
        let base = &self.arenas.struct_(struct_id).fields[field_index].0;
        let mangled = format!("{base}_{suffix}");
        self.field_names.insert(key, mangled.clone());
        mangled
    }

    /// Entity-identity built-in lowering (spec.md §4.4, §9): a call is
    /// only ever recognized as a built-in by comparing its callee against
    /// the registry ids carried alongside the program, never by name, so a
    /// user-defined function named `print` is never confused with the
    /// real one.
    fn lower_builtin_call(&self, func: FuncId, args: &[String]) -> Option<String> {
        if func == self.stdlib.print {
            Some(format!("console.log({})", args.join(", ")))
        } else if func == self.stdlib.sin {
            Some(format!("Math.sin({})", args[0]))
        } else if func == self.stdlib.cos {
            Some(format!("Math.cos({})", args[0]))
        } else if func == self.stdlib.exp {
            Some(format!("Math.exp({})", args[0]))
        } else if func == self.stdlib.ln {
            Some(format!("Math.log({})", args[0]))
        } else if func == self.stdlib.hypot {
            Some(format!("Math.hypot({}, {})", args[0], args[1]))
        } else if func == self.stdlib.bytes {
            Some(format!("Array.from(Buffer.from({}, \"utf-8\"))", args[0]))
        } else if func == self.stdlib.codepoints {
            Some(format!("Array.from({}).map(c => c.codePointAt(0))", args[0]))
        } else {
            None
        }
    }

    fn lower_builtin_var(&self, var: VarId) -> Option<&'static str> {
        (var == self.stdlib.pi).then_some("Math.PI")
    }
}
