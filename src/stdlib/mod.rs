//! Standard library metadata: a registry of modules, each
//! mapping function name to signature plus optional raw IR and linker
//! flags, built with a fluent builder DSL.
//!
//! Built as an explicit collaborator threaded through the pipeline
//! (`StandardLibrary::with_builtin_modules()`) rather than a process-wide
//! singleton — the registry's *shape* is fixed, global data, but its
//! *instance* is just another value passed around.

use std::collections::HashMap;

use crate::ast::SourceType;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<SourceType>,
    pub return_type: SourceType,
    pub is_variadic: bool,
    pub llvm_name: Option<String>,
    pub ir: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleDef {
    pub name: String,
    pub functions: Vec<FunctionSignature>,
    pub link_flags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct StandardLibrary {
    modules: HashMap<String, ModuleDef>,
}

impl StandardLibrary {
    pub fn empty() -> Self {
        StandardLibrary::default()
    }

    pub fn module(&self, name: &str) -> Option<&ModuleDef> {
        self.modules.get(name)
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn define_module(&mut self, name: &str) -> ModuleBuilder<'_> {
        ModuleBuilder {
            lib: self,
            def: ModuleDef {
                name: name.to_owned(),
                functions: Vec::new(),
                link_flags: Vec::new(),
            },
        }
    }

    /// The built-in modules available without an external import path.
    pub fn with_builtin_modules() -> Self {
        let mut lib = StandardLibrary::default();

        lib.define_module("io")
            .link_flag("-lc")
            .define_function("print")
            .with_params(vec![SourceType::String])
            .returns(SourceType::Void)
            .llvm_name("puts")
            .done()
            .define_function("printf")
            .with_params(vec![SourceType::String])
            .returns(SourceType::Int)
            .variadic()
            .done()
            .define_function("scanf")
            .with_params(vec![SourceType::String])
            .returns(SourceType::Int)
            .variadic()
            .done()
            .define_function("read_line")
            .with_params(vec![])
            .returns(SourceType::String)
            .llvm_name("farpy_read_line")
            .done()
            .build();

        lib.define_module("math")
            .link_flag("-lm")
            .define_function("sin")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("cos")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("tan")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("log")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("exp")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("sqrt")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("pow")
            .with_params(vec![SourceType::Double, SourceType::Double])
            .returns(SourceType::Double)
            .done()
            .define_function("pi")
            .with_params(vec![])
            .returns(SourceType::Double)
            .with_ir("define double @pi() {\nentry:\n  ret double 0x400921FB54442D18\n}")
            .done()
            .define_function("e")
            .with_params(vec![])
            .returns(SourceType::Double)
            .with_ir("define double @e() {\nentry:\n  ret double 0x4005BF0A8B145769\n}")
            .done()
            .build();

        lib.define_module("string")
            .define_function("length")
            .with_params(vec![SourceType::String])
            .returns(SourceType::Int)
            .llvm_name("strlen")
            .done()
            .define_function("concat")
            .with_params(vec![SourceType::String, SourceType::String])
            .returns(SourceType::String)
            .llvm_name("strcat")
            .done()
            .define_function("substring")
            .with_params(vec![SourceType::String, SourceType::Int, SourceType::Int])
            .returns(SourceType::String)
            .llvm_name("farpy_substring")
            .done()
            .build();

        lib.define_module("types")
            .define_function("ftod")
            .with_params(vec![SourceType::Float])
            .returns(SourceType::Double)
            .done()
            .define_function("itod")
            .with_params(vec![SourceType::Int])
            .returns(SourceType::Double)
            .done()
            .define_function("itof")
            .with_params(vec![SourceType::Int])
            .returns(SourceType::Float)
            .done()
            .define_function("dtof")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Float)
            .done()
            .define_function("dtoi")
            .with_params(vec![SourceType::Double])
            .returns(SourceType::Int)
            .done()
            .define_function("ftoi")
            .with_params(vec![SourceType::Float])
            .returns(SourceType::Int)
            .done()
            .build();

        lib
    }
}

pub struct ModuleBuilder<'a> {
    lib: &'a mut StandardLibrary,
    def: ModuleDef,
}

impl<'a> ModuleBuilder<'a> {
    pub fn link_flag(mut self, flag: &str) -> Self {
        self.def.link_flags.push(flag.to_owned());
        self
    }

    pub fn define_function(self, name: &str) -> FunctionBuilder<'a> {
        FunctionBuilder {
            module: self,
            sig: FunctionSignature {
                name: name.to_owned(),
                params: Vec::new(),
                return_type: SourceType::Void,
                is_variadic: false,
                llvm_name: None,
                ir: None,
            },
        }
    }

    pub fn build(self) {
        self.lib.modules.insert(self.def.name.clone(), self.def);
    }
}

pub struct FunctionBuilder<'a> {
    module: ModuleBuilder<'a>,
    sig: FunctionSignature,
}

impl<'a> FunctionBuilder<'a> {
    pub fn returns(mut self, ty: SourceType) -> Self {
        self.sig.return_type = ty;
        self
    }

    pub fn with_params(mut self, params: Vec<SourceType>) -> Self {
        self.sig.params = params;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.sig.is_variadic = true;
        self
    }

    pub fn llvm_name(mut self, name: &str) -> Self {
        self.sig.llvm_name = Some(name.to_owned());
        self
    }

    pub fn with_ir(mut self, ir: &str) -> Self {
        self.sig.ir = Some(ir.to_owned());
        self
    }

    pub fn done(mut self) -> ModuleBuilder<'a> {
        self.module.def.functions.push(self.sig);
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_modules_are_registered() {
        let lib = StandardLibrary::with_builtin_modules();
        for name in ["io", "math", "string", "types"] {
            assert!(lib.has_module(name), "missing module '{name}'");
        }
    }

    #[test]
    fn io_print_exists_with_string_param() {
        let lib = StandardLibrary::with_builtin_modules();
        let io = lib.module("io").unwrap();
        let print = io.functions.iter().find(|f| f.name == "print").unwrap();
        assert_eq!(print.params, vec![SourceType::String]);
    }

    #[test]
    fn printf_is_variadic() {
        let lib = StandardLibrary::with_builtin_modules();
        let io = lib.module("io").unwrap();
        let printf = io.functions.iter().find(|f| f.name == "printf").unwrap();
        assert!(printf.is_variadic);
    }

    #[test]
    fn math_has_lm_link_flag() {
        let lib = StandardLibrary::with_builtin_modules();
        assert!(lib
            .module("math")
            .unwrap()
            .link_flags
            .contains(&"-lm".to_owned()));
    }
}
