//! Modules: named collections of function definitions and declarations.

use std::fmt;

use crate::{
    ir::{Callee, Function, FunctionType},
    Error, Result,
};

/// A translation unit.
///
/// Function names are unique within a module. Functions without blocks are declarations
/// of external symbols and are skipped by passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a function definition or declaration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFunction`] if the name is already taken.
    pub fn add_function(&mut self, function: Function) -> Result<()> {
        if self.function(function.name()).is_some() {
            return Err(Error::DuplicateFunction(function.name().to_string()));
        }
        self.functions.push(function);
        Ok(())
    }

    /// Returns a callable handle for `name`, declaring it with `ty` if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Verification`] if `name` already exists with a different
    /// signature.
    pub fn get_or_insert_function(&mut self, name: &str, ty: FunctionType) -> Result<Callee> {
        match self.function(name) {
            Some(existing) => {
                let signature = existing.signature();
                if signature != ty {
                    return Err(Error::Verification(format!(
                        "@{name} redeclared as {ty}, previously {signature}"
                    )));
                }
            }
            None => self.functions.push(Function::new(name, ty.clone())),
        }
        Ok(Callee {
            name: name.to_string(),
            ty,
        })
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Looks up a function by name for mutation.
    pub fn function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name() == name)
    }

    /// All functions in insertion order.
    #[must_use]
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// All functions, mutable; the slice keeps names unique.
    pub fn functions_mut(&mut self) -> &mut [Function] {
        &mut self.functions
    }

    /// Functions that have a body.
    pub fn definitions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|f| !f.is_declaration())
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrType;

    #[test]
    fn test_get_or_insert_declares_once() {
        let mut module = Module::new("m");
        let ty = FunctionType::new(vec![IrType::I32], IrType::Void);
        let first = module.get_or_insert_function("bar", ty.clone()).unwrap();
        let second = module.get_or_insert_function("bar", ty).unwrap();

        assert_eq!(first, second);
        assert_eq!(module.functions().len(), 1);
        assert!(module.function("bar").unwrap().is_declaration());
        assert_eq!(module.definitions().count(), 0);
    }

    #[test]
    fn test_get_or_insert_rejects_signature_change() {
        let mut module = Module::new("m");
        module
            .get_or_insert_function("baz", FunctionType::new(vec![], IrType::I32))
            .unwrap();
        let err = module
            .get_or_insert_function("baz", FunctionType::new(vec![], IrType::Void))
            .unwrap_err();
        assert!(matches!(err, Error::Verification(_)));
    }

    #[test]
    fn test_add_function_rejects_duplicates() {
        let mut module = Module::new("m");
        let ty = FunctionType::new(vec![], IrType::Void);
        module.add_function(Function::new("f", ty.clone())).unwrap();
        let err = module.add_function(Function::new("f", ty)).unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction(name) if name == "f"));
    }

    #[test]
    fn test_display() {
        let mut module = Module::new("m");
        module
            .get_or_insert_function("bar", FunctionType::new(vec![IrType::I32], IrType::Void))
            .unwrap();
        assert_eq!(module.to_string(), "; ModuleID = 'm'\n\ndeclare void @bar(i32)\n");
    }
}
