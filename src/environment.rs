use crate::{
    builtins::create_builtin_table,
    error::{name_error, Result},
    runtime::Value,
};
use log::debug;
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

thread_local! {
    static ROOT: Environment = Environment::from_frame(Frame {
        bindings: create_builtin_table(),
        parent: None,
    });
}

/// A shared handle to one scope frame. Cloning the handle shares the frame:
/// a `define` through any clone is visible through all of them, and the frame
/// lives as long as any handle (including a captured closure) still holds it.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    fn from_frame(frame: Frame) -> Self {
        Environment(Rc::new(RefCell::new(frame)))
    }

    /// The frame holding the builtin operators. It is built once per thread
    /// and only ever reached as an ancestor.
    fn root() -> Self {
        ROOT.with(Environment::clone)
    }

    /// A fresh top-level session scope whose parent is the builtin frame.
    pub fn global() -> Self {
        Environment::with_parent(&Environment::root())
    }

    pub fn with_parent(parent: &Environment) -> Self {
        Environment::from_frame(Frame {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })
    }

    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// Binds `name` in this frame only, replacing any existing local binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!("define {} = {}", name, value);
        self.0.borrow_mut().bindings.insert(name, value);
    }

    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let inner = frame.0.borrow();
                if let Some(value) = inner.bindings.get(name) {
                    return Ok(value.clone());
                }
                inner.parent.clone()
            };

            match parent {
                Some(parent) => frame = parent,
                None => return name_error(format!("'{}' is not defined", name)),
            }
        }
    }

    pub fn is_defined_locally(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let mut names: Vec<&String> = inner.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}
