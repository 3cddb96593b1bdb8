use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    builtins::Builtin,
    error::{Error, Result},
    model::{Procedure, Value},
};

/// One level of the environment: its own bindings plus a link to the enclosing frame.
///
/// Frames are shared: a parent is referenced by every child made from it and by every
/// closure created while it was current, so they live behind `Rc`. Bindings sit in a
/// `RefCell` because `define` adds to a frame that other holders can still see.
///
/// Frames are reference counted, not garbage collected. A closure bound in the frame it
/// captured (any `(define (f ...) ...)`, for one) keeps that frame alive through its own
/// binding, so such a frame and everything reachable from it is never freed, even after
/// the last outside `Rc` is dropped. Frames without such a cycle go away as soon as their
/// last holder does.
pub struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    /// The root frame holding the builtins and the two boolean constants.
    ///
    /// Nothing outside this module ever holds the root, so `define` never reaches its
    /// bindings.
    fn builtins() -> Rc<Self> {
        let mut bindings: HashMap<String, Value> = Builtin::ALL
            .iter()
            .map(|builtin| {
                (
                    builtin.name().to_string(),
                    Value::Procedure(Procedure::Builtin(*builtin)),
                )
            })
            .collect();
        bindings.insert("#t".to_string(), Value::Boolean(true));
        bindings.insert("#f".to_string(), Value::Boolean(false));

        Rc::new(Self {
            bindings: RefCell::new(bindings),
            parent: None,
        })
    }

    /// A fresh session frame: an empty child of a brand new root frame.
    ///
    /// Every session should start from its own call to this, so one session's
    /// definitions never show up in another.
    pub fn initial() -> Rc<Self> {
        Self::child(Self::builtins(), HashMap::new())
    }

    /// A new frame enclosed by `parent`, starting out with `bindings`.
    pub fn child(parent: Rc<Self>, bindings: HashMap<String, Value>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(bindings),
            parent: Some(parent),
        })
    }

    /// Find the value bound to `name` here or in the nearest enclosing frame.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            match &frame.parent {
                Some(parent) => frame = parent.as_ref(),
                None => return Err(Error::name(format!("unbound identifier {name:?}"))),
            }
        }
    }

    /// Bind `name` in this frame, replacing any earlier binding here. Enclosing frames
    /// are never touched. Returns the bound value.
    pub fn define(&self, name: impl Into<String>, value: Value) -> Value {
        self.bindings.borrow_mut().insert(name.into(), value.clone());
        value
    }
}
