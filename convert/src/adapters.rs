//! Per-type copy functions for attachments moved between a live entity and
//! its scratch entity.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::attachments::{
    ConstantForce2D, ConstantForce3D, Joint2D, Joint3D, force_to_2d, force_to_3d, joint_to_2d,
    joint_to_3d,
};
use crate::error::ConversionError;

/// A type-erased copy function. Returns `false` when either side has the
/// wrong concrete type.
type CopyFn = Box<dyn Fn(&dyn Any, &mut dyn Any) -> bool>;

/// Registry of `(source type, destination type) → copy` functions.
pub struct AdapterRegistry {
    adapters: HashMap<(TypeId, TypeId), CopyFn>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterRegistry {
    /// Registry holding the builtin force and joint adapters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<ConstantForce3D, ConstantForce2D>(force_to_2d);
        registry.register::<ConstantForce2D, ConstantForce3D>(force_to_3d);
        registry.register::<Joint3D, Joint2D>(joint_to_2d);
        registry.register::<Joint2D, Joint3D>(joint_to_3d);
        registry
    }

    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register or replace the copy function from `S` to `D`.
    pub fn register<S: Any, D: Any>(&mut self, copy: fn(&S, &mut D)) {
        let erased: CopyFn = Box::new(move |src, dst| {
            match (src.downcast_ref::<S>(), dst.downcast_mut::<D>()) {
                (Some(src), Some(dst)) => {
                    copy(src, dst);
                    true
                }
                _ => false,
            }
        });
        self.adapters
            .insert((TypeId::of::<S>(), TypeId::of::<D>()), erased);
    }

    /// Register a plain clone between two values of `T`.
    pub fn register_clone<T: Any + Clone>(&mut self) {
        self.register::<T, T>(|src, dst| dst.clone_from(src));
    }

    pub fn contains<S: Any, D: Any>(&self) -> bool {
        self.adapters
            .contains_key(&(TypeId::of::<S>(), TypeId::of::<D>()))
    }

    /// Copy `src` into `dst` through the registered adapter.
    pub fn copy<S: Any, D: Any>(&self, src: &S, dst: &mut D) -> Result<(), ConversionError> {
        let missing = || ConversionError::MissingAdapter {
            from: type_name::<S>(),
            to: type_name::<D>(),
        };
        let adapter = self
            .adapters
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .ok_or_else(missing)?;
        if adapter(src, dst) {
            Ok(())
        } else {
            Err(missing())
        }
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
