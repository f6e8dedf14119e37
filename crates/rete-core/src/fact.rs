use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::types::FactId;

/// Reference identity of a fact object.
///
/// This is the address of the shared allocation behind a [`FactObject`]. Two
/// handles have the same `ObjectId` exactly when they point at the same
/// allocation, regardless of whether the values compare equal. An indexed
/// [`Fact`] keeps its handle alive, so an id held by an index can't be reused
/// by a different object while the entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Shared handle to a caller-supplied domain object.
///
/// Cloning the handle does not clone the object: every clone shares one
/// allocation and therefore one [`ObjectId`].
#[derive(Clone)]
pub struct FactObject {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl FactObject {
    /// Move `value` into a new allocation with a fresh identity.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an allocation the caller already shares.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Reference equality.
    pub fn ptr_eq(&self, other: &FactObject) -> bool {
        self.id() == other.id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        Any::type_id(&*self.inner)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for FactObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactObject")
            .field("id", &self.id())
            .field("type", &self.type_name)
            .finish()
    }
}

/// A domain object as seen by working memory.
///
/// The fact carries its own [`FactId`] so two facts wrapping the same object
/// are still distinguishable, but every index keys on the object's identity.
/// `object` only changes through the linked-fact update path, which re-keys
/// the primary index at the same time.
#[derive(Debug, Clone)]
pub struct Fact {
    pub id: FactId,
    pub object: FactObject,
}

impl Fact {
    pub fn new(object: FactObject) -> Self {
        Self {
            id: Uuid::new_v4(),
            object,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object.id()
    }

    pub fn type_name(&self) -> &'static str {
        self.object.type_name()
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.object.ptr_eq(&other.object)
    }
}

impl Eq for Fact {}
