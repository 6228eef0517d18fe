// Record module - the field enumeration capability the row decoder relies on
//
// - scalar: scalar kinds, slots and the engine accessor conversions
// - dynamic: runtime-shaped records built from (name, kind) witnesses
// - macros: `record!` / `impl_record!` code generation for named structs

pub mod dynamic;
mod macros;
pub mod scalar;

pub use dynamic::{DynRecord, FieldSpec, ScalarValue};
pub use scalar::{Scalar, ScalarKind, Slot, SlotError};

/// One named, writable field of a record.
pub struct Field<'a> {
    name: &'a str,
    slot: &'a mut dyn Slot,
}

impl<'a> Field<'a> {
    #[must_use]
    pub fn new(name: &'a str, slot: &'a mut dyn Slot) -> Self {
        Self { name, slot }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        self.slot.kind()
    }

    pub fn slot_mut(&mut self) -> &mut dyn Slot {
        &mut *self.slot
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// A destination type whose fields can be enumerated by name.
///
/// Implementations return every field in declared order. Use [`record!`] or
/// [`impl_record!`] rather than writing this by hand.
pub trait Record {
    fn fields(&mut self) -> Vec<Field<'_>>;
}

impl<R: Record + ?Sized> Record for &mut R {
    fn fields(&mut self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}
