//! Sharded type interner.
//!
//! Provides O(1) type interning, lookup, and equality comparison via
//! `TypeId`. Follows the same sharding pattern as `StringInterner` in
//! `weir_ir`: per-shard `RwLock` over an `FxHashMap` keyed by structural
//! data, with a double-checked insert on the write path.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use std::hash::{Hash, Hasher};

use weir_ir::{Name, TypeId};

use crate::data::{FuncType, StructField, TypeData};
use crate::error::TypeError;

/// Error when interning a type fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeInternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize },
}

impl std::fmt::Display for TypeInternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeInternError::ShardOverflow { shard_idx } => {
                write!(f, "type interner shard {shard_idx} exceeded capacity")
            }
        }
    }
}

impl std::error::Error for TypeInternError {}

/// Per-shard storage for interned types.
struct TypeShard {
    /// Map from type data to local index for deduplication.
    map: FxHashMap<TypeData, u32>,
    /// Storage for type data, indexed by local index.
    types: Vec<TypeData>,
}

impl TypeShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            types: Vec::with_capacity(64),
        }
    }

    /// Create shard 0 with pre-interned parameterless types.
    fn with_primitives() -> Self {
        let mut shard = Self::new();

        // Fixed indices matching the TypeId constants.
        let primitives = [
            TypeData::Bool,   // 0 = TypeId::BOOL
            TypeData::InfInt, // 1 = TypeId::INFINT
            TypeData::Void,   // 2 = TypeId::VOID
        ];

        for (idx, data) in primitives.into_iter().enumerate() {
            shard.map.insert(data.clone(), idx as u32);
            shard.types.push(data);
        }

        shard
    }
}

/// Sharded type interner.
///
/// One interner is scoped to one compilation context. All construction calls
/// within the context share it, so structurally equal requests always return
/// the identical `TypeId`.
pub struct TypeInterner {
    shards: [RwLock<TypeShard>; TypeId::NUM_SHARDS],
}

impl TypeInterner {
    /// Create a new interner with pre-interned parameterless types.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(TypeShard::with_primitives())
            } else {
                RwLock::new(TypeShard::new())
            }
        });

        Self { shards }
    }

    /// Compute shard index for a type based on its hash.
    #[inline]
    fn shard_for(data: &TypeData) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        data.hash(&mut hasher);
        (hasher.finish() as usize) % TypeId::NUM_SHARDS
    }

    /// Try to intern a type, returning its `TypeId` or an error on overflow.
    ///
    /// If the type is already interned, returns the existing `TypeId`.
    pub fn try_intern(&self, data: TypeData) -> Result<TypeId, TypeInternError> {
        // Fast path for the pre-interned parameterless types.
        match &data {
            TypeData::Bool => return Ok(TypeId::BOOL),
            TypeData::InfInt => return Ok(TypeId::INFINT),
            TypeData::Void => return Ok(TypeId::VOID),
            _ => {}
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        // Fast path: already interned.
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(TypeId::from_shard_local(shard_idx as u32, local));
            }
        }

        // Slow path: insert under the write lock.
        let mut guard = shard.write();

        // Double-check after acquiring write lock.
        if let Some(&local) = guard.map.get(&data) {
            return Ok(TypeId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.types.len())
            .ok()
            .filter(|&l| l <= TypeId::MAX_LOCAL)
            .ok_or(TypeInternError::ShardOverflow { shard_idx })?;

        tracing::trace!(?data, shard_idx, local, "interning type");
        guard.types.push(data.clone());
        guard.map.insert(data, local);

        Ok(TypeId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a type, returning its `TypeId`.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible
    /// interning.
    pub fn intern(&self, data: TypeData) -> TypeId {
        self.try_intern(data).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the type data for a `TypeId`.
    ///
    /// # Panics
    /// Panics if the `TypeId` was not created by this interner.
    pub fn lookup(&self, id: TypeId) -> TypeData {
        let guard = self.shards[id.shard()].read();
        guard.types[id.local()].clone()
    }

    // Convenience constructors. All go through `intern()`, so structurally
    // equal requests return the same `TypeId`.

    /// The boolean type.
    pub fn bool(&self) -> TypeId {
        TypeId::BOOL
    }

    /// The arbitrary-precision integer type.
    pub fn infint(&self) -> TypeId {
        TypeId::INFINT
    }

    /// The void type.
    pub fn void(&self) -> TypeId {
        TypeId::VOID
    }

    /// A fixed-width integer type: `int<W>` when signed, `bit<W>` otherwise.
    ///
    /// Width 0 is accepted; nothing in the construction path checks a
    /// minimum width.
    pub fn bits(&self, width: u32, signed: bool) -> TypeId {
        self.intern(TypeData::Bits { width, signed })
    }

    /// A function type. `ret` of `None` means void.
    ///
    /// Passing `Some(TypeId::VOID)` is representable but violates the
    /// function-type invariant; the function-entity verifier rejects it.
    pub fn function(&self, inputs: impl Into<Box<[TypeId]>>, ret: Option<TypeId>) -> TypeId {
        self.intern(TypeData::Function {
            inputs: inputs.into(),
            ret,
        })
    }

    /// A struct type with uniquely named fields.
    ///
    /// Fails with a duplicate-field-name error naming *every* duplicate;
    /// nothing is interned on failure.
    pub fn try_struct(
        &self,
        fields: impl Into<Box<[StructField]>>,
    ) -> Result<TypeId, TypeError> {
        let fields = fields.into();

        let mut seen: FxHashSet<Name> = FxHashSet::default();
        seen.reserve(fields.len());
        let mut duplicates = Vec::new();
        for field in &fields {
            if !seen.insert(field.name) {
                duplicates.push(field.name);
            }
        }
        if !duplicates.is_empty() {
            return Err(TypeError::DuplicateFields { duplicates });
        }

        Ok(self.intern(TypeData::Struct { fields }))
    }

    /// Unpack a function type. Returns `None` for non-function types.
    pub fn function_parts(&self, id: TypeId) -> Option<FuncType> {
        match self.lookup(id) {
            TypeData::Function { inputs, ret } => Some(FuncType { inputs, ret }),
            _ => None,
        }
    }

    /// The fields of a struct type. Returns `None` for non-struct types.
    pub fn struct_fields(&self, id: TypeId) -> Option<Box<[StructField]>> {
        match self.lookup(id) {
            TypeData::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    /// The type of a struct's field, looked up by name.
    pub fn field_type(&self, id: TypeId, name: Name) -> Option<TypeId> {
        self.struct_fields(id)?
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ty)
    }

    /// The index of a struct's field, looked up by name.
    pub fn field_index(&self, id: TypeId, name: Name) -> Option<usize> {
        self.struct_fields(id)?
            .iter()
            .position(|f| f.name == name)
    }

    /// Get the number of interned types.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().types.len()).sum()
    }

    /// Check if the interner holds only the pre-interned types.
    pub fn is_empty(&self) -> bool {
        self.len() <= 3
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weir_ir::StringInterner;

    #[test]
    fn test_structural_interning_identity() {
        let types = TypeInterner::new();
        let a = types.bits(16, false);
        let b = types.bits(16, false);
        assert_eq!(a, b);

        let c = types.bits(16, true);
        assert_ne!(a, c);

        let f1 = types.function([a, c], Some(a));
        let f2 = types.function([a, c], Some(a));
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_primitives_fixed_ids() {
        let types = TypeInterner::new();
        assert_eq!(types.intern(TypeData::Bool), TypeId::BOOL);
        assert_eq!(types.intern(TypeData::InfInt), TypeId::INFINT);
        assert_eq!(types.intern(TypeData::Void), TypeId::VOID);
        assert!(types.is_empty());
    }

    #[test]
    fn test_zero_width_bits_accepted() {
        // Nothing in the construction path checks a minimum width.
        let types = TypeInterner::new();
        let z = types.bits(0, false);
        assert_eq!(types.bits(0, false), z);
        assert_ne!(types.bits(0, true), z);
    }

    #[test]
    fn test_struct_duplicate_fields_rejected() {
        let strings = StringInterner::new();
        let types = TypeInterner::new();
        let a = strings.intern("a");
        let b = strings.intern("b");

        let before = types.len();
        let result = types.try_struct([
            StructField::new(a, TypeId::BOOL),
            StructField::new(a, types.bits(8, false)),
        ]);
        let Err(TypeError::DuplicateFields { duplicates }) = result else {
            panic!("expected duplicate-field error");
        };
        assert_eq!(duplicates, vec![a]);
        // bits(8) interned above, but no struct was.
        assert_eq!(types.len(), before + 1);

        let ok = types.try_struct([
            StructField::new(a, TypeId::BOOL),
            StructField::new(b, types.bits(8, false)),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_struct_all_duplicates_reported() {
        let strings = StringInterner::new();
        let types = TypeInterner::new();
        let a = strings.intern("a");
        let b = strings.intern("b");
        let c = strings.intern("c");

        let result = types.try_struct([
            StructField::new(a, TypeId::BOOL),
            StructField::new(b, TypeId::BOOL),
            StructField::new(a, TypeId::BOOL),
            StructField::new(c, TypeId::BOOL),
            StructField::new(b, TypeId::BOOL),
        ]);
        let Err(TypeError::DuplicateFields { duplicates }) = result else {
            panic!("expected duplicate-field error");
        };
        assert_eq!(duplicates, vec![a, b]);
    }

    #[test]
    fn test_function_parts() {
        let types = TypeInterner::new();
        let b16 = types.bits(16, false);
        let void_fn = types.function([b16], None);
        let parts = types.function_parts(void_fn);
        let Some(parts) = parts else {
            panic!("expected a function type");
        };
        assert!(parts.is_void());
        assert_eq!(parts.return_type(), TypeId::VOID);
        assert_eq!(&*parts.inputs, &[b16]);

        assert!(types.function_parts(TypeId::BOOL).is_none());
    }

    #[test]
    fn test_field_lookup_by_name() {
        let strings = StringInterner::new();
        let types = TypeInterner::new();
        let x = strings.intern("x");
        let y = strings.intern("y");
        let b8 = types.bits(8, false);

        let st = types
            .try_struct([StructField::new(x, TypeId::BOOL), StructField::new(y, b8)])
            .unwrap_or_else(|e| panic!("{e:?}"));

        assert_eq!(types.field_type(st, y), Some(b8));
        assert_eq!(types.field_index(st, x), Some(0));
        assert_eq!(types.field_type(st, strings.intern("z")), None);
        assert_eq!(types.field_index(st, strings.intern("z")), None);
    }
}
