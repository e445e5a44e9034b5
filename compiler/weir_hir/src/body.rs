//! Flat arena storage for one function body.
//!
//! Values, operations, blocks, and regions live in per-kind vectors indexed
//! by their ids. Ownership follows the region tree: a body owns its regions,
//! a region owns an ordered list of blocks, a block owns an ordered list of
//! operations. Erased operations are unlinked from their block and their
//! arena slot becomes unreachable.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::TypeId;

use crate::ids::{BlockId, OpId, RegionId, ValueId};
use crate::op::{OpData, OpKind};

/// Where a value comes from: one defining operation or one block parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueDef {
    OpResult(OpId),
    BlockParam { block: BlockId, index: u32 },
}

/// A value: exactly one type, exactly one definition, any number of readers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ValueData {
    pub ty: TypeId,
    pub def: ValueDef,
}

/// An ordered list of operations with typed parameters.
#[derive(Clone, Debug, Default)]
pub struct Block {
    /// The region this block belongs to.
    pub region: RegionId,
    pub params: Vec<ValueId>,
    pub ops: Vec<OpId>,
}

/// An ordered list of blocks.
#[derive(Clone, Debug, Default)]
pub struct Region {
    pub blocks: Vec<BlockId>,
}

/// Arena for one function body.
#[derive(Clone, Debug)]
pub struct Body {
    values: Vec<ValueData>,
    ops: Vec<OpData>,
    blocks: Vec<Block>,
    regions: Vec<Region>,
    entry: RegionId,
}

impl Body {
    /// Create a body with an empty entry region containing one entry block
    /// whose parameters have the given types.
    pub(crate) fn new(param_tys: &[TypeId]) -> Self {
        let mut body = Body {
            values: Vec::new(),
            ops: Vec::new(),
            blocks: Vec::new(),
            regions: Vec::new(),
            entry: RegionId::new(0),
        };
        let entry = body.new_region();
        body.entry = entry;
        body.append_block(entry, param_tys);
        body
    }

    /// The function body region.
    pub fn entry_region(&self) -> RegionId {
        self.entry
    }

    /// The entry block of the function body region.
    pub fn entry_block(&self) -> BlockId {
        self.regions[self.entry.index()].blocks[0]
    }

    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id.index()]
    }

    pub fn value_type(&self, id: ValueId) -> TypeId {
        self.values[id.index()].ty
    }

    pub fn op(&self, id: OpId) -> &OpData {
        &self.ops[id.index()]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    pub(crate) fn new_region(&mut self) -> RegionId {
        let id = RegionId::new(self.regions.len());
        self.regions.push(Region::default());
        id
    }

    /// Append a new block with the given parameter types to a region.
    pub(crate) fn append_block(&mut self, region: RegionId, param_tys: &[TypeId]) -> BlockId {
        let id = BlockId::new(self.blocks.len());
        let params = param_tys
            .iter()
            .enumerate()
            .map(|(index, &ty)| {
                self.new_value(
                    ty,
                    ValueDef::BlockParam {
                        block: id,
                        index: index as u32,
                    },
                )
            })
            .collect();
        self.blocks.push(Block {
            region,
            params,
            ops: Vec::new(),
        });
        self.regions[region.index()].blocks.push(id);
        id
    }

    pub(crate) fn new_value(&mut self, ty: TypeId, def: ValueDef) -> ValueId {
        let id = ValueId::new(self.values.len());
        self.values.push(ValueData { ty, def });
        id
    }

    /// Append an operation to a block and give it its results.
    ///
    /// Callers run verification *before* this; a failed operation is never
    /// inserted.
    pub(crate) fn push_op(
        &mut self,
        block: BlockId,
        kind: OpKind,
        operands: smallvec::SmallVec<[ValueId; 2]>,
        result_tys: &[TypeId],
        span: weir_ir::Span,
    ) -> OpId {
        let id = OpId::new(self.ops.len());
        let results = result_tys
            .iter()
            .map(|&ty| self.new_value(ty, ValueDef::OpResult(id)))
            .collect();
        self.ops.push(OpData {
            kind,
            operands,
            results,
            span,
            block,
        });
        self.blocks[block.index()].ops.push(id);
        id
    }

    /// The block's terminator, if its last operation is one.
    pub fn terminator(&self, block: BlockId) -> Option<OpId> {
        let &last = self.blocks[block.index()].ops.last()?;
        self.ops[last.index()].kind.is_terminator().then_some(last)
    }

    pub fn is_terminated(&self, block: BlockId) -> bool {
        self.terminator(block).is_some()
    }

    /// Operations reading a value, in arena order.
    ///
    /// Scans the live (block-linked) operations; erased operations do not
    /// count as uses.
    pub fn uses_of(&self, value: ValueId) -> Vec<OpId> {
        let mut uses = Vec::new();
        for block in &self.blocks {
            for &op in &block.ops {
                if self.ops[op.index()].operands.contains(&value) {
                    uses.push(op);
                }
            }
        }
        uses
    }

    /// Erase an operation from its block.
    ///
    /// Fails if any of the operation's results still has uses; redirect or
    /// erase the users first.
    pub fn erase_op(&mut self, op: OpId) -> Result<(), Diagnostic> {
        let data = &self.ops[op.index()];
        let span = data.span;
        for &result in data.results.clone().iter() {
            let uses = self.uses_of(result);
            if !uses.is_empty() {
                return Err(Diagnostic::error(ErrorCode::E3017)
                    .with_message(format!(
                        "cannot erase '{}': result still has {} use(s)",
                        self.ops[op.index()].kind.mnemonic(),
                        uses.len()
                    ))
                    .with_label(span, "erased operation defined here"));
            }
        }
        let block = self.ops[op.index()].block;
        self.blocks[block.index()].ops.retain(|&o| o != op);
        Ok(())
    }

    /// All live operations of a region, outermost blocks in order.
    pub fn region_ops(&self, region: RegionId) -> impl Iterator<Item = OpId> + '_ {
        self.regions[region.index()]
            .blocks
            .iter()
            .flat_map(|&b| self.blocks[b.index()].ops.iter().copied())
    }
}
