//! Fixed-capacity descriptor tables addressed by index.
//!
//! A [`DescriptorHeap`] owns a contiguous run of slots of a single kind. Slots
//! are addressed by index only; the byte offset (`index * increment`) is
//! computed here and never by callers. Handles borrow the heap they came from,
//! so a heap cannot be dropped while one of its handles is still alive.

use crate::error::DescriptorError;

/// The kind of view a heap stores. Each kind has its own slot stride.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeapKind {
    RenderTarget,
    DepthStencil,
    ShaderResource,
}

impl HeapKind {
    /// Slot stride in bytes.
    pub const fn increment_size(&self) -> u64 {
        match self {
            HeapKind::RenderTarget => 32,
            HeapKind::DepthStencil => 32,
            HeapKind::ShaderResource => 64,
        }
    }

    /// Only shader-resource tables can be bound for the shaders to read.
    pub const fn shader_visible(&self) -> bool {
        matches!(self, HeapKind::ShaderResource)
    }
}

/// CPU (and, for shader-visible heaps, GPU) address of a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DescriptorHandle<'heap> {
    kind: HeapKind,
    index: u32,
    offset: u64,
    shader_visible: bool,
    _heap: std::marker::PhantomData<&'heap ()>,
}

impl DescriptorHandle<'_> {
    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Byte offset from the heap start on the CPU side.
    pub fn cpu_offset(&self) -> u64 {
        self.offset
    }

    /// Byte offset from the heap start on the GPU side, if the heap is visible
    /// to shaders.
    pub fn gpu_offset(&self) -> Option<u64> {
        self.shader_visible.then_some(self.offset)
    }
}

#[derive(Debug)]
enum Slot<T> {
    Free,
    Reserved(String),
    Occupied(T),
}

/// An index-addressed table of `capacity` slots.
#[derive(Debug)]
pub struct DescriptorHeap<T> {
    kind: HeapKind,
    slots: Vec<Slot<T>>,
}

impl<T> DescriptorHeap<T> {
    pub fn new(kind: HeapKind, capacity: u32) -> Self {
        let slots = (0..capacity).map(|_| Slot::Free).collect();
        Self { kind, slots }
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Handle for slot `index`. Fails if the index is past the end of the heap.
    pub fn handle_at(&self, index: u32) -> Result<DescriptorHandle<'_>, DescriptorError> {
        self.check_bounds(index)?;
        Ok(DescriptorHandle {
            kind: self.kind,
            index,
            offset: u64::from(index) * self.kind.increment_size(),
            shader_visible: self.kind.shader_visible(),
            _heap: std::marker::PhantomData,
        })
    }

    /// Marks a slot as owned by an external collaborator (e.g. the UI overlay).
    pub fn reserve(&mut self, index: u32, owner: &str) -> Result<(), DescriptorError> {
        self.check_bounds(index)?;
        self.ensure_not_reserved(index)?;
        self.slots[index as usize] = Slot::Reserved(owner.to_string());
        Ok(())
    }

    /// Stores a view in a slot, replacing whatever view was there.
    pub fn place(&mut self, index: u32, value: T) -> Result<(), DescriptorError> {
        self.check_bounds(index)?;
        self.ensure_not_reserved(index)?;
        self.slots[index as usize] = Slot::Occupied(value);
        Ok(())
    }

    /// First free slot after `index`, wrapping around to the start of the
    /// heap.
    pub fn next_free_after(&self, index: u32) -> Result<u32, DescriptorError> {
        let capacity = self.capacity();
        let start = index
            .checked_add(1)
            .filter(|start| *start < capacity)
            .unwrap_or(0);
        (start..capacity)
            .chain(0..start)
            .find(|&i| matches!(self.slots[i as usize], Slot::Free))
            .ok_or(DescriptorError::Full {
                kind: self.kind,
                capacity,
            })
    }

    pub fn get(&self, index: u32) -> Result<&T, DescriptorError> {
        self.check_bounds(index)?;
        match &self.slots[index as usize] {
            Slot::Occupied(value) => Ok(value),
            Slot::Reserved(owner) => Err(DescriptorError::Reserved {
                kind: self.kind,
                index,
                owner: owner.clone(),
            }),
            Slot::Free => Err(DescriptorError::Empty {
                kind: self.kind,
                index,
            }),
        }
    }

    pub fn resolve(&self, handle: &DescriptorHandle<'_>) -> Result<&T, DescriptorError> {
        self.get(handle.index())
    }

    fn check_bounds(&self, index: u32) -> Result<(), DescriptorError> {
        if index >= self.capacity() {
            return Err(DescriptorError::OutOfRange {
                kind: self.kind,
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    fn ensure_not_reserved(&self, index: u32) -> Result<(), DescriptorError> {
        if let Slot::Reserved(owner) = &self.slots[index as usize] {
            return Err(DescriptorError::Reserved {
                kind: self.kind,
                index,
                owner: owner.clone(),
            });
        }
        Ok(())
    }
}
