use crate::error::{KernelError, Result};

/// A contiguous run of RAM cells, either free or owned by one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBlock {
    pub start: usize,
    pub length: usize,
    pub allocated: bool,
}

impl MemoryBlock {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Refers to an allocated block by its start address. Allocated blocks are
/// never split or merged, so the start stays valid until deallocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    start: usize,
}

impl BlockHandle {
    pub fn start(&self) -> usize {
        self.start
    }
}

/// Simulated RAM: one script line per cell, partitioned into address-ordered
/// blocks handed out first-fit.
pub struct Memory {
    cells: Vec<String>,
    blocks: Vec<MemoryBlock>,
    free_capacity: usize,
}

impl Memory {
    pub fn new(size: usize) -> Memory {
        Memory {
            cells: vec![String::new(); size],
            blocks: vec![MemoryBlock {
                start: 0,
                length: size,
                allocated: false,
            }],
            free_capacity: size,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn free_capacity(&self) -> usize {
        self.free_capacity
    }

    pub fn largest_free_block(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| !block.allocated)
            .map(|block| block.length)
            .max()
            .unwrap_or(0)
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    /// Carves `size` cells out of the first free block large enough to hold
    /// them. The block list is untouched on failure.
    pub fn allocate(&mut self, size: usize) -> Result<BlockHandle> {
        if size == 0 {
            return Err(KernelError::ZeroSizedAllocation);
        }

        let idx = self
            .blocks
            .iter()
            .position(|block| !block.allocated && block.length >= size)
            .ok_or_else(|| KernelError::OutOfMemory {
                requested: size,
                free: self.free_capacity,
                largest_free: self.largest_free_block(),
            })?;

        let start = self.blocks[idx].start;
        if self.blocks[idx].length == size {
            self.blocks[idx].allocated = true;
        } else {
            let remainder = &mut self.blocks[idx];
            remainder.start += size;
            remainder.length -= size;
            self.blocks.insert(
                idx,
                MemoryBlock {
                    start,
                    length: size,
                    allocated: true,
                },
            );
        }

        self.free_capacity -= size;
        Ok(BlockHandle { start })
    }

    /// Frees the block and merges every run of adjacent free blocks.
    /// Returns the number of cells released.
    pub fn deallocate(&mut self, handle: BlockHandle) -> Result<usize> {
        let idx = self.find_allocated(handle)?;
        let block = &mut self.blocks[idx];
        block.allocated = false;
        let length = block.length;

        self.free_capacity += length;
        self.coalesce();
        Ok(length)
    }

    pub fn block(&self, handle: BlockHandle) -> Result<MemoryBlock> {
        self.find_allocated(handle).map(|idx| self.blocks[idx])
    }

    pub fn read_line(&self, address: usize) -> &str {
        if address >= self.capacity() {
            panic!("Out of bounds memory access. Address {} is outside RAM", address);
        }

        &self.cells[address]
    }

    pub fn write_line(&mut self, address: usize, text: impl Into<String>) {
        if address >= self.capacity() {
            panic!("Out of bounds memory access. Address {} is outside RAM", address);
        }

        self.cells[address] = text.into();
    }

    pub fn write_block_to<S: AsRef<str>>(&mut self, address: usize, lines: &[S]) {
        if address + lines.len() > self.capacity() {
            panic!("Out of bounds memory access");
        }

        for (offset, line) in lines.iter().enumerate() {
            self.cells[address + offset] = line.as_ref().to_string();
        }
    }

    /// Drops all stored lines and returns to a single free block.
    pub fn clear(&mut self) {
        let size = self.capacity();
        *self = Memory::new(size);
    }

    fn find_allocated(&self, handle: BlockHandle) -> Result<usize> {
        match self
            .blocks
            .binary_search_by_key(&handle.start, |block| block.start)
        {
            Ok(idx) if self.blocks[idx].allocated => Ok(idx),
            _ => Err(KernelError::UnknownBlock {
                start: handle.start,
            }),
        }
    }

    fn coalesce(&mut self) {
        self.blocks.dedup_by(|next, kept| {
            if kept.allocated || next.allocated {
                return false;
            }
            kept.length += next.length;
            true
        });
    }
}
