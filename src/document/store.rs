//! Index-addressed section arena.
//!
//! Slots are materialized explicitly through [`SectionStore::ensure_section`],
//! which also fills every hole before the requested index with defaults.
//! Indexes above [`MAX_SECTION_INDEX`] are never materialized.
//!
//! Each slot carries a [`Generation`] drawn from one store-wide counter. A
//! slot gets a fresh one whenever its image is reclaimed, it is reset, or the
//! store is replaced, so results of background work aimed at an older
//! generation can be told apart and dropped. Generations never repeat.

use super::section::Section;

/// Maximum number of sections `add_section` will create.
pub const MAX_SECTIONS: usize = 4;

/// Highest index a section edit may materialize (0-based).
pub const MAX_SECTION_INDEX: usize = 63;

/// Per-slot counter identifying one claim on a slot's image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[inline]
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    section: Section,
    generation: Generation,
}

#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    slots: Vec<Slot>,
    /// Last generation handed out; `Generation(0)` is never handed out.
    last_generation: Generation,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.slots.get(index).map(|slot| &slot.section)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Section> {
        self.slots.iter().map(|slot| &slot.section)
    }

    /// Whether `index` may be materialized.
    #[inline]
    pub const fn in_range(index: usize) -> bool {
        index <= MAX_SECTION_INDEX
    }

    /// Materialize `index` and every hole before it, then return the section.
    ///
    /// Holes get default sections; only a newly created slot at `index` is
    /// built with `make()`. Callers check [`in_range`](Self::in_range) first.
    pub fn ensure_section_with(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Section,
    ) -> &mut Section {
        debug_assert!(Self::in_range(index), "section index {index} out of range");
        if index >= self.slots.len() {
            self.slots.resize_with(index, Slot::default);
            self.slots.push(Slot {
                section: make(),
                generation: Generation::default(),
            });
        }
        &mut self.slots[index].section
    }

    /// Materialize `index` (and holes) with default sections.
    pub fn ensure_section(&mut self, index: usize) -> &mut Section {
        self.ensure_section_with(index, Section::default)
    }

    /// Append a default section, returning its index.
    ///
    /// `None` when the store already holds [`MAX_SECTIONS`] or more.
    pub fn push(&mut self) -> Option<usize> {
        if self.slots.len() >= MAX_SECTIONS {
            return None;
        }
        self.slots.push(Slot::default());
        Some(self.slots.len() - 1)
    }

    /// Current generation of a slot. Unmaterialized slots report `None`.
    pub fn generation(&self, index: usize) -> Option<Generation> {
        self.slots.get(index).map(|slot| slot.generation)
    }

    /// Materialize `index` and start a new generation for it.
    pub fn claim(&mut self, index: usize) -> Generation {
        self.ensure_section(index);
        let generation = self.fresh_generation();
        self.slots[index].generation = generation;
        generation
    }

    fn fresh_generation(&mut self) -> Generation {
        self.last_generation = self.last_generation.next();
        self.last_generation
    }

    /// Restore defaults at `index` and invalidate outstanding claims.
    pub fn reset(&mut self, index: usize) {
        self.claim(index);
        self.slots[index].section = Section::default();
    }

    /// Replace the contents wholesale (used by import).
    ///
    /// Every slot starts a fresh generation, so decodes claimed before the
    /// replacement can never land in the new contents.
    pub fn replace(&mut self, sections: impl IntoIterator<Item = Section>) {
        let sections: Vec<Section> = sections.into_iter().collect();
        self.slots = Vec::with_capacity(sections.len());
        for section in sections {
            let generation = self.fresh_generation();
            self.slots.push(Slot { section, generation });
        }
    }
}
