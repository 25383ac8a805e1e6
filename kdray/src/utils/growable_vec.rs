use std::ops::{Index, IndexMut};

/// Append-only vector with an explicit growth policy: it starts at
/// [`Self::MIN_CAPACITY`] items and then doubles whenever the next append
/// wouldn't fit.
#[derive(Clone, Debug)]
pub struct GrowableVec<T> {
    items: Vec<T>,
    capacity: usize,
    label: &'static str,
}

impl<T> GrowableVec<T> {
    pub const MIN_CAPACITY: usize = 512;

    pub fn new(label: &'static str) -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
            label,
        }
    }

    pub fn push(&mut self, item: T) {
        self.reserve_for(1);
        self.items.push(item);
    }

    /// Makes sure that `additional` more items can be appended without
    /// reallocating.
    pub fn reserve_for(&mut self, additional: usize) {
        let required = self.items.len() + additional;

        if required <= self.capacity {
            return;
        }

        let mut capacity = self.capacity;

        while capacity < required {
            capacity = if capacity <= Self::MIN_CAPACITY / 2 {
                Self::MIN_CAPACITY
            } else {
                capacity * 2
            };
        }

        log::debug!(
            "Growing `{}`; len={}, capacity={} -> {}",
            self.label,
            self.items.len(),
            self.capacity,
            capacity,
        );

        self.items.reserve_exact(capacity - self.items.len());
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Extend<T> for GrowableVec<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();

        self.reserve_for(iter.size_hint().0);

        for item in iter {
            self.push(item);
        }
    }
}

impl<T> Index<usize> for GrowableVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for GrowableVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}
