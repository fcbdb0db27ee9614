/// "Load more" pagination over an already-fetched list
///
/// The visible count only grows. It may run past the end of the list; slicing always
/// clamps to the list length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    visible_count: usize,
}

impl Paginator {
    /// Creates a paginator showing one page; a zero page size is raised to one
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            visible_count: page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// First `min(visible_count, len)` items, in order
    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible_count.min(items.len())]
    }

    /// Reveals one more page
    pub fn load_more(&mut self) {
        self.visible_count = self.visible_count.saturating_add(self.page_size);
    }

    pub fn has_more<T>(&self, items: &[T]) -> bool {
        self.visible_count < items.len()
    }
}
