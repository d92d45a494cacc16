/// One fetched page: its items in server order and the link to the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The decoded items of this page.
    pub items: Vec<T>,
    /// Opaque pointer to the next page. `None` on the last page.
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(items: Vec<T>, next_link: Option<String>) -> Self {
        Self { items, next_link }
    }

    /// Creates the last page of a listing.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Returns whether the server announced another page.
    pub fn has_next(&self) -> bool {
        self.next_link.is_some()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
