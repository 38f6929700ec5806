//! Running result list under pagination.

use crate::types::ResultPage;

/// Items loaded so far for one query, plus pagination cursor.
///
/// Page 1 replaces the list, any later page appends to it. Provider
/// ordering is preserved and nothing is deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultAccumulator<T> {
    items: Vec<T>,
    current_page: u32,
    total_pages: u32,
}

impl<T> Default for ResultAccumulator<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            total_pages: 0,
        }
    }
}

impl<T> ResultAccumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `page` into `self`, producing the next state.
    pub fn merged(mut self, page: ResultPage<T>) -> Self {
        if page.page_number <= 1 {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.current_page = page.page_number;
        self.total_pages = page.total_pages;
        self
    }

    /// In-place form of [`Self::merged`].
    pub fn absorb(&mut self, page: ResultPage<T>) {
        let previous = std::mem::take(self);
        *self = previous.merged(page);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn page(items: Vec<u32>, page_number: u32, total_pages: u32) -> ResultPage<u32> {
        ResultPage {
            items,
            page_number,
            total_pages,
            total_results: None,
        }
    }

    #[test]
    fn test_load_more_appends_in_order() {
        let first: Vec<u32> = (0..10).collect();
        let second: Vec<u32> = (10..20).collect();

        let acc = ResultAccumulator::new().merged(page(first.clone(), 1, 5));
        assert!(acc.has_more_pages());

        let acc = acc.merged(page(second.clone(), 2, 5));
        assert_eq!(acc.len(), 20);
        assert_eq!(&acc.items()[..10], first.as_slice());
        assert_eq!(&acc.items()[10..], second.as_slice());
        assert_eq!(acc.current_page(), 2);
    }

    #[test]
    fn test_duplicates_across_pages_are_kept() {
        let mut acc = ResultAccumulator::new();
        acc.absorb(page(vec![1, 2], 1, 2));
        acc.absorb(page(vec![2, 3], 2, 2));
        assert_eq!(acc.items(), &[1, 2, 2, 3]);
        assert!(!acc.has_more_pages());
    }

    #[test]
    fn test_empty_accumulator_has_no_more_pages() {
        let acc: ResultAccumulator<u32> = ResultAccumulator::new();
        assert!(!acc.has_more_pages());
        assert!(acc.is_empty());
    }

    proptest! {
        #[test]
        fn prop_later_pages_append(
            previous in proptest::collection::vec(any::<u32>(), 0..40),
            incoming in proptest::collection::vec(any::<u32>(), 0..40),
            page_number in 2u32..50,
            total_pages in 0u32..60,
        ) {
            let acc = ResultAccumulator::new().merged(page(previous.clone(), 1, 60));
            let next = acc.merged(page(incoming.clone(), page_number, total_pages));

            prop_assert_eq!(next.len(), previous.len() + incoming.len());
            prop_assert_eq!(&next.items()[..previous.len()], previous.as_slice());
            prop_assert_eq!(&next.items()[previous.len()..], incoming.as_slice());
            prop_assert_eq!(next.current_page(), page_number);
            prop_assert_eq!(next.total_pages(), total_pages);
        }

        #[test]
        fn prop_first_page_replaces(
            previous in proptest::collection::vec(any::<u32>(), 0..40),
            previous_page in 1u32..10,
            incoming in proptest::collection::vec(any::<u32>(), 0..40),
            total_pages in 0u32..60,
        ) {
            let acc = ResultAccumulator::new().merged(page(previous, previous_page, 10));
            let next = acc.clone().merged(page(incoming.clone(), 1, total_pages));
            prop_assert_eq!(next.items(), incoming.as_slice());

            // Replaying the same first page gives the same list
            let replayed = next.clone().merged(page(incoming.clone(), 1, total_pages));
            prop_assert_eq!(replayed, next);
        }

        #[test]
        fn prop_has_more_pages_iff_behind(current in 1u32..100, total in 0u32..100) {
            let acc = ResultAccumulator::new().merged(page(Vec::<u32>::new(), current, total));
            prop_assert_eq!(acc.has_more_pages(), current < total);
        }
    }
}
