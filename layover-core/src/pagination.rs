use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Index range of a 1-indexed page, clamped to `len`. Pages past the end
/// yield an empty range.
pub fn page_bounds(page: u32, page_size: usize, len: usize) -> Range<usize> {
    let start = (page.saturating_sub(1) as usize)
        .checked_mul(page_size)
        .unwrap_or(usize::MAX)
        .min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn paginate<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    &items[page_bounds(page, page_size, items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slices() {
        let items: Vec<usize> = (0..12).collect();
        assert_eq!(paginate(&items, 1, DEFAULT_PAGE_SIZE), &[0, 1, 2, 3, 4]);
        assert_eq!(paginate(&items, 2, DEFAULT_PAGE_SIZE), &[5, 6, 7, 8, 9]);
        assert_eq!(paginate(&items, 3, DEFAULT_PAGE_SIZE), &[10, 11]);
        assert!(paginate(&items, 10, DEFAULT_PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_extreme_pages_do_not_overflow() {
        assert_eq!(page_bounds(u32::MAX, usize::MAX, 3), 3..3);
        assert_eq!(page_bounds(0, 5, 12), 0..5);
    }
}
