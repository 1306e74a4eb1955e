//! Splitting an ordered selection into fixed-size pages.

use crate::config::ConfigError;

/// Number of pages needed for `count` items at `per_page` items each
pub fn total_pages(count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(per_page)
}

/// Split `items` into pages of at most `per_page` items, preserving order.
///
/// Only the last page may be short.
pub fn chunk<T>(items: Vec<T>, per_page: usize) -> Result<Vec<Vec<T>>, ConfigError> {
    if per_page == 0 {
        return Err(ConfigError::InvalidValue {
            field: "perPage".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let mut pages = Vec::with_capacity(total_pages(items.len(), per_page));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        pages.push(iter.by_ref().take(per_page).collect());
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 2), 3);
        assert_eq!(total_pages(4, 2), 2);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn test_chunk_preserves_order() {
        let items: Vec<u32> = (1..=7).collect();
        let pages = chunk(items.clone(), 3).unwrap();

        assert_eq!(pages, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(pages.len(), total_pages(items.len(), 3));
        assert_eq!(pages.concat(), items);
    }

    #[test]
    fn test_chunk_page_sizes() {
        for n in 0..20usize {
            for per_page in 1..6usize {
                let pages = chunk((0..n).collect::<Vec<_>>(), per_page).unwrap();
                assert_eq!(pages.len(), total_pages(n, per_page));
                assert!(pages.iter().all(|p| !p.is_empty() && p.len() <= per_page));
                assert_eq!(pages.concat(), (0..n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_zero_page_size_is_error() {
        assert!(chunk(vec![1, 2, 3], 0).is_err());
    }
}
