use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    /// 1-based index of the first row shown, 0 when the page is empty.
    pub range_start: usize,
    pub range_end: usize,
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    std::cmp::max(1, total.div_ceil(page_size))
}

/// `clamp(requested, 1, max(1, ceil(total / page_size)))`
pub fn clamp_page(requested: i64, total: usize, page_size: usize) -> usize {
    let last = total_pages(total, page_size);
    if requested < 1 {
        1
    } else {
        std::cmp::min(requested as u64, last as u64) as usize
    }
}

pub fn paginate<T: Clone>(items: &[&T], requested_page: i64, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(requested_page, total_count, page_size);

    let start = std::cmp::min((page - 1) * page_size, total_count);
    let end = std::cmp::min(start + page_size, total_count);
    let rows: Vec<T> = items[start..end].iter().map(|r| (*r).clone()).collect();
    let (range_start, range_end) = if rows.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        rows,
        total_count,
        total_pages,
        page,
        page_size,
        range_start,
        range_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn empty_input_is_one_empty_page() {
        let v = items(0);
        let refs: Vec<&usize> = v.iter().collect();
        let page = paginate(&refs, 3, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
        assert_eq!((page.range_start, page.range_end), (0, 0));
    }

    #[test]
    fn requested_page_is_clamped() {
        let v = items(25);
        let refs: Vec<&usize> = v.iter().collect();
        assert_eq!(paginate(&refs, 0, 10).page, 1);
        assert_eq!(paginate(&refs, -4, 10).page, 1);
        assert_eq!(paginate(&refs, 99, 10).page, 3);
        let last = paginate(&refs, 3, 10);
        assert_eq!(last.rows, vec![20, 21, 22, 23, 24]);
        assert_eq!((last.range_start, last.range_end), (21, 25));
    }

    #[test]
    fn pages_concatenate_to_the_full_sequence() {
        for (n, size) in [(0usize, 5usize), (1, 1), (19, 10), (20, 10), (21, 10), (7, 3)] {
            let v = items(n);
            let refs: Vec<&usize> = v.iter().collect();
            let first = paginate(&refs, 1, size);
            let mut all = Vec::new();
            for p in 1..=first.total_pages {
                all.extend(paginate(&refs, p as i64, size).rows);
            }
            assert_eq!(all, v, "n={} size={}", n, size);
        }
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let v = items(3);
        let refs: Vec<&usize> = v.iter().collect();
        let page = paginate(&refs, 2, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.rows, vec![1]);
    }
}
