use serde::Serialize;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub count: usize,
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Parses the `page` query parameter. Absent, non-numeric or zero values
/// fall back to page 1.
pub fn page_number(param: Option<&str>) -> u32 {
    param
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// Slices an ordered sequence into a fixed-size page. Out-of-range page
/// numbers clamp to the nearest valid page instead of erroring.
pub fn paginate<T>(items: Vec<T>, requested_page: u32) -> Page<T> {
    let count = items.len();
    let total_pages = ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1) as u32;
    let page = requested_page.clamp(1, total_pages);
    let start = (page as usize - 1) * PAGE_SIZE;
    let items = items
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect::<Vec<T>>();
    Page {
        items,
        meta: PageMeta {
            page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
            count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeen_items_split_ten_and_seven() {
        let items = (0..17).collect::<Vec<i32>>();
        let first = paginate(items.clone(), 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0], 0);
        assert!(first.meta.has_next);
        assert!(!first.meta.has_previous);
        assert_eq!(first.meta.total_pages, 2);

        let second = paginate(items, 2);
        assert_eq!(second.items.len(), 7);
        assert_eq!(second.items[0], 10);
        assert!(!second.meta.has_next);
        assert!(second.meta.has_previous);
    }

    #[test]
    fn out_of_range_page_clamps() {
        let items = (0..17).collect::<Vec<i32>>();
        let page = paginate(items, 99);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.items.len(), 7);
    }

    #[test]
    fn empty_sequence_is_a_single_empty_page() {
        let page = paginate(Vec::<i32>::new(), 1);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.meta.has_next);
    }

    #[test]
    fn page_parameter_defaults_to_one() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some("abc")), 1);
        assert_eq!(page_number(Some("0")), 1);
        assert_eq!(page_number(Some("-2")), 1);
        assert_eq!(page_number(Some("3")), 3);
    }
}
