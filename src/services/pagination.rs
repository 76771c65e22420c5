//! Page parsing and pagination arithmetic

/// Number of items on one page of any collection
pub const PAGE_SIZE: i64 = 20;

/// Parse a `page` query value
///
/// Absent, non-numeric or non-positive values all mean page 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Number of pages needed for `total` items
pub fn total_pages(total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

/// Row offset of the first item on `page`
pub fn offset(page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_page_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("2.5")), 1);
    }

    #[test]
    fn test_parse_page_valid() {
        assert_eq!(parse_page(Some("1")), 1);
        assert_eq!(parse_page(Some(" 7 ")), 7);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(20), 1);
        assert_eq!(total_pages(21), 2);
        assert_eq!(total_pages(13_000), 650);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1), 0);
        assert_eq!(offset(2), 20);
        assert_eq!(offset(i64::MAX), i64::MAX);
    }

    proptest! {
        /// Every item lands on exactly one page within `1..=total_pages`
        #[test]
        fn property_items_fit_pages(total in 1i64..1_000_000) {
            let pages = total_pages(total);
            prop_assert!(offset(pages) < total);
            prop_assert!(offset(pages + 1) >= total);
        }

        /// Any numeric string yields a positive page
        #[test]
        fn property_parse_page_is_positive(raw in "-?[0-9]{0,20}") {
            prop_assert!(parse_page(Some(&raw)) >= 1);
        }
    }
}
