/// Page offsets step by `page_size` and slots cycle `0..page_size`. Exactly `total` pairs are produced.
pub fn record_slots(total: usize, page_size: usize) -> impl Iterator<Item = (usize, usize)> {
    let page_size = page_size.max(1);
    (0..total).map(move |i| ((i / page_size) * page_size, i % page_size))
}

/// Formats `template` once per slot, replacing `{page}` and `{rec}`.
pub fn record_urls(template: &str, total: usize, page_size: usize) -> Vec<String> {
    record_slots(total, page_size)
        .map(|(page, rec)| {
            template
                .replace("{page}", &page.to_string())
                .replace("{rec}", &rec.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncated_to_total() {
        let slots = record_slots(25, 10).collect_vec();
        assert_eq!(slots.len(), 25);
        assert_eq!(slots[0], (0, 0));
        assert_eq!(slots[9], (0, 9));
        assert_eq!(slots[10], (10, 0));
        assert_eq!(slots[19], (10, 9));
        assert_eq!(&slots[20..], &[(20, 0), (20, 1), (20, 2), (20, 3), (20, 4)]);
    }

    #[test]
    fn test_pages_non_decreasing_and_slots_cycle() {
        for total in [0, 1, 9, 10, 11, 99, 100, 101, 257] {
            let slots = record_slots(total, 10).collect_vec();
            assert_eq!(slots.len(), total);
            for (i, (page, rec)) in slots.iter().enumerate() {
                assert_eq!(page % 10, 0);
                assert_eq!(*rec, i % 10);
            }
            assert!(slots.windows(2).all(|w| w[0].0 <= w[1].0));
        }
    }

    #[test]
    fn test_zero_page_size() {
        assert_eq!(record_slots(3, 0).collect_vec(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_record_urls() {
        let urls = record_urls("https://example.com/record?p={page}&rec={rec}", 12, 10);
        assert_eq!(urls.len(), 12);
        assert_eq!(urls[0], "https://example.com/record?p=0&rec=0");
        assert_eq!(urls[11], "https://example.com/record?p=10&rec=1");
    }
}
