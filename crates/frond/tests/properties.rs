//! Properties of the pure helpers behind pagination, range sliders, field
//! filters and the recently viewed list.

#[cfg(test)]
mod tests {
    use frond::{
        storage::{MemoryStorage, RecentItem, RecentList},
        widgets::{
            input::{
                range::{Thumb, clamp_thumbs, group_digits, parse_digits},
                sanitize::{digits_only, has_emoji, letters_only, strip_emoji},
            },
            pagination::{Slot, page_count, window},
        },
    };
    use proptest::prelude::*;

    fn item(slug: u8) -> RecentItem {
        RecentItem {
            id: format!("/p/{slug}"),
            name: format!("Product {slug}"),
            url: format!("https://www.example.com/p/{slug}"),
            slug: format!("/p/{slug}"),
            image: String::new(),
            listing_image_type: None,
        }
    }

    proptest! {
        #[test]
        fn page_window_shape(total in 1usize..200, current in 0usize..250) {
            let slots = window(current, total);
            let pages: Vec<usize> = slots
                .iter()
                .filter_map(|s| match s {
                    Slot::Page(n) => Some(*n),
                    Slot::Ellipsis => None,
                })
                .collect();
            prop_assert_eq!(pages.first().copied(), Some(1));
            prop_assert_eq!(pages.last().copied(), Some(total));
            prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(pages.contains(&current.clamp(1, total)));
            prop_assert!(slots.len() <= 7);
            // Ellipses only stand in for skipped pages, never adjacent ones.
            for (i, s) in slots.iter().enumerate() {
                if *s == Slot::Ellipsis {
                    let (Slot::Page(a), Slot::Page(b)) = (slots[i - 1], slots[i + 1]) else {
                        prop_assert!(false, "ellipsis next to ellipsis");
                        unreachable!();
                    };
                    prop_assert!(b > a + 1);
                }
            }
        }

        #[test]
        fn page_count_covers_results(results in 0usize..10_000, size in 1usize..100) {
            let pages = page_count(results, size);
            prop_assert!(pages >= 1);
            prop_assert!(pages * size >= results);
            prop_assert!(pages == 1 || (pages - 1) * size < results);
        }

        #[test]
        fn thumbs_keep_their_gap(
            low in -1000i64..1000,
            high in -1000i64..1000,
            gap in 0i64..100,
            low_moved: bool,
        ) {
            let moved = if low_moved { Thumb::Low } else { Thumb::High };
            let (l, h) = clamp_thumbs(low, high, gap, moved);
            prop_assert!(h - l >= gap);
            match moved {
                Thumb::Low => prop_assert_eq!(h, high),
                Thumb::High => prop_assert_eq!(l, low),
            }
        }

        #[test]
        fn grouped_digits_parse_back(n in 0i64..i64::MAX) {
            let grouped = group_digits(n);
            prop_assert_eq!(parse_digits(&grouped), n);
            prop_assert!(grouped.split(',').skip(1).all(|g| g.len() == 3));
        }

        #[test]
        fn emoji_stripping_is_idempotent(s in "\\PC{0,40}") {
            let once = strip_emoji(&s);
            prop_assert!(!has_emoji(&once));
            prop_assert_eq!(strip_emoji(&once), once.clone());
        }

        #[test]
        fn filters_only_remove(s in "\\PC{0,40}") {
            prop_assert!(digits_only(&s).chars().all(|c| c.is_ascii_digit()));
            let letters = letters_only(&s);
            prop_assert!(letters.chars().all(|c| c.is_ascii_alphabetic() || c == ' '));
            prop_assert!(!letters.contains("  "));
        }

        #[test]
        fn recent_list_is_capped_and_unique(
            slugs in prop::collection::vec(0u8..20, 0..40),
            cap in 1usize..15,
        ) {
            let list = RecentList::new("recent", cap);
            let mut storage = MemoryStorage::default();
            for s in &slugs {
                list.record(&mut storage, item(*s))
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            let items = list.load(&storage).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(items.len() <= cap);
            let mut seen: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), items.len());
            if let Some(last) = slugs.last() {
                prop_assert_eq!(&items[0], &item(*last));
            }
        }
    }
}
