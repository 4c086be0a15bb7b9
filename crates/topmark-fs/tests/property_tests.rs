use proptest::prelude::*;
use topmark_fs::newline::{NewlineCounter, NewlineHistogram};
use topmark_fs::{NormalizedPath, split_lines_keepends};

proptest! {
    #[test]
    fn test_split_lines_concatenates_back_to_input(s in "[a-c\r\n]{0,64}") {
        let lines = split_lines_keepends(&s);
        prop_assert_eq!(lines.concat(), s.clone());
        // Only the final line may lack a terminator
        for line in lines.iter().take(lines.len().saturating_sub(1)) {
            prop_assert!(line.ends_with('\n') || line.ends_with('\r'));
        }
    }

    #[test]
    fn test_chunked_counting_matches_whole_text(s in "[ab\r\n]{0,64}", split in 0usize..64) {
        let split = split.min(s.len());
        let mut counter = NewlineCounter::new();
        counter.feed(&s.as_bytes()[..split]);
        counter.feed(&s.as_bytes()[split..]);
        prop_assert_eq!(counter.finish(), NewlineHistogram::of_text(&s));
    }

    #[test]
    fn test_normalization_never_keeps_backslashes(s in "[a-z\\\\/.]{0,32}") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
        prop_assert!(!path.as_str().contains("//"));
    }
}
