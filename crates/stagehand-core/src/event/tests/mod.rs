
#[cfg(test)]
mod tests {
    use crate::event::EventKind;
    use crate::kernel::constants::{BEFORE_EXTENSIONS, LIFECYCLE_EVENTS, ON_ERROR};

    #[test]
    fn test_unique_kinds_with_same_name_differ() {
        let first = EventKind::unique("custom");
        let second = EventKind::unique("custom");
        assert_eq!(first.name(), second.name());
        assert_ne!(first, second);
        assert_eq!(first, first);
    }

    #[test]
    fn test_reserved_kinds_are_distinct() {
        for (i, a) in LIFECYCLE_EVENTS.iter().enumerate() {
            for b in LIFECYCLE_EVENTS.iter().skip(i + 1) {
                assert_ne!(a, b, "{} and {} must not compare equal", a, b);
            }
        }
        assert_ne!(EventKind::unique("BeforeExtensions"), BEFORE_EXTENSIONS);
        assert_eq!(ON_ERROR.to_string(), "OnError");
    }
}
