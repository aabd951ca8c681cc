use std::time::{Duration, Instant};

/// Case-insensitive substring test against any of `fields`. An empty term
/// matches everything.
pub fn matches(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the items whose designated field contains `term`, in their original
/// order.
pub fn filter<'a, T>(items: &'a [T], term: &str, field: impl Fn(&T) -> &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| matches(term, &[field(item)]))
        .collect()
}

/// Holds back a value until it has stopped changing for `delay`. With a zero
/// delay every pushed value is ready immediately.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value, restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = match &self.pending {
            Some((_, since)) => now.saturating_duration_since(*since) >= self.delay,
            None => false,
        };
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Forget the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
    }

    const ROWS: [Row; 3] = [
        Row { id: 1, name: "Atlas" },
        Row { id: 2, name: "Atlas Shrugged" },
        Row { id: 3, name: "Dune" },
    ];

    #[rstest]
    #[case("", vec![1, 2, 3])]
    #[case("shrug", vec![2])]
    #[case("ATLAS", vec![1, 2])]
    #[case("u", vec![2, 3])]
    #[case("zzz", vec![])]
    fn filters_by_case_insensitive_substring(#[case] term: &str, #[case] expected: Vec<i64>) {
        let ids: Vec<i64> = filter(&ROWS, term, |row| row.name)
            .into_iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn any_field_may_match() {
        assert!(matches("rand", &["Atlas Shrugged", "Ayn Rand"]));
        assert!(!matches("tolkien", &["Atlas Shrugged", "Ayn Rand"]));
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("a".to_string(), start);
        debouncer.push("ab".to_string(), start + Duration::from_millis(200));

        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(700)),
            Some("ab".to_string())
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn zero_delay_releases_immediately() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.push(1, now);
        assert_eq!(debouncer.poll(now), Some(1));
    }

    #[test]
    fn cancelled_value_is_never_released() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.push("stale", now);
        debouncer.cancel();
        assert_eq!(debouncer.poll(now + Duration::from_secs(1)), None);
    }
}
