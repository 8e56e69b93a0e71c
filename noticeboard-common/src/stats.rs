use time::{Duration, UtcDateTime};

/// Entries at least this recent count as new.
pub const RECENT_WINDOW: Duration = Duration::hours(24);

/// Figures shown alongside a list, computed on every render and never stored.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct ListStats {
    pub total: usize,
    pub recent: usize,
    pub total_words: usize,
    pub latest: Option<UtcDateTime>,
}

impl ListStats {
    /// `entries` yields the creation time and word count of each row.
    pub fn compute<I>(entries: I, now: UtcDateTime) -> Self
    where
        I: IntoIterator<Item = (UtcDateTime, usize)>,
    {
        let since = now - RECENT_WINDOW;

        entries
            .into_iter()
            .fold(Self::default(), |mut stats, (created_at, words)| {
                stats.total += 1;
                if created_at >= since {
                    stats.recent += 1;
                }
                stats.total_words += words;
                stats.latest = stats.latest.max(Some(created_at));
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::stats::{ListStats, RECENT_WINDOW};
    use time::{Duration, macros::utc_datetime};

    #[test]
    fn empty_list() {
        let stats = ListStats::compute([], utc_datetime!(2025-10-24 10:00));
        assert_eq!(stats, ListStats::default());
    }

    #[test]
    fn recent_window_is_inclusive() {
        let now = utc_datetime!(2025-10-24 10:00);
        let entries = [
            (now, 3),
            (now - RECENT_WINDOW, 10),
            (now - RECENT_WINDOW - Duration::seconds(1), 7),
            (utc_datetime!(2024-01-01 00:00), 0),
        ];

        let stats = ListStats::compute(entries, now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.recent, 2);
        assert_eq!(stats.total_words, 20);
        assert_eq!(stats.latest, Some(now));
    }
}
