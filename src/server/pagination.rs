use serde::Serialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// One page of an ordered result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub current_page: i64,
    /// Size of the whole result set, not of this page.
    pub total_questions: usize,
    pub questions: Vec<T>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Slices `records` to `[(page - 1) * 10, page * 10)`.
///
/// Pages past the end, and page numbers below 1, give an empty slice.
pub fn paginate<T>(page: i64, records: Vec<T>) -> Page<T> {
    let total_questions = records.len();
    let start = usize::try_from(page.saturating_sub(1))
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    let questions = match start {
        Some(start) if start < total_questions => records
            .into_iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .collect(),
        _ => Vec::new(),
    };
    Page {
        current_page: page,
        total_questions,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn first_page() {
        let page = paginate(1, records(25));
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_questions, 25);
        assert_eq!(page.questions, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn last_partial_page() {
        let page = paginate(3, records(25));
        assert_eq!(page.questions, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total_questions, 25);
    }

    #[test]
    fn slice_length_matches_remaining_records() {
        for total in [0, 1, 9, 10, 11, 20, 37] {
            for page in 1..6i64 {
                let expected = (total as i64 - (page - 1) * 10).clamp(0, 10) as usize;
                let got = paginate(page, records(total));
                assert_eq!(got.questions.len(), expected, "total={total} page={page}");
                assert_eq!(got.total_questions, total);
            }
        }
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(paginate(1000, records(19)).is_empty());
        assert!(paginate(0, records(19)).is_empty());
        assert!(paginate(-1, records(19)).is_empty());
        assert!(paginate(i64::MAX, records(19)).is_empty());
        assert!(paginate(1, records(0)).is_empty());
    }
}
