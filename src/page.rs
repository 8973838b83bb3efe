//! Token-based pagination over already-filtered, insertion-ordered results.
//! A token is transparently the next start offset as a decimal string.

use crate::core::{ApiError, Result};

/// Per-family `MaxResults` bounds.
#[derive(Debug, Clone, Copy)]
pub struct PageBounds {
    pub min: i64,
    pub max: i64,
}

impl PageBounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Standard bounds used by most Describe handlers.
pub const DEFAULT_BOUNDS: PageBounds = PageBounds::new(5, 1000);

/// Slice one page out of `items`.
///
/// With no `max_results` the whole remainder is returned and no token is
/// produced. The returned token is `None` iff the page reaches the end.
/// Malformed tokens always fail with `InvalidNextToken`.
pub fn paginate<T: Clone>(
    items: &[T],
    max_results: Option<i64>,
    next_token: Option<&str>,
    bounds: PageBounds,
) -> Result<(Vec<T>, Option<String>)> {
    let start = match next_token {
        None => 0,
        Some(token) => token
            .parse::<usize>()
            .map_err(|_| ApiError::InvalidNextToken(token.to_string()))?,
    };

    let page_size = match max_results {
        None => None,
        Some(n) if n < bounds.min || n > bounds.max => {
            return Err(ApiError::InvalidParameterValue(format!(
                "Value ({n}) for parameter MaxResults is invalid. It must be between {} and {}.",
                bounds.min, bounds.max
            )));
        }
        Some(n) => Some(n as usize),
    };

    if start >= items.len() {
        return Ok((Vec::new(), None));
    }

    let end = match page_size {
        None => items.len(),
        Some(size) => usize::min(start + size, items.len()),
    };
    let page = items[start..end].to_vec();
    let token = (end < items.len()).then(|| end.to_string());
    Ok((page, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_max_results_returns_everything() {
        let items: Vec<i32> = (0..12).collect();
        let (page, token) = paginate(&items, None, None, DEFAULT_BOUNDS).unwrap();
        assert_eq!(page, items);
        assert_eq!(token, None);
    }

    #[test]
    fn round_trip_reproduces_the_full_list() {
        for len in 0..=15usize {
            let items: Vec<usize> = (0..len).collect();
            let mut collected = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let (page, next) =
                    paginate(&items, Some(5), token.as_deref(), DEFAULT_BOUNDS).unwrap();
                collected.extend(page);
                match next {
                    Some(t) => token = Some(t),
                    None => break,
                }
            }
            assert_eq!(collected, items, "len={len}");
        }
    }

    #[test]
    fn malformed_token_fails() {
        let items = vec![1, 2, 3];
        let err = paginate(&items, Some(5), Some("not-a-number"), DEFAULT_BOUNDS).unwrap_err();
        assert_eq!(err.code(), "InvalidNextToken");
        let err = paginate(&items, Some(5), Some("-1"), DEFAULT_BOUNDS).unwrap_err();
        assert_eq!(err.code(), "InvalidNextToken");
    }

    #[test]
    fn token_past_the_end_yields_empty_page() {
        let items = vec![1, 2, 3];
        let (page, token) = paginate(&items, Some(5), Some("10"), DEFAULT_BOUNDS).unwrap();
        assert!(page.is_empty());
        assert_eq!(token, None);
    }

    #[test]
    fn max_results_out_of_bounds() {
        let items = vec![1];
        assert!(paginate(&items, Some(4), None, DEFAULT_BOUNDS).is_err());
        assert!(paginate(&items, Some(1001), None, DEFAULT_BOUNDS).is_err());
        assert!(paginate(&items, Some(5), None, DEFAULT_BOUNDS).is_ok());
    }
}
