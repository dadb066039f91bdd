use serde::Serialize;

use crate::error::{AppError, error_codes};
use axum::http::StatusCode;

pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Serialize, PartialEq)]
pub struct PageMeta {
    pub total: i64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// 在内存中对查询结果分页
pub fn paginate<T>(items: Vec<T>, current_page: u32, per_page: u32) -> Result<Page<T>, AppError> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    if current_page < 1 {
        return Err(AppError::new(
            error_codes::INVALID_PAGE,
            "Invalid Page",
            StatusCode::NOT_FOUND,
        ));
    }

    let total = items.len() as i64;
    let start = (current_page as usize - 1) * per_page as usize;
    let page_items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    if total > 0 && page_items.is_empty() {
        return Err(AppError::new(
            error_codes::INVALID_PAGE,
            "Page number is out of range",
            StatusCode::BAD_REQUEST,
        ));
    }

    let last_page = std::cmp::max(1, (total as f64 / per_page as f64).ceil() as u32);
    Ok(Page {
        items: page_items,
        meta: PageMeta {
            total,
            per_page,
            current_page,
            last_page,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_items_into_pages() {
        let items: Vec<i32> = (1..=120).collect();
        let page = paginate(items, 2, 50).unwrap();
        assert_eq!(page.items.first(), Some(&51));
        assert_eq!(page.items.len(), 50);
        assert_eq!(
            page.meta,
            PageMeta {
                total: 120,
                per_page: 50,
                current_page: 2,
                last_page: 3,
            }
        );
    }

    #[test]
    fn empty_set_yields_single_empty_page() {
        let page = paginate(Vec::<i32>::new(), 1, 50).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.last_page, 1);
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = paginate(vec![1, 2, 3], 0, 50).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Invalid Page");
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let err = paginate(vec![1, 2, 3], 5, 50).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Page number is out of range");
    }

    #[test]
    fn per_page_is_clamped() {
        let items: Vec<i32> = (1..=300).collect();
        let page = paginate(items, 1, 500).unwrap();
        assert_eq!(page.items.len(), MAX_PER_PAGE as usize);
        assert_eq!(page.meta.per_page, MAX_PER_PAGE);
    }
}
