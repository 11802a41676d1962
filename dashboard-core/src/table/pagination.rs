use serde::Serialize;

/// Paginator width used when the caller has no preference.
pub const DEFAULT_MAX_VISIBLE: u32 = 7;

/// One slot in the paginator control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Compute which page buttons to show.
///
/// Small page counts are listed in full. Larger ones always show the first
/// and last page plus a three-page window around `current_page`, with an
/// ellipsis standing in for each skipped run.
pub fn compute_page_window(current_page: u32, total_pages: u32, max_visible: u32) -> Vec<PageItem> {
    let total_pages = total_pages.max(1);
    if total_pages <= max_visible {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let mut items = Vec::with_capacity(max_visible as usize);
    items.push(PageItem::Page(1));

    if current_page > 4 {
        items.push(PageItem::Ellipsis);
    }

    let start = current_page.saturating_sub(1).max(2);
    let end = current_page.saturating_add(1).min(total_pages - 1);
    let mut last_page = 1;
    for page in start..=end {
        if page > last_page {
            items.push(PageItem::Page(page));
            last_page = page;
        }
    }

    if current_page.saturating_add(3) < total_pages {
        items.push(PageItem::Ellipsis);
    }

    if last_page < total_pages {
        items.push(PageItem::Page(total_pages));
    }

    items
}
