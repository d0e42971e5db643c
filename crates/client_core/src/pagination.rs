/// Page indices (0-based) to offer as pagination links.
///
/// Always includes the first and last page and every page within `radius` of
/// `current_page`; `None` marks a gap between non-adjacent runs. A
/// `current_page` past the end is treated as the last page.
pub fn page_window(total_pages: u32, current_page: u32, radius: u32) -> Vec<Option<u32>> {
    if total_pages == 0 {
        return Vec::new();
    }

    let last = total_pages - 1;
    let current = current_page.min(last);
    let low = current.saturating_sub(radius);
    let high = current.saturating_add(radius).min(last);

    let mut window = Vec::new();
    let mut previous: Option<u32> = None;
    for page in std::iter::once(0)
        .chain(low..=high)
        .chain(std::iter::once(last))
    {
        match previous {
            Some(prev) if page <= prev => continue,
            Some(prev) if page > prev + 1 => window.push(None),
            _ => {}
        }
        window.push(Some(page));
        previous = Some(page);
    }
    window
}
