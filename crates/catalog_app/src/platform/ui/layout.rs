use catalog_core::SortIcon;

use super::constants::*;

/// Pads or truncates `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        let mut out = text.to_string();
        out.extend(std::iter::repeat(' ').take(width - count));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

pub fn row(cells: &[(&str, usize)]) -> String {
    cells
        .iter()
        .map(|(text, width)| fit(text, *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

/// Header label with the column's sort marker appended.
pub fn sortable_label(label: &str, icon: SortIcon) -> String {
    match icon {
        SortIcon::Ascending => format!("{label} {SORT_ASCENDING}"),
        SortIcon::Descending => format!("{label} {SORT_DESCENDING}"),
        SortIcon::None => label.to_string(),
    }
}
