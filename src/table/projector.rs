use crate::table::header::is_placeholder_label;

/// Drops `col_<n>` placeholder columns with fewer than `min_values` non-empty cells among
/// the first `sample_rows` rows, then squares off the rows. Columns holding data keep it
/// even without a header label (`undefined_<n>`).
///
/// Rows are padded or truncated to the surviving columns and rows left without any value
/// are removed, so the result never has more rows than the input and every row has
/// exactly `header.len()` cells. If no column would survive, all columns are kept.
pub fn project_columns(
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    min_values: usize,
    sample_rows: usize,
) -> (Vec<String>, Vec<Vec<String>>) {
    let width = header.len();

    let keep: Vec<bool> = header
        .iter()
        .enumerate()
        .map(|(c, label)| {
            if !is_placeholder_label(label) {
                return true;
            }
            let filled = rows
                .iter()
                .take(sample_rows)
                .filter(|row| row.get(c).is_some_and(|v| !v.is_empty()))
                .count();
            filled >= min_values
        })
        .collect();
    let keep = if keep.iter().any(|&k| k) {
        keep
    } else {
        vec![true; width]
    };

    let header: Vec<String> = header
        .into_iter()
        .zip(&keep)
        .filter_map(|(label, &k)| k.then_some(label))
        .collect();

    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.resize(width, String::new());
            row.into_iter()
                .zip(&keep)
                .filter_map(|(v, &k)| k.then_some(v))
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect();

    (header, rows)
}
