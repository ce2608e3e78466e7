use crate::classify::is_unit_marker;
use crate::config::LabelPolicy;

pub const PLACEHOLDER_PREFIX: &str = "col_";
pub const UNDEFINED_PREFIX: &str = "undefined_";

/// Joins the lines of a multi-line header cell with single spaces
pub fn flatten_label(value: &str) -> String {
    value
        .split(['\n', '\t'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses one column's header cells, top row first, into a single label.
/// Empty when no header row has a value for the column.
pub fn collapse_label<'a>(
    values: impl IntoIterator<Item = &'a str>,
    policy: LabelPolicy,
    separator: &str,
) -> String {
    let values = values
        .into_iter()
        .map(flatten_label)
        .filter(|v| !v.is_empty());

    match policy {
        LabelPolicy::LastNonEmpty => {
            let mut label = String::new();
            for value in values {
                // `USD` under `Price` qualifies the name, it does not replace it
                if label.is_empty() || !is_unit_marker(&value) {
                    label = value;
                }
            }
            label
        }
        LabelPolicy::Join => {
            let mut parts: Vec<String> = Vec::new();
            for value in values {
                if !parts.contains(&value) {
                    parts.push(value);
                }
            }
            parts.join(separator)
        }
    }
}

/// One label per column of `block`, using its first `depth` rows as the header.
///
/// Columns without any header value are named `undefined_<n>` when a data row has a value
/// in them and `col_<n>` otherwise, `n` being the 1-based column index.
pub fn build_header(
    block: &[Vec<String>],
    depth: usize,
    policy: LabelPolicy,
    separator: &str,
) -> Vec<String> {
    let width = block.first().map_or(0, Vec::len);
    let depth = depth.min(block.len());
    let (header_rows, data_rows) = block.split_at(depth);

    (0..width)
        .map(|c| {
            let label = collapse_label(
                header_rows
                    .iter()
                    .map(|row| row.get(c).map_or("", String::as_str)),
                policy,
                separator,
            );
            if !label.is_empty() {
                return label;
            }
            let has_data = data_rows
                .iter()
                .any(|row| row.get(c).is_some_and(|v| !v.is_empty()));
            if has_data {
                format!("{UNDEFINED_PREFIX}{}", c + 1)
            } else {
                format!("{PLACEHOLDER_PREFIX}{}", c + 1)
            }
        })
        .collect()
}

/// Whether `label` was generated rather than read from the sheet
pub fn is_synthetic_label(label: &str) -> bool {
    [PLACEHOLDER_PREFIX, UNDEFINED_PREFIX]
        .iter()
        .any(|prefix| has_numbered_prefix(label, prefix))
}

/// Whether `label` is the `col_<n>` name of a column with no header and no data
pub fn is_placeholder_label(label: &str) -> bool {
    has_numbered_prefix(label, PLACEHOLDER_PREFIX)
}

fn has_numbered_prefix(label: &str, prefix: &str) -> bool {
    label
        .strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.chars().all(|ch| ch.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn unit_row_qualifies_but_does_not_replace() {
        let b = block(&[&["SKU", "Price"], &["", "USD"], &["1", "2"]]);
        assert_eq!(
            build_header(&b, 2, LabelPolicy::LastNonEmpty, " "),
            vec!["SKU", "Price"]
        );
        assert_eq!(
            build_header(&b, 2, LabelPolicy::Join, " "),
            vec!["SKU", "Price USD"]
        );
    }

    #[test]
    fn child_labels_override_parents_under_last_non_empty() {
        let b = block(&[
            &["Price", "Price", "Stock"],
            &["Retail", "Wholesale", ""],
            &["1", "2", "3"],
        ]);
        assert_eq!(
            build_header(&b, 2, LabelPolicy::LastNonEmpty, " "),
            vec!["Retail", "Wholesale", "Stock"]
        );
        assert_eq!(
            build_header(&b, 2, LabelPolicy::Join, " / "),
            vec!["Price / Retail", "Price / Wholesale", "Stock"]
        );
    }

    #[test]
    fn unlabelled_columns_get_synthetic_names() {
        let b = block(&[&["Code", "", ""], &["1", "x", ""], &["2", "", ""]]);
        let header = build_header(&b, 1, LabelPolicy::LastNonEmpty, " ");
        assert_eq!(header, vec!["Code", "undefined_2", "col_3"]);
        assert!(is_synthetic_label(&header[1]));
        assert!(is_synthetic_label(&header[2]));
        assert!(!is_synthetic_label("col_name"));
        assert!(!is_synthetic_label("Code"));
        assert!(is_placeholder_label("col_12"));
        assert!(!is_placeholder_label("undefined_2"));
    }

    #[test]
    fn multi_line_cells_are_flattened() {
        assert_eq!(flatten_label("Price,\n  incl.\tVAT "), "Price, incl. VAT");
        let b = block(&[&["Цена\nс НДС"], &["10"]]);
        assert_eq!(build_header(&b, 1, LabelPolicy::Join, " "), vec!["Цена с НДС"]);
    }

    #[test]
    fn zero_depth_names_every_column() {
        let b = block(&[&["1", ""], &["2", ""]]);
        assert_eq!(
            build_header(&b, 0, LabelPolicy::LastNonEmpty, " "),
            vec!["undefined_1", "col_2"]
        );
    }
}
