use crate::error::{ExtractError, Result};

/// Column letters for a 0-based column index (0 -> "A", 27 -> "AB")
#[must_use]
pub fn index_to_col_name(index: usize) -> String {
    let mut col_name = String::new();
    let mut n = index + 1;

    while n > 0 {
        let remainder = (n - 1) % 26;
        col_name.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    col_name
}

/// 0-based column index for column letters, `None` for anything that is not letters
#[must_use]
pub fn col_name_to_index(name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }

    let mut result = 0usize;

    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }

        let val = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        result = result.checked_mul(26)?.checked_add(val)?;
    }

    Some(result - 1)
}

// Format cell reference (e.g., A1, B2) from 0-based (row, col)
#[must_use]
pub fn cell_reference(cell: (usize, usize)) -> String {
    format!("{}{}", index_to_col_name(cell.1), cell.0 + 1)
}

/// Parse an A1-style reference into 0-based (row, col). `$` anchors are ignored.
pub fn parse_cell_reference(reference: &str) -> Result<(usize, usize)> {
    let cleaned: String = reference.trim().chars().filter(|c| *c != '$').collect();
    let split = cleaned
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| ExtractError::InvalidReference(reference.to_string()))?;
    let (letters, digits) = cleaned.split_at(split);

    let col = col_name_to_index(letters)
        .ok_or_else(|| ExtractError::InvalidReference(reference.to_string()))?;
    let row: usize = digits
        .parse()
        .map_err(|_| ExtractError::InvalidReference(reference.to_string()))?;
    if row == 0 {
        return Err(ExtractError::InvalidReference(reference.to_string()));
    }

    Ok((row - 1, col))
}
