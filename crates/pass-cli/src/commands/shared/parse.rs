use anyhow::bail;

/// Convert a comma-separated score list into four totals in canonical order.
pub fn parse_scores(values: &[f64]) -> anyhow::Result<[f64; 4]> {
    match <[f64; 4]>::try_from(values) {
        Ok(scores) => Ok(scores),
        Err(_) => bail!(
            "expected 4 scores (planning,attention,simultaneous,successive), got {}",
            values.len()
        ),
    }
}
