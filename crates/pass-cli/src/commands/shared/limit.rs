/// Compute the effective history limit: global flag first, then the configured
/// fallback. Zero means no limit.
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> Option<usize> {
    let limit = global.unwrap_or(fallback);
    (limit > 0).then_some(limit as usize)
}
