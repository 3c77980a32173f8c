use std::cmp::Ordering;

/// Pseudo-natural path ordering: a shorter byte string always sorts first,
/// and equal lengths fall back to plain lexicographic comparison. This puts
/// `"file2"` before `"file10"` without parsing digits. Zero-padded numbers
/// are not handled: `"01"` sorts after `"1"`, by length alone.
pub fn path_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
