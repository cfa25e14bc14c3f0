use subtle::ConstantTimeEq;

/// Compare a presented admin key with the configured one in constant time.
///
/// Only the length check short-circuits; the key length is not secret.
pub fn constant_time_compare(presented: &str, expected: &str) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
