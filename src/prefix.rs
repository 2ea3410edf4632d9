use smallvec::SmallVec;

/// Prefix bytes are stored inline up to this many bytes (one machine word);
/// longer prefixes spill to the heap. `SmallVec` gives us both halves of this
/// switch for free.
pub(crate) const PREFIX_INLINE_LEN: usize = std::mem::size_of::<usize>();

/// A node's compressed path. Inline up to `PREFIX_INLINE_LEN` bytes, heap
/// beyond that — see spec's prefix storage rule in §3.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Prefix(SmallVec<[u8; PREFIX_INLINE_LEN]>);

impl Prefix {
    pub(crate) fn empty() -> Self {
        Prefix(SmallVec::new())
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= 255);
        Prefix(SmallVec::from_slice(bytes))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn idx(&self, i: usize) -> u8 {
        self.0[i]
    }

    pub(crate) fn before(&self, n: usize) -> Self {
        Prefix::from_slice(&self.0[..n])
    }

    pub(crate) fn after(&self, n: usize) -> Self {
        Prefix::from_slice(&self.0[n..])
    }

    /// Count of bytes this prefix shares with `key[depth..]`, capped by
    /// whichever of the two runs out first.
    pub(crate) fn check(&self, key: &[u8], depth: usize) -> usize {
        let remaining = &key[depth..];
        let max = self.0.len().min(remaining.len());
        (0..max).take_while(|&i| self.0[i] == remaining[i]).count()
    }

    /// Approximate heap+inline footprint of this prefix, for memory
    /// accounting (spec §5). Inline prefixes cost nothing beyond the node
    /// header they live in; heap prefixes cost one byte per stored byte.
    pub(crate) fn heap_bytes(&self) -> usize {
        if self.0.len() > PREFIX_INLINE_LEN {
            self.0.len()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_full_match() {
        let p = Prefix::from_slice(b"abc");
        assert_eq!(p.check(b"abcdef", 0), 3);
    }

    #[test]
    fn test_check_partial_match() {
        let p = Prefix::from_slice(b"abcxyz");
        assert_eq!(p.check(b"abcuvw", 0), 3);
    }

    #[test]
    fn test_check_key_runs_out() {
        let p = Prefix::from_slice(b"abcxyz");
        assert_eq!(p.check(b"ab", 0), 2);
    }

    #[test]
    fn test_before_after() {
        let p = Prefix::from_slice(b"abcxyz");
        assert_eq!(p.before(3).as_slice(), b"abc");
        assert_eq!(p.after(3).as_slice(), b"xyz");
    }

    #[test]
    fn test_inline_vs_heap() {
        let short = Prefix::from_slice(b"ab");
        let long = Prefix::from_slice(b"0123456789");
        assert_eq!(short.heap_bytes(), 0);
        assert_eq!(long.heap_bytes(), 10);
    }
}
