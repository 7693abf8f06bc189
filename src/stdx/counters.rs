//! Fenwick (binary-indexed) counter tree over a sieve segment.
//!
//! The tree mirrors the live bits of a segment sieve: after `init`, the
//! inclusive prefix sum at `k` equals the number of set bits in `[0, k]`.
//! Clearing a sieve bit is paired with a point decrement here, so prefix
//! queries stay consistent with the sieve at O(log S) per operation.
//!
//! The workload is "many prefix queries interleaved with point clears",
//! which is exactly the Fenwick sweet spot; the structure is reused across
//! segments via `init` rather than reallocated.

/// Counter tree with fixed capacity, rebuilt per segment.
pub struct Counters {
    tree: Vec<i32>,
}

impl Counters {
    /// Creates a tree for segments of `len` slots.
    pub fn new(len: usize) -> Self {
        Self { tree: vec![0; len] }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` when the tree has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Rebuilds the tree from a bit-packed slice: slot `i` starts at 1 when
    /// bit `i` of `words` is set, else 0. O(len).
    pub fn init(&mut self, words: &[u64]) {
        let n = self.tree.len();
        debug_assert!(words.len() * 64 >= n);
        for i in 0..n {
            self.tree[i] = ((words[i / 64] >> (i % 64)) & 1) as i32;
        }
        // Fenwick bottom-up accumulation: parent of i is i | (i + 1).
        for i in 0..n {
            let parent = i | (i + 1);
            if parent < n {
                self.tree[parent] += self.tree[i];
            }
        }
    }

    /// Inclusive prefix sum over `[0, k]`. O(log len).
    #[inline]
    pub fn query(&self, k: usize) -> i64 {
        debug_assert!(k < self.tree.len());
        let mut i = k as isize;
        let mut sum = 0i64;
        while i >= 0 {
            sum += self.tree[i as usize] as i64;
            i = (i & (i + 1)) - 1;
        }
        sum
    }

    /// Decrements slot `k`, paired with clearing the sieve bit. O(log len).
    #[inline]
    pub fn decrement(&mut self, k: usize) {
        let n = self.tree.len();
        let mut i = k;
        while i < n {
            self.tree[i] -= 1;
            i |= i + 1;
        }
    }
}
