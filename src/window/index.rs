//! Ring-buffer window and match index for the sliding-window encoder
//!
//! The window is a circular byte buffer of N bytes with the first F-1
//! bytes mirrored past the end, so a full-length key comparison never has
//! to wrap. On top of it sit 256 binary search trees, one per leading
//! byte value, whose nodes are window positions ordered by the F bytes
//! starting there. The trees live in three index arrays rather than boxed
//! nodes; NIL is the index N.

use crate::WindowConfig;

/// Mutable encoder state: window bytes plus the position-keyed trees
///
/// A `MatchWindow` is scoped to a single compress call. It is reset, not
/// reallocated, when its owner is reused for another input.
#[derive(Debug)]
pub(crate) struct MatchWindow {
    config: WindowConfig,
    /// Window bytes, `window_size + max_match - 1` long (mirror tail)
    pub text: Vec<u8>,
    /// Parent links; index N is the NIL scratch slot
    dad: Vec<usize>,
    /// Left children; index N is NIL
    lson: Vec<usize>,
    /// Right children; indexes N+1..N+257 are the per-byte tree roots
    rson: Vec<usize>,
    /// Position of the best match found by the last insert
    pub match_position: usize,
    /// Length of the best match found by the last insert
    pub match_length: usize,
}

impl MatchWindow {
    pub fn new(config: WindowConfig) -> Self {
        let n = config.window_size;
        let f = config.max_match;
        let mut window = Self {
            config,
            text: vec![config.fill_byte; n + f - 1],
            dad: vec![n; n + 1],
            lson: vec![n; n + 1],
            rson: vec![n; n + 257],
            match_position: 0,
            match_length: 0,
        };
        window.reset();
        window
    }

    fn nil(&self) -> usize {
        self.config.window_size
    }

    /// Clear window contents and unlink every tree
    pub fn reset(&mut self) {
        self.text.fill(self.config.fill_byte);
        let nil = self.nil();
        self.rson.fill(nil);
        self.lson.fill(nil);
        self.dad.fill(nil);
        self.match_position = 0;
        self.match_length = 0;
    }

    /// Insert position `r` into the tree for its leading byte
    ///
    /// Walks the tree comparing up to F bytes per node, recording the
    /// longest prefix seen in `match_position`/`match_length`. A node that
    /// matches all F bytes is about to be evicted, so the new position is
    /// spliced into its place instead of hanging below it.
    pub fn insert(&mut self, r: usize) {
        let nil = self.nil();
        let n = self.config.window_size;
        let f = self.config.max_match;
        let mut cmp: i32 = 1;
        let mut p = n + 1 + usize::from(self.text[r]);
        self.rson[r] = nil;
        self.lson[r] = nil;
        self.match_length = 0;
        loop {
            if cmp >= 0 {
                if self.rson[p] != nil {
                    p = self.rson[p];
                } else {
                    self.rson[p] = r;
                    self.dad[r] = p;
                    return;
                }
            } else if self.lson[p] != nil {
                p = self.lson[p];
            } else {
                self.lson[p] = r;
                self.dad[r] = p;
                return;
            }
            let mut i = 1;
            while i < f {
                cmp = i32::from(self.text[r + i]) - i32::from(self.text[p + i]);
                if cmp != 0 {
                    break;
                }
                i += 1;
            }
            if i > self.match_length {
                self.match_position = p;
                self.match_length = i;
                if i >= f {
                    break;
                }
            }
        }
        // Full-length match: replace the old node with the new position.
        self.dad[r] = self.dad[p];
        self.lson[r] = self.lson[p];
        self.rson[r] = self.rson[p];
        self.dad[self.lson[p]] = r;
        self.dad[self.rson[p]] = r;
        if self.rson[self.dad[p]] == p {
            self.rson[self.dad[p]] = r;
        } else {
            self.lson[self.dad[p]] = r;
        }
        self.dad[p] = nil;
    }

    /// Remove position `p` from its tree, if present
    pub fn delete(&mut self, p: usize) {
        let nil = self.nil();
        if self.dad[p] == nil {
            return;
        }
        let q;
        if self.rson[p] == nil {
            q = self.lson[p];
        } else if self.lson[p] == nil {
            q = self.rson[p];
        } else {
            // Two children: lift the in-order predecessor.
            let mut m = self.lson[p];
            if self.rson[m] != nil {
                loop {
                    m = self.rson[m];
                    if self.rson[m] == nil {
                        break;
                    }
                }
                self.rson[self.dad[m]] = self.lson[m];
                self.dad[self.lson[m]] = self.dad[m];
                self.lson[m] = self.lson[p];
                self.dad[self.lson[p]] = m;
            }
            self.rson[m] = self.rson[p];
            self.dad[self.rson[p]] = m;
            q = m;
        }
        self.dad[q] = self.dad[p];
        if self.rson[self.dad[p]] == p {
            self.rson[self.dad[p]] = q;
        } else {
            self.lson[self.dad[p]] = q;
        }
        self.dad[p] = nil;
    }
}
