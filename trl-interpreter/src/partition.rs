//! Lazy enumeration of the ways to distribute the arguments of one AC term
//! over the arguments of another.
//!
//! An AC equation `f[s1..sm] = f[t1..tn]` with `m <= n` is solved by
//! splitting `t1..tn` into exactly `m` non-empty blocks and assigning one
//! block to each `si`. Partitions are generated as restricted growth
//! strings in lexicographic order and each partition is paired with every
//! permutation of its blocks.
//!
//! Positions in the same symmetry class are interchangeable: swapping the
//! blocks given to two of them yields the same solution up to renaming.
//! Only assignments in which the positions of each class receive blocks in
//! increasing order are produced. Positions without a class receive every
//! block.

/// Iterator over block assignments. Each item holds, for every position of
/// the smaller side, the indices of the larger side's elements it receives.
#[derive(Debug, Clone)]
pub(crate) struct PartitionMappings {
    blocks: usize,
    classes: Vec<Option<usize>>,
    rgs: Option<Vec<usize>>,
    current: Vec<Vec<usize>>,
    perm: Option<Vec<usize>>,
}

impl PartitionMappings {
    /// Distributes `to_len` elements over `classes.len()` positions.
    /// Yields nothing when there are no positions or more positions than
    /// elements.
    pub(crate) fn new(classes: Vec<Option<usize>>, to_len: usize) -> Self {
        let blocks = classes.len();
        let mut this = Self {
            blocks,
            classes,
            rgs: None,
            current: Vec::new(),
            perm: None,
        };
        if blocks == 0 || blocks > to_len {
            return this;
        }
        let mut rgs = vec![0; to_len - blocks + 1];
        rgs.extend(1..blocks);
        this.current = blocks_of(&rgs, blocks);
        this.perm = Some((0..blocks).collect());
        this.rgs = Some(rgs);
        this
    }

    fn respects_order(&self, perm: &[usize]) -> bool {
        for (i, class) in self.classes.iter().enumerate() {
            let Some(class) = class else {
                continue;
            };
            let later = self.classes[i + 1..].iter().position(|c| c.as_ref() == Some(class));
            if later.is_some_and(|offset| perm[i] > perm[i + 1 + offset]) {
                return false;
            }
        }
        true
    }
}

impl Iterator for PartitionMappings {
    type Item = Vec<Vec<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rgs = self.rgs.as_ref()?;
            if let Some(perm) = self.perm.take() {
                self.perm = next_permutation(&perm);
                if self.respects_order(&perm) {
                    return Some(perm.iter().map(|&b| self.current[b].clone()).collect());
                }
                continue;
            }
            let next = next_rgs(rgs, self.blocks);
            if let Some(r) = &next {
                self.current = blocks_of(r, self.blocks);
                self.perm = Some((0..self.blocks).collect());
            }
            self.rgs = next;
        }
    }
}

fn blocks_of(rgs: &[usize], blocks: usize) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); blocks];
    for (element, &block) in rgs.iter().enumerate() {
        out[block].push(element);
    }
    out
}

/// The lexicographic successor of a restricted growth string that uses
/// exactly `blocks` distinct values.
fn next_rgs(rgs: &[usize], blocks: usize) -> Option<Vec<usize>> {
    let n = rgs.len();
    let mut prefix_max = Vec::with_capacity(n);
    let mut max = 0;
    for &v in rgs {
        max = max.max(v);
        prefix_max.push(max);
    }
    for i in (1..n).rev() {
        let prev_max = prefix_max[i - 1];
        if rgs[i] > prev_max || rgs[i] + 1 >= blocks {
            continue;
        }
        let v = rgs[i] + 1;
        let m = prev_max.max(v);
        let rest = n - i - 1;
        let missing = blocks - 1 - m;
        if rest < missing {
            continue;
        }
        let mut out = rgs[..i].to_vec();
        out.push(v);
        out.extend(std::iter::repeat_n(0, rest - missing));
        out.extend(m + 1..blocks);
        return Some(out);
    }
    None
}

fn next_permutation(perm: &[usize]) -> Option<Vec<usize>> {
    let mut p = perm.to_vec();
    let i = (1..p.len()).rev().find(|&i| p[i - 1] < p[i])?;
    let j = (i..p.len()).rev().find(|&j| p[j] > p[i - 1])?;
    p.swap(i - 1, j);
    p[i..].reverse();
    Some(p)
}
