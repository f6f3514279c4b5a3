//! Distance-2 graph coloring of a matrix pattern, for multicolor block orderings.
//! See Saad §10.7, §12.4 for background.

use crate::core::traits::RowEntries;
use std::collections::BTreeSet;

/// Symmetrized adjacency of a matrix pattern: adj[i] = { j ≠ i | A[i,j] ≠ 0 or A[j,i] ≠ 0 }
pub fn extract_adjacency<M, T>(a: &M) -> Vec<Vec<usize>>
where
    M: RowEntries<T>,
{
    let n = a.nrows();
    let mut adj = vec![BTreeSet::new(); n];
    for i in 0..n {
        for (j, _) in a.row(i) {
            if i != j && j < n {
                adj[i].insert(j);
                adj[j].insert(i);
            }
        }
    }
    adj.into_iter().map(|s| s.into_iter().collect()).collect()
}

/// Build distance-2 neighbor sets: dist2[i] = adj[i] ∪ (⋃_{j∈adj[i]} adj[j])
pub fn distance2_neighbors(adj: &[Vec<usize>]) -> Vec<BTreeSet<usize>> {
    let n = adj.len();
    let mut dist2 = vec![BTreeSet::new(); n];
    for i in 0..n {
        for &j in &adj[i] {
            dist2[i].insert(j);
            for &k in &adj[j] {
                dist2[i].insert(k);
            }
        }
        dist2[i].insert(i); // include self
    }
    dist2
}

/// Greedy distance-2 coloring. Returns colors[i] = color assigned to node i.
pub fn greedy_distance2_coloring(dist2: &[BTreeSet<usize>]) -> Vec<usize> {
    let n = dist2.len();
    let mut color_of: Vec<Option<usize>> = vec![None; n];
    let mut colors = Vec::with_capacity(n);
    for i in 0..n {
        let banned: BTreeSet<usize> = dist2[i].iter().filter_map(|&k| color_of[k]).collect();
        // the smallest color not in `banned` is at most banned.len()
        let c = (0..=banned.len()).find(|c| !banned.contains(c)).unwrap_or(banned.len());
        color_of[i] = Some(c);
        colors.push(c);
    }
    colors
}

/// Convenience: color a matrix from its row pattern.
/// Returns a color assignment for each row.
pub fn color_graph<M, T>(a: &M) -> Vec<usize>
where
    M: RowEntries<T>,
{
    let adj = extract_adjacency(a);
    let dist2 = distance2_neighbors(&adj);
    greedy_distance2_coloring(&dist2)
}

/// Build blocks from a color assignment: blocks[c] = indices with color c
pub fn build_blocks_from_colors(colors: &[usize]) -> Vec<Vec<usize>> {
    let num_colors = colors.iter().copied().max().map(|c| c + 1).unwrap_or(0);
    let mut blocks = vec![Vec::new(); num_colors];
    for (i, &c) in colors.iter().enumerate() {
        blocks[c].push(i);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn tridiagonal_needs_three_colors() {
        let a = Mat::from_fn(6, 6, |i, j| {
            if i == j { 2.0 } else if i.abs_diff(j) == 1 { -1.0 } else { 0.0 }
        });
        let colors = color_graph(&a);
        assert_eq!(colors, vec![0, 1, 2, 0, 1, 2]);
        // no two rows at distance <= 2 share a color
        for i in 0..6 {
            for j in (i + 1)..6 {
                if j - i <= 2 {
                    assert_ne!(colors[i], colors[j]);
                }
            }
        }
    }
}
