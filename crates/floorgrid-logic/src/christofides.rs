//! Christofides-style approximate TSP over a dense cost matrix.
//!
//! MST (Prim) → odd-degree vertices → greedy near-minimum matching →
//! Eulerian circuit (Hierholzer) → shortcut to a Hamiltonian tour.
//!
//! The matching step picks the globally cheapest remaining pair each round.
//! That is not a minimum-weight perfect matching, so the usual 3/2 bound does
//! not strictly hold; in practice the tours are close.

use crate::cost::CostMatrix;
use crate::error::SolveError;

/// Undirected edge between two vertices.
pub type Edge = (usize, usize);

/// Minimum spanning tree by dense Prim, rooted at vertex 0.
///
/// Ties go to the lowest vertex index. Edges are `(parent, child)` in the
/// order vertices join the tree.
pub fn minimum_spanning_tree(costs: &CostMatrix) -> Vec<Edge> {
    let n = costs.len();
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    if n == 0 {
        return edges;
    }

    let mut key = vec![u64::MAX; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];
    key[0] = 0;

    for _ in 0..n {
        let Some(u) = (0..n).filter(|&v| !in_tree[v]).min_by_key(|&v| key[v]) else {
            break;
        };
        in_tree[u] = true;
        if let Some(p) = parent[u] {
            edges.push((p, u));
        }
        for v in 0..n {
            if !in_tree[v] && costs.get(u, v) < key[v] {
                key[v] = costs.get(u, v);
                parent[v] = Some(u);
            }
        }
    }

    edges
}

/// Vertices with odd degree in `edges`, ascending.
pub fn odd_degree_vertices(n: usize, edges: &[Edge]) -> Vec<usize> {
    let mut degree = vec![0usize; n];
    for &(a, b) in edges {
        degree[a] += 1;
        degree[b] += 1;
    }
    (0..n).filter(|&v| degree[v] % 2 == 1).collect()
}

/// Pair up `vertices` by repeatedly taking the cheapest unmatched pair.
///
/// Fails only if a vertex is left without a partner, which means the input
/// set had odd size.
pub fn greedy_matching(costs: &CostMatrix, vertices: &[usize]) -> Result<Vec<Edge>, SolveError> {
    let mut unmatched = vertices.to_vec();
    let mut pairs = Vec::with_capacity(unmatched.len() / 2);

    while !unmatched.is_empty() {
        let mut best: Option<(u64, usize, usize)> = None;
        for i in 0..unmatched.len() {
            for j in (i + 1)..unmatched.len() {
                let c = costs.get(unmatched[i], unmatched[j]);
                if best.map_or(true, |(b, _, _)| c < b) {
                    best = Some((c, i, j));
                }
            }
        }

        let Some((_, i, j)) = best else {
            log::error!(
                "Matching invariant violated: {} vertices left unpaired",
                unmatched.len()
            );
            return Err(SolveError::MatchingFailed { unmatched });
        };
        pairs.push((unmatched[i], unmatched[j]));
        // j > i, so removing j first keeps i valid.
        unmatched.remove(j);
        unmatched.remove(i);
    }

    Ok(pairs)
}

/// Eulerian circuit of a multigraph in which every vertex has even degree.
///
/// Iterative Hierholzer: each traversed edge is removed from both endpoints'
/// adjacency lists. The circuit starts and ends at `start`.
pub fn eulerian_circuit(n: usize, edges: &[Edge], start: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(a, b) in edges {
        adj[a].push(b);
        adj[b].push(a);
    }

    let mut stack = vec![start];
    let mut circuit = Vec::with_capacity(edges.len() + 1);
    while let Some(&v) = stack.last() {
        if let Some(u) = adj[v].pop() {
            if let Some(pos) = adj[u].iter().position(|&w| w == v) {
                adj[u].swap_remove(pos);
            }
            stack.push(u);
        } else {
            circuit.push(v);
            stack.pop();
        }
    }
    circuit.reverse();
    circuit
}

/// Keep the first visit of each vertex and close the tour at the start.
pub fn shortcut(circuit: &[usize]) -> Vec<usize> {
    let Some(&start) = circuit.first() else {
        return Vec::new();
    };
    let n = circuit.iter().copied().max().map_or(0, |m| m + 1);
    let mut seen = vec![false; n];
    let mut tour = Vec::with_capacity(n + 1);
    for &v in circuit {
        if !seen[v] {
            seen[v] = true;
            tour.push(v);
        }
    }
    tour.push(start);
    tour
}

/// Closed tour of length `n + 1` over all vertices, starting at vertex 0.
/// Empty for an empty matrix.
pub fn christofides_tour(costs: &CostMatrix) -> Result<Vec<usize>, SolveError> {
    let n = costs.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut multigraph = minimum_spanning_tree(costs);
    let odd = odd_degree_vertices(n, &multigraph);
    let matching = greedy_matching(costs, &odd)?;
    log::debug!(
        "Christofides: n={}, mst_edges={}, odd={}, matched={}",
        n,
        multigraph.len(),
        odd.len(),
        matching.len()
    );
    multigraph.extend(matching);

    let circuit = eulerian_circuit(n, &multigraph, 0);
    Ok(shortcut(&circuit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_costs(n: usize) -> CostMatrix {
        // Points on a line: cost is distance.
        CostMatrix::from_fn(n, |i, j| (j as u64).abs_diff(i as u64))
    }

    fn is_closed_tour(tour: &[usize], n: usize) -> bool {
        if n == 0 {
            return tour.is_empty();
        }
        let mut seen = vec![false; n];
        tour.len() == n + 1
            && tour.first() == tour.last()
            && tour[..n].iter().all(|&v| v < n && !std::mem::replace(&mut seen[v], true))
    }

    #[test]
    fn test_mst_on_line() {
        let mst = minimum_spanning_tree(&line_costs(4));
        assert_eq!(mst, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_mst_ties_prefer_low_index() {
        let mst = minimum_spanning_tree(&CostMatrix::from_fn(4, |_, _| 1));
        assert_eq!(mst, vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_mst_empty_and_single() {
        assert!(minimum_spanning_tree(&CostMatrix::from_fn(0, |_, _| 0)).is_empty());
        assert!(minimum_spanning_tree(&CostMatrix::from_fn(1, |_, _| 0)).is_empty());
    }

    #[test]
    fn test_odd_vertices_even_count() {
        let odd = odd_degree_vertices(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(odd, vec![0, 1, 2, 3]);
        let odd = odd_degree_vertices(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(odd, vec![0, 3]);
    }

    #[test]
    fn test_greedy_matching_cheapest_first() {
        let costs = line_costs(8);
        // 2-3 (cost 1) goes first, then 0-7 is all that is left.
        let pairs = greedy_matching(&costs, &[0, 2, 3, 7]).unwrap();
        assert_eq!(pairs, vec![(2, 3), (0, 7)]);
    }

    #[test]
    fn test_greedy_matching_odd_set_fails() {
        let costs = line_costs(3);
        let err = greedy_matching(&costs, &[0, 1, 2]).unwrap_err();
        assert_eq!(err, SolveError::MatchingFailed { unmatched: vec![2] });
    }

    #[test]
    fn test_greedy_matching_empty() {
        assert!(greedy_matching(&line_costs(3), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_eulerian_circuit_uses_every_edge() {
        // Two triangles sharing vertex 0 (bow tie).
        let edges = vec![(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)];
        let circuit = eulerian_circuit(5, &edges, 0);
        assert_eq!(circuit.len(), edges.len() + 1);
        assert_eq!(circuit.first(), Some(&0));
        assert_eq!(circuit.last(), Some(&0));

        let mut used: Vec<(usize, usize)> = circuit
            .windows(2)
            .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
            .collect();
        let mut expected: Vec<(usize, usize)> =
            edges.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();
        used.sort();
        expected.sort();
        assert_eq!(used, expected);
    }

    #[test]
    fn test_eulerian_circuit_double_edge() {
        assert_eq!(eulerian_circuit(2, &[(0, 1), (0, 1)], 0), vec![0, 1, 0]);
    }

    #[test]
    fn test_shortcut_keeps_first_visits() {
        assert_eq!(shortcut(&[0, 1, 2, 1, 3, 0]), vec![0, 1, 2, 3, 0]);
        assert_eq!(shortcut(&[0]), vec![0, 0]);
        assert!(shortcut(&[]).is_empty());
    }

    #[test]
    fn test_tour_sizes() {
        for n in 0..8 {
            let tour = christofides_tour(&line_costs(n)).unwrap();
            assert!(is_closed_tour(&tour, n), "n={} tour={:?}", n, tour);
        }
    }

    #[test]
    fn test_line_tour_is_optimal() {
        // On a line the best closed tour costs 2 * (n - 1).
        let costs = line_costs(6);
        let tour = christofides_tour(&costs).unwrap();
        assert_eq!(costs.walk_cost(&tour), 10);
    }
}
