#![allow(dead_code)]

//! Reference model and graph generators shared by the integration tests.

/// Every topological order of `graph`, found by exhaustive backtracking.
///
/// Exponential; only for small graphs. Returns no orders for a cyclic graph.
pub fn all_topological_orders(graph: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut in_degree = vec![0usize; graph.len()];
    for targets in graph {
        for &target in targets {
            in_degree[target] += 1;
        }
    }

    let mut search = Search {
        graph,
        in_degree,
        visited: vec![false; graph.len()],
        current: Vec::with_capacity(graph.len()),
        found: Vec::new(),
    };
    search.extend();
    search.found
}

struct Search<'a> {
    graph: &'a [Vec<usize>],
    in_degree: Vec<usize>,
    visited: Vec<bool>,
    current: Vec<usize>,
    found: Vec<Vec<usize>>,
}

impl Search<'_> {
    fn extend(&mut self) {
        if self.current.len() == self.graph.len() {
            self.found.push(self.current.clone());
            return;
        }

        for node in 0..self.graph.len() {
            if self.visited[node] || self.in_degree[node] != 0 {
                continue;
            }

            self.visited[node] = true;
            for &target in &self.graph[node] {
                self.in_degree[target] -= 1;
            }
            self.current.push(node);

            self.extend();

            self.current.pop();
            for &target in &self.graph[node] {
                self.in_degree[target] += 1;
            }
            self.visited[node] = false;
        }
    }
}

/// Small deterministic generator so failures reproduce from the seed.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

/// Random DAG on `nodes` nodes: each pair gets an edge with probability 1/2,
/// always pointing from the higher to the lower label, then labels are shuffled.
pub fn random_dag(nodes: usize, rng: &mut Lcg) -> Vec<Vec<usize>> {
    let mut label: Vec<usize> = (0..nodes).collect();
    for i in (1..nodes).rev() {
        let j = rng.below(i + 1);
        label.swap(i, j);
    }

    let mut graph = vec![Vec::new(); nodes];
    for from in 0..nodes {
        for to in 0..from {
            if rng.coin() {
                graph[label[from]].push(label[to]);
            }
        }
    }
    graph
}

/// Independent order check, used alongside the oracle.
pub fn respects_edges(graph: &[Vec<usize>], order: &[usize]) -> bool {
    if order.len() != graph.len() {
        return false;
    }

    let mut position = vec![usize::MAX; graph.len()];
    for (index, &node) in order.iter().enumerate() {
        if node >= graph.len() || position[node] != usize::MAX {
            return false;
        }
        position[node] = index;
    }

    graph
        .iter()
        .enumerate()
        .all(|(from, targets)| targets.iter().all(|&to| position[from] < position[to]))
}
