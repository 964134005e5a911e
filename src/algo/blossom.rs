/*!
# Blossom Matcher

Computes an **optimal** maximum-weight matching with Edmonds' blossom
algorithm in the primal-dual formulation refined by Galil. Runs in `O(n^3)`.

The algorithm maintains a feasible solution of the linear-programming dual
(one variable per node, one per blossom) and a partial matching satisfying
complementary slackness. Each *stage* grows alternating trees from all
unmatched nodes; scanning tight edges either extends a tree, contracts an odd
cycle into a blossom, or finds an augmenting path. When no tight edge is
available, a dual update (the *delta step*) creates one or proves that no
improvement is possible.

## Node pool

Vertices occupy ids `0..n`, blossoms are allocated from the pool `n..2n`
through a free list; both are addressed through the same dense tables of size
`2n`. Every edge `k` owns the two endpoint codes `2k` and `2k + 1`; the code
`p` is attached to vertex `endpoint[p]` and `p ^ 1` is the opposite end of
the same edge. This encodes "the edge from `u` reaching `v`" in one integer.

All weights are non-negative integers. Node duals are stored doubled so that
every quantity the algorithm compares stays integral.
*/

use itertools::Itertools;
use log::debug;

use crate::{
    edge::*,
    graph::Graph,
    matching::Matching,
    node::*,
    trace::TraceSink,
};

use super::{Matcher, Steps};

/// Exact maximum-weight matching; see the module docs.
#[derive(Debug, Copy, Clone, Default)]
pub struct BlossomMatcher;

impl Matcher for BlossomMatcher {
    fn name(&self) -> &'static str {
        "blossom"
    }

    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a> {
        Box::new(BlossomSteps {
            state: BlossomState::new(graph),
            trace,
            stage: 0,
            phase: Phase::StageInit,
        })
    }
}

/// Labels of top-level nodes during a stage.
///
/// S-nodes are reachable from an unmatched node over an even-length
/// alternating path, T-nodes over an odd-length one. `Crumb` is a transient
/// marker used while searching for the common ancestor of two tree paths.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Label {
    Free,
    S,
    T,
    Crumb,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    StageInit,
    Substage,
    Finish,
}

enum DeltaAction {
    /// No further improvement possible; the matching is optimal.
    Optimum,
    /// Progress re-enabled; return to scanning.
    Continue,
}

/// Endpoint code: `2k` and `2k + 1` belong to edge `k`.
type Endp = u32;

/// Node-or-blossom id in `0..2n`.
type Blossom = u32;

struct BlossomSteps<'a> {
    state: BlossomState<'a>,
    trace: &'a mut dyn TraceSink,
    stage: usize,
    phase: Phase,
}

impl Steps for BlossomSteps<'_> {
    fn advance(&mut self) -> Option<Matching> {
        // One step per stage initialization and one per substage round.
        match self.phase {
            Phase::StageInit => {
                if self.stage >= self.state.nvertex {
                    self.phase = Phase::Finish;
                } else {
                    self.trace.step("stage");
                    self.trace.message(&format!("stage {}", self.stage));
                    self.state.begin_stage();
                    self.phase = Phase::Substage;
                }
                self.trace.commit();
                None
            }
            Phase::Substage => {
                self.trace.step("substage");
                if let Some(k) = self.state.scan() {
                    // The stage ended with an augmentation along edge k.
                    self.trace.pick_edge(k, "red");
                    self.stage += 1;
                    self.state.expand_zero_dual_s_blossoms();
                    self.phase = Phase::StageInit;
                } else {
                    match self.state.dual_update() {
                        DeltaAction::Optimum => self.phase = Phase::Finish,
                        DeltaAction::Continue => {}
                    }
                }
                self.trace.commit();
                None
            }
            Phase::Finish => {
                #[cfg(debug_assertions)]
                self.state.verify_optimum();

                let matching = self.state.extract();
                debug!(
                    "blossom finished after {} stages: {} edges matched",
                    self.stage,
                    matching.len()
                );
                for &k in matching.indices() {
                    self.trace.pick_edge(k, "green");
                }
                self.trace.commit();
                Some(matching)
            }
        }
    }
}

/// The dense tables of the primal-dual run; all sized `2n` unless noted.
struct BlossomState<'a> {
    g: &'a Graph,
    nvertex: usize,
    /// `endpoint[p]` is the vertex the endpoint code `p` is attached to.
    endpoint: Vec<Node>,
    /// Per vertex: the remote endpoint codes of its incident edges.
    neighbend: Vec<Vec<Endp>>,
    /// Per vertex: remote endpoint of its matched edge.
    mate: Vec<Option<Endp>>,
    label: Vec<Label>,
    /// Endpoint through which a node acquired its label.
    labelend: Vec<Option<Endp>>,
    /// Per vertex: the top-level blossom containing it (itself if trivial).
    inblossom: Vec<Blossom>,
    blossomparent: Vec<Option<Blossom>>,
    /// Ordered children of a non-trivial blossom, base child first,
    /// traversed cyclically. Empty for trivial/unallocated ids.
    blossomchilds: Vec<Vec<Blossom>>,
    /// Base vertex of a blossom (its recursive leaf), `None` when recycled.
    blossombase: Vec<Option<Node>>,
    /// `blossomendps[b][i]` connects child `i` with child `i + 1 (mod len)`.
    blossomendps: Vec<Vec<Endp>>,
    /// Least-slack edge to an S-node outside the given node.
    bestedge: Vec<Option<EdgeIdx>>,
    /// For non-trivial top-level S-blossoms: least-slack edges towards each
    /// neighboring S-blossom.
    blossombestedges: Vec<Option<Vec<EdgeIdx>>>,
    /// `2 u(v)` for vertices, `z(b)` for blossoms.
    dualvar: Vec<Weight>,
    /// Edges currently known to have zero slack. Indexed per edge.
    allowedge: Vec<bool>,
    /// Newly discovered S-vertices awaiting a scan.
    queue: Vec<Node>,
    /// Free blossom ids in `n..2n`.
    unusedblossoms: Vec<Blossom>,
}

impl<'a> BlossomState<'a> {
    fn new(g: &'a Graph) -> Self {
        let nvertex = g.len();
        let nedge = g.number_of_edges() as usize;

        let endpoint = (0..2 * nedge)
            .map(|p| {
                let e = g.edge((p / 2) as EdgeIdx);
                if p % 2 == 0 {
                    e.source()
                } else {
                    e.target()
                }
            })
            .collect_vec();

        let mut neighbend = vec![Vec::new(); nvertex];
        for (k, e) in g.indexed_edges() {
            neighbend[e.source() as usize].push(2 * k + 1);
            neighbend[e.target() as usize].push(2 * k);
        }

        let maxweight = g.max_weight();

        Self {
            g,
            nvertex,
            endpoint,
            neighbend,
            mate: vec![None; nvertex],
            label: vec![Label::Free; 2 * nvertex],
            labelend: vec![None; 2 * nvertex],
            inblossom: (0..nvertex as Blossom).collect(),
            blossomparent: vec![None; 2 * nvertex],
            blossomchilds: vec![Vec::new(); 2 * nvertex],
            blossombase: (0..nvertex as Node)
                .map(Some)
                .chain((0..nvertex).map(|_| None))
                .collect(),
            blossomendps: vec![Vec::new(); 2 * nvertex],
            bestedge: vec![None; 2 * nvertex],
            blossombestedges: vec![None; 2 * nvertex],
            dualvar: std::iter::repeat_n(maxweight, nvertex)
                .chain(std::iter::repeat_n(0, nvertex))
                .collect(),
            allowedge: vec![false; nedge],
            queue: Vec::new(),
            unusedblossoms: (nvertex as Blossom..2 * nvertex as Blossom).collect(),
        }
    }

    /// `slack(k) = 2 u(i) + 2 u(j) - 2 w(k)`; never meaningful for edges
    /// internal to a blossom.
    #[inline]
    fn slack(&self, k: EdgeIdx) -> Weight {
        let Edge(i, j, wt) = self.g.edge(k);
        self.dualvar[i as usize] + self.dualvar[j as usize] - 2 * wt
    }

    /// Collects the vertices contained in blossom `b` (recursively).
    fn leaves(&self, b: Blossom) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_leaves(b, &mut out);
        out
    }

    fn collect_leaves(&self, b: Blossom, out: &mut Vec<Node>) {
        if (b as usize) < self.nvertex {
            out.push(b);
        } else {
            for &child in &self.blossomchilds[b as usize] {
                self.collect_leaves(child, out);
            }
        }
    }

    /// Cyclic access to `blossomchilds[b]`; negative offsets wrap around.
    #[inline]
    fn child_at(&self, b: Blossom, j: isize) -> Blossom {
        let childs = &self.blossomchilds[b as usize];
        childs[j.rem_euclid(childs.len() as isize) as usize]
    }

    /// Cyclic access to `blossomendps[b]`; negative offsets wrap around.
    #[inline]
    fn endp_at(&self, b: Blossom, j: isize) -> Endp {
        let endps = &self.blossomendps[b as usize];
        endps[j.rem_euclid(endps.len() as isize) as usize]
    }

    /// Resets the per-stage tables and labels all unmatched top-level nodes
    /// with S.
    fn begin_stage(&mut self) {
        self.label.fill(Label::Free);
        self.bestedge.fill(None);
        for b in self.nvertex..2 * self.nvertex {
            self.blossombestedges[b] = None;
        }
        self.allowedge.fill(false);
        self.queue.clear();

        for v in 0..self.nvertex as Node {
            if self.mate[v as usize].is_none()
                && self.label[self.inblossom[v as usize] as usize] == Label::Free
            {
                self.assign_label(v, Label::S, None);
            }
        }
    }

    /// Labels vertex `w` and its top-level blossom with `t`, reached through
    /// endpoint `p`. A fresh T-label immediately S-labels the mate of the
    /// blossom base.
    fn assign_label(&mut self, w: Node, t: Label, p: Option<Endp>) {
        let b = self.inblossom[w as usize];
        assert!(
            self.label[w as usize] == Label::Free && self.label[b as usize] == Label::Free,
            "relabeling an already labeled node"
        );
        self.label[w as usize] = t;
        self.label[b as usize] = t;
        self.labelend[w as usize] = p;
        self.labelend[b as usize] = p;
        self.bestedge[w as usize] = None;
        self.bestedge[b as usize] = None;

        if t == Label::S {
            // b became an S-blossom; scan its vertices.
            let mut leaves = self.leaves(b);
            self.queue.append(&mut leaves);
        } else {
            // b became a T-blossom; its base mate becomes an S-vertex.
            let base = self.blossombase[b as usize].expect("labeled blossom without base");
            let mb = self.mate[base as usize].expect("T-labeled blossom with unmatched base");
            self.assign_label(self.endpoint[mb as usize], Label::S, Some(mb ^ 1));
        }
    }

    /// Phase A: scans S-vertices until either an augmenting path is found
    /// (returns the augmenting edge) or the queue runs dry (returns `None`).
    fn scan(&mut self) -> Option<EdgeIdx> {
        while let Some(v) = self.queue.pop() {
            assert_eq!(
                self.label[self.inblossom[v as usize] as usize],
                Label::S,
                "queued vertex is not inside an S-blossom"
            );

            for idx in 0..self.neighbend[v as usize].len() {
                let p = self.neighbend[v as usize][idx];
                let k = p >> 1;
                let w = self.endpoint[p as usize];

                // Edges internal to a blossom are ignored.
                if self.inblossom[v as usize] == self.inblossom[w as usize] {
                    continue;
                }

                let mut kslack = 0;
                if !self.allowedge[k as usize] {
                    kslack = self.slack(k);
                    if kslack <= 0 {
                        self.allowedge[k as usize] = true;
                    }
                }

                if self.allowedge[k as usize] {
                    let bw = self.inblossom[w as usize];
                    if self.label[bw as usize] == Label::Free {
                        // (v, w) extends the tree: w becomes T.
                        self.assign_label(w, Label::T, Some(p ^ 1));
                    } else if self.label[bw as usize] == Label::S {
                        // Two S-trees touch: blossom or augmenting path.
                        match self.scan_blossom(v, w) {
                            Some(base) => self.add_blossom(base, k),
                            None => {
                                self.augment_matching(k);
                                return Some(k);
                            }
                        }
                    } else if self.label[w as usize] == Label::Free {
                        // w sits inside a T-blossom but was not reached yet.
                        assert_eq!(self.label[bw as usize], Label::T);
                        self.label[w as usize] = Label::T;
                        self.labelend[w as usize] = Some(p ^ 1);
                    }
                } else if self.label[self.inblossom[w as usize] as usize] == Label::S {
                    let b = self.inblossom[v as usize];
                    if self.bestedge[b as usize].is_none_or(|be| kslack < self.slack(be)) {
                        self.bestedge[b as usize] = Some(k);
                    }
                } else if self.label[w as usize] == Label::Free {
                    if self.bestedge[w as usize].is_none_or(|be| kslack < self.slack(be)) {
                        self.bestedge[w as usize] = Some(k);
                    }
                }
            }
        }
        None
    }

    /// Walks back from `v` and `w` in alternation towards the tree roots,
    /// dropping breadcrumbs. Returns the base of the first common S-blossom,
    /// or `None` if the paths end in two distinct roots (an augmenting
    /// path).
    fn scan_blossom(&mut self, v: Node, w: Node) -> Option<Node> {
        let mut path = Vec::new();
        let mut base = None;
        let mut v = Some(v);
        let mut w = Some(w);

        while v.is_some() || w.is_some() {
            let b = self.inblossom[v.expect("walk lost its head") as usize];
            if self.label[b as usize] == Label::Crumb {
                base = self.blossombase[b as usize];
                break;
            }
            assert_eq!(self.label[b as usize], Label::S);
            path.push(b);
            self.label[b as usize] = Label::Crumb;
            debug_assert_eq!(
                self.labelend[b as usize],
                self.mate[self.blossombase[b as usize].unwrap() as usize]
            );

            v = match self.labelend[b as usize] {
                // Reached a root.
                None => None,
                Some(le) => {
                    // Jump over the matched edge and the T-blossom below it.
                    let t = self.endpoint[le as usize];
                    let bt = self.inblossom[t as usize];
                    assert_eq!(self.label[bt as usize], Label::T);
                    let le_t = self.labelend[bt as usize].expect("T-blossom without label end");
                    Some(self.endpoint[le_t as usize])
                }
            };

            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }

        // Remove the breadcrumbs.
        for b in path {
            self.label[b as usize] = Label::S;
        }
        base
    }

    /// Contracts the cycle closed by edge `k` with common ancestor `base`
    /// into a new blossom and recomputes the least-slack edge cache.
    fn add_blossom(&mut self, base: Node, k: EdgeIdx) {
        let Edge(mut v, mut w, _) = self.g.edge(k);
        let bb = self.inblossom[base as usize];
        let mut bv = self.inblossom[v as usize];
        let mut bw = self.inblossom[w as usize];

        let b = self
            .unusedblossoms
            .pop()
            .expect("blossom pool exhausted");
        self.blossombase[b as usize] = Some(base);
        self.blossomparent[b as usize] = None;
        self.blossomparent[bb as usize] = Some(b);

        // Trace back from v to the base, then from w, to assemble the cycle
        // of children base-first together with the endpoints linking them.
        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossomparent[bv as usize] = Some(b);
            path.push(bv);
            let le = self.labelend[bv as usize].expect("cycle child without label end");
            endps.push(le);
            debug_assert!(
                self.label[bv as usize] == Label::T
                    || (self.label[bv as usize] == Label::S
                        && self.labelend[bv as usize]
                            == self.mate[self.blossombase[bv as usize].unwrap() as usize])
            );
            v = self.endpoint[le as usize];
            bv = self.inblossom[v as usize];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossomparent[bw as usize] = Some(b);
            path.push(bw);
            let le = self.labelend[bw as usize].expect("cycle child without label end");
            endps.push(le ^ 1);
            debug_assert!(
                self.label[bw as usize] == Label::T
                    || (self.label[bw as usize] == Label::S
                        && self.labelend[bw as usize]
                            == self.mate[self.blossombase[bw as usize].unwrap() as usize])
            );
            w = self.endpoint[le as usize];
            bw = self.inblossom[w as usize];
        }

        assert_eq!(self.label[bb as usize], Label::S);
        self.blossomchilds[b as usize] = path;
        self.blossomendps[b as usize] = endps;
        self.label[b as usize] = Label::S;
        self.labelend[b as usize] = self.labelend[bb as usize];
        self.dualvar[b as usize] = 0;

        // Relabel the swallowed vertices; former T-vertices become S and
        // must be scanned.
        for leaf in self.leaves(b) {
            if self.label[self.inblossom[leaf as usize] as usize] == Label::T {
                self.queue.push(leaf);
            }
            self.inblossom[leaf as usize] = b;
        }

        // Merge the least-slack caches of the children into the new blossom,
        // keeping one candidate per external S-blossom.
        let mut bestedgeto: Vec<Option<EdgeIdx>> = vec![None; 2 * self.nvertex];
        for child in self.blossomchilds[b as usize].clone() {
            let nblists: Vec<Vec<EdgeIdx>> =
                match self.blossombestedges[child as usize].take() {
                    Some(cached) => vec![cached],
                    None => self
                        .leaves(child)
                        .into_iter()
                        .map(|leaf| {
                            self.neighbend[leaf as usize]
                                .iter()
                                .map(|&p| p >> 1)
                                .collect()
                        })
                        .collect(),
                };
            for nblist in nblists {
                for k2 in nblist {
                    let Edge(mut i, mut j, _) = self.g.edge(k2);
                    if self.inblossom[j as usize] == b {
                        std::mem::swap(&mut i, &mut j);
                    }
                    let bj = self.inblossom[j as usize];
                    if bj != b
                        && self.label[bj as usize] == Label::S
                        && bestedgeto[bj as usize]
                            .is_none_or(|cur| self.slack(k2) < self.slack(cur))
                    {
                        bestedgeto[bj as usize] = Some(k2);
                    }
                }
            }
            self.bestedge[child as usize] = None;
        }

        let candidates = bestedgeto.into_iter().flatten().collect_vec();
        self.bestedge[b as usize] = candidates.iter().copied().min_by_key(|&k2| self.slack(k2));
        self.blossombestedges[b as usize] = Some(candidates);
    }

    /// Dissolves blossom `b`, promoting its children to top level. During a
    /// stage (`endstage == false`) a T-blossom transfers its labels onto the
    /// alternating path from the entry child to the base.
    fn expand_blossom(&mut self, b: Blossom, endstage: bool) {
        for s in self.blossomchilds[b as usize].clone() {
            self.blossomparent[s as usize] = None;
            if (s as usize) < self.nvertex {
                self.inblossom[s as usize] = s;
            } else if endstage && self.dualvar[s as usize] == 0 {
                // A sub-blossom that already lost its dual dissolves too.
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.leaves(s) {
                    self.inblossom[leaf as usize] = s;
                }
            }
        }

        if !endstage && self.label[b as usize] == Label::T {
            // The T-label must be passed down along the path through which b
            // was reached: relabel pairs of children from the entry child
            // towards the base, marking the connecting edges allowable.
            let entry_endp = self.labelend[b as usize].expect("T-blossom without label end");
            let entrychild = self.inblossom[self.endpoint[(entry_endp ^ 1) as usize] as usize];
            let num_childs = self.blossomchilds[b as usize].len() as isize;

            let mut j = self.blossomchilds[b as usize]
                .iter()
                .position(|&c| c == entrychild)
                .expect("entry child is not a child of the expanded blossom")
                as isize;
            let jstep: isize;
            let endptrick: Endp;
            if j % 2 == 1 {
                // Walk forward around the cycle.
                j -= num_childs;
                jstep = 1;
                endptrick = 0;
            } else {
                // Walk backward around the cycle.
                jstep = -1;
                endptrick = 1;
            }

            let mut p = entry_endp;
            while j != 0 {
                // Relabel the T-sub-blossom at the current position.
                self.label[self.endpoint[(p ^ 1) as usize] as usize] = Label::Free;
                let ep = self.endp_at(b, j - endptrick as isize);
                self.label[self.endpoint[(ep ^ endptrick ^ 1) as usize] as usize] = Label::Free;
                self.assign_label(self.endpoint[(p ^ 1) as usize], Label::T, Some(p));

                // The edge between this pair of children is tight.
                self.allowedge[(ep >> 1) as usize] = true;
                j += jstep;
                p = self.endp_at(b, j - endptrick as isize) ^ endptrick;
                self.allowedge[(p >> 1) as usize] = true;
                j += jstep;
            }

            // The base child keeps the T-label of the expanded blossom.
            let bv = self.child_at(b, j);
            let entry_vertex = self.endpoint[(p ^ 1) as usize];
            self.label[entry_vertex as usize] = Label::T;
            self.label[bv as usize] = Label::T;
            self.labelend[entry_vertex as usize] = Some(p);
            self.labelend[bv as usize] = Some(p);
            self.bestedge[bv as usize] = None;

            // The children on the other side of the cycle become unlabeled;
            // those with a reached interior vertex turn into T-blossoms.
            j += jstep;
            while self.child_at(b, j) != entrychild {
                let bv = self.child_at(b, j);
                if self.label[bv as usize] == Label::S {
                    j += jstep;
                    continue;
                }
                let reached = self
                    .leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf as usize] != Label::Free);
                if let Some(v) = reached {
                    assert_eq!(self.label[v as usize], Label::T);
                    assert_eq!(self.inblossom[v as usize], bv);
                    self.label[v as usize] = Label::Free;
                    let base = self.blossombase[bv as usize].unwrap();
                    let mb = self.mate[base as usize].unwrap();
                    self.label[self.endpoint[mb as usize] as usize] = Label::Free;
                    let le = self.labelend[v as usize];
                    self.assign_label(v, Label::T, le);
                }
                j += jstep;
            }
        }

        // Recycle b.
        self.label[b as usize] = Label::Free;
        self.labelend[b as usize] = None;
        self.blossomchilds[b as usize].clear();
        self.blossomendps[b as usize].clear();
        self.blossombase[b as usize] = None;
        self.blossombestedges[b as usize] = None;
        self.unusedblossoms.push(b);
    }

    /// Rotates the internal pairing of blossom `b` so that vertex `v`
    /// becomes the new base, keeping the blossom consistently matched.
    fn augment_blossom(&mut self, b: Blossom, v: Node) {
        // Find the immediate child of b that contains v.
        let mut t = v;
        while self.blossomparent[t as usize] != Some(b) {
            t = self.blossomparent[t as usize].expect("vertex is not inside the blossom");
        }
        if t as usize >= self.nvertex {
            self.augment_blossom(t, v);
        }

        let num_childs = self.blossomchilds[b as usize].len() as isize;
        let i = self.blossomchilds[b as usize]
            .iter()
            .position(|&c| c == t)
            .unwrap() as isize;
        let mut j = i;
        let jstep: isize;
        let endptrick: Endp;
        if i % 2 == 1 {
            j -= num_childs;
            jstep = 1;
            endptrick = 0;
        } else {
            jstep = -1;
            endptrick = 1;
        }

        // Flip the matching on the even-length path from t to the base.
        while j != 0 {
            j += jstep;
            let mut t = self.child_at(b, j);
            let p = self.endp_at(b, j - endptrick as isize) ^ endptrick;
            if t as usize >= self.nvertex {
                self.augment_blossom(t, self.endpoint[p as usize]);
            }
            j += jstep;
            t = self.child_at(b, j);
            if t as usize >= self.nvertex {
                self.augment_blossom(t, self.endpoint[(p ^ 1) as usize]);
            }
            self.mate[self.endpoint[p as usize] as usize] = Some(p ^ 1);
            self.mate[self.endpoint[(p ^ 1) as usize] as usize] = Some(p);
        }

        // Rotate the child list so the new base child comes first.
        self.blossomchilds[b as usize].rotate_left(i as usize);
        self.blossomendps[b as usize].rotate_left(i as usize);
        self.blossombase[b as usize] =
            self.blossombase[self.blossomchilds[b as usize][0] as usize];
        debug_assert_eq!(self.blossombase[b as usize], Some(v));
    }

    /// Swaps matched and unmatched edges along the augmenting path through
    /// edge `k`, walking from both of its endpoints to the tree roots.
    fn augment_matching(&mut self, k: EdgeIdx) {
        let Edge(v, w, _) = self.g.edge(k);
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.inblossom[s as usize];
                assert_eq!(self.label[bs as usize], Label::S);
                debug_assert_eq!(
                    self.labelend[bs as usize],
                    self.mate[self.blossombase[bs as usize].unwrap() as usize]
                );
                if bs as usize >= self.nvertex {
                    self.augment_blossom(bs, s);
                }
                self.mate[s as usize] = Some(p);

                let le = match self.labelend[bs as usize] {
                    // Reached a root: the augmenting path ends here.
                    None => break,
                    Some(le) => le,
                };

                let t = self.endpoint[le as usize];
                let bt = self.inblossom[t as usize];
                assert_eq!(self.label[bt as usize], Label::T);
                let le_t = self.labelend[bt as usize].expect("T-blossom without label end");

                // Step to the S-blossom behind bt and flip the matched edge.
                s = self.endpoint[le_t as usize];
                let j = self.endpoint[(le_t ^ 1) as usize];
                debug_assert_eq!(self.blossombase[bt as usize], Some(t));
                if bt as usize >= self.nvertex {
                    self.augment_blossom(bt, j);
                }
                self.mate[j as usize] = Some(le_t);
                p = le_t ^ 1;
            }
        }
    }

    /// Phase B: no tight edge is available, so the duals move by the largest
    /// feasible delta. The limiting constraint decides how to continue.
    fn dual_update(&mut self) -> DeltaAction {
        // Delta 1: a vertex dual reaching zero ends the algorithm.
        let mut deltatype = 1u8;
        let mut delta = self.dualvar[..self.nvertex]
            .iter()
            .copied()
            .min()
            .expect("dual update on an empty graph");
        let mut deltaedge: Option<EdgeIdx> = None;
        let mut deltablossom: Option<Blossom> = None;

        // Delta 2: least slack towards an unlabeled free vertex.
        for v in 0..self.nvertex {
            if self.label[self.inblossom[v] as usize] == Label::Free {
                if let Some(be) = self.bestedge[v] {
                    let d = self.slack(be);
                    if d < delta {
                        delta = d;
                        deltatype = 2;
                        deltaedge = Some(be);
                    }
                }
            }
        }

        // Delta 3: half the least slack between two top-level S-blossoms.
        for b in 0..2 * self.nvertex {
            if self.blossomparent[b].is_none() && self.label[b] == Label::S {
                if let Some(be) = self.bestedge[b] {
                    let kslack = self.slack(be);
                    debug_assert_eq!(kslack % 2, 0, "S-S slack must be even");
                    let d = kslack / 2;
                    if d < delta {
                        delta = d;
                        deltatype = 3;
                        deltaedge = Some(be);
                    }
                }
            }
        }

        // Delta 4: a top-level T-blossom whose dual reaches zero expands.
        for b in self.nvertex..2 * self.nvertex {
            if self.blossombase[b].is_some()
                && self.blossomparent[b].is_none()
                && self.label[b] == Label::T
                && self.dualvar[b] < delta
            {
                delta = self.dualvar[b];
                deltatype = 4;
                deltablossom = Some(b as Blossom);
            }
        }

        // Apply the delta to all duals.
        for v in 0..self.nvertex {
            match self.label[self.inblossom[v] as usize] {
                Label::S => self.dualvar[v] -= delta,
                Label::T => self.dualvar[v] += delta,
                _ => {}
            }
        }
        for b in self.nvertex..2 * self.nvertex {
            if self.blossombase[b].is_some() && self.blossomparent[b].is_none() {
                match self.label[b] {
                    Label::S => self.dualvar[b] += delta,
                    Label::T => self.dualvar[b] -= delta,
                    _ => {}
                }
            }
        }

        debug!("dual update: delta {delta} (type {deltatype})");
        match deltatype {
            1 => DeltaAction::Optimum,
            2 => {
                // The edge to the free vertex is tight now.
                let k = deltaedge.unwrap();
                self.allowedge[k as usize] = true;
                let Edge(i, j, _) = self.g.edge(k);
                let i = if self.label[self.inblossom[i as usize] as usize] == Label::Free {
                    j
                } else {
                    i
                };
                assert_eq!(self.label[self.inblossom[i as usize] as usize], Label::S);
                self.queue.push(i);
                DeltaAction::Continue
            }
            3 => {
                // The edge between two S-blossoms is tight now.
                let k = deltaedge.unwrap();
                self.allowedge[k as usize] = true;
                let Edge(i, _, _) = self.g.edge(k);
                assert_eq!(self.label[self.inblossom[i as usize] as usize], Label::S);
                self.queue.push(i);
                DeltaAction::Continue
            }
            4 => {
                self.expand_blossom(deltablossom.unwrap(), false);
                DeltaAction::Continue
            }
            _ => unreachable!(),
        }
    }

    /// End-stage expansion: every top-level S-blossom whose dual dropped to
    /// zero dissolves before the next stage.
    fn expand_zero_dual_s_blossoms(&mut self) {
        for b in self.nvertex as Blossom..2 * self.nvertex as Blossom {
            if self.blossomparent[b as usize].is_none()
                && self.blossombase[b as usize].is_some()
                && self.label[b as usize] == Label::S
                && self.dualvar[b as usize] == 0
            {
                self.expand_blossom(b, true);
            }
        }
    }

    /// Reads the matching out of `mate`, deduplicated so every matched edge
    /// appears once, identified by its input index.
    fn extract(&self) -> Matching {
        let mut picked = Vec::new();
        for v in 0..self.nvertex {
            if let Some(p) = self.mate[v] {
                let partner = self.endpoint[p as usize];
                debug_assert_eq!(self.mate[partner as usize], Some(p ^ 1));
                if (v as Node) < partner {
                    picked.push(p >> 1);
                }
            }
        }
        Matching::from_indices(picked)
    }

    /// Optimality certificate for integer weights: dual feasibility,
    /// complementary slackness and fullness of blossoms with positive dual.
    /// Any violation is a bug in the matcher.
    #[cfg(debug_assertions)]
    fn verify_optimum(&self) {
        // 1. All duals are non-negative.
        assert!(self.dualvar[..self.nvertex].iter().all(|&d| d >= 0));
        assert!(self.dualvar[self.nvertex..].iter().all(|&d| d >= 0));

        // 2. Every edge has non-negative slack (corrected by the duals of
        //    the blossoms containing both endpoints); matched edges are
        //    tight.
        for (k, Edge(i, j, _)) in self.g.indexed_edges() {
            let mut s = self.slack(k);

            let chain = |mut x: Blossom| {
                let mut out = vec![x];
                while let Some(parent) = self.blossomparent[x as usize] {
                    out.push(parent);
                    x = parent;
                }
                out.reverse();
                out
            };
            for (bi, bj) in chain(i).into_iter().zip(chain(j)) {
                if bi != bj {
                    break;
                }
                s += 2 * self.dualvar[bi as usize];
            }
            assert!(s >= 0, "edge {k} has negative corrected slack {s}");

            let i_matched_here = self.mate[i as usize].map(|p| p >> 1) == Some(k);
            let j_matched_here = self.mate[j as usize].map(|p| p >> 1) == Some(k);
            if i_matched_here || j_matched_here {
                assert!(i_matched_here && j_matched_here);
                assert_eq!(s, 0, "matched edge {k} is not tight");
            }
        }

        // 3. Unmatched vertices carry a zero dual.
        for v in 0..self.nvertex {
            assert!(self.mate[v].is_some() || self.dualvar[v] == 0);
        }

        // 4. Blossoms with positive dual are full: every other cycle edge is
        //    matched.
        for b in self.nvertex..2 * self.nvertex {
            if self.blossombase[b].is_some() && self.dualvar[b] > 0 {
                assert_eq!(self.blossomendps[b].len() % 2, 1);
                for &p in self.blossomendps[b].iter().skip(1).step_by(2) {
                    assert_eq!(self.mate[self.endpoint[p as usize] as usize], Some(p ^ 1));
                    assert_eq!(self.mate[self.endpoint[(p ^ 1) as usize] as usize], Some(p));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::NaiveMatcher;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    // The debug-only dual-feasibility verifier runs at the end of every
    // blossom invocation in these tests, so each case also certifies
    // feasibility and complementary slackness.

    #[test]
    fn scenario_scores_are_optimal() {
        for (g, best) in scenarios() {
            assert_eq!(run_score(&g, &BlossomMatcher), best, "{g:?}");
        }
    }

    #[test]
    fn triangle_forms_a_blossom() {
        // The odd cycle forces a contraction before the heavy edge wins.
        let g = Graph::from_edges(3, [Edge(0, 1, 1), Edge(1, 2, 1), Edge(0, 2, 10)]);
        let (matching, score) = run_matching(&g, &BlossomMatcher);
        assert_eq!(score, 10);
        assert_eq!(matching.indices(), &[2]);
    }

    #[test]
    fn nested_blossoms() {
        // Two triangles bridged by a heavy edge force nested contraction
        // and expansion: {0,1,2} and {3,4,5} collapse, then augmenting
        // through the bridge requires re-expansion.
        let g = Graph::from_edges(
            6,
            [
                Edge(0, 1, 6),
                Edge(1, 2, 6),
                Edge(0, 2, 6),
                Edge(3, 4, 6),
                Edge(4, 5, 6),
                Edge(3, 5, 6),
                Edge(2, 3, 10),
            ],
        );
        let (matching, score) = run_matching(&g, &BlossomMatcher);
        assert!(matching.is_valid(&g));
        // Optimal: (2-3):10 plus one edge inside each triangle.
        assert_eq!(score, 22);
        assert_eq!(matching.len(), 3);
    }

    #[test]
    fn long_even_path() {
        let g = Graph::from_edges(
            7,
            [
                Edge(0, 1, 10),
                Edge(1, 2, 1),
                Edge(2, 3, 2),
                Edge(3, 4, 9),
                Edge(4, 5, 9),
                Edge(5, 6, 2),
            ],
        );
        assert_eq!(run_score(&g, &BlossomMatcher), 21);
    }

    #[test]
    fn zero_weight_edges_stay_unmatched() {
        let g = Graph::from_edges(4, [Edge(0, 1, 0), Edge(2, 3, 0)]);
        let (matching, score) = run_matching(&g, &BlossomMatcher);
        assert_eq!(score, 0);
        assert!(matching.score(&g) == 0);
    }

    #[test]
    fn agrees_with_naive_on_random_missions() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1729);

        for n in 2..=15 {
            // Exhaustive search on dense graphs explodes beyond ~12 nodes.
            let rates: &[u32] = match n {
                ..=11 => &[15, 40, 75, 100],
                ..=13 => &[15, 40, 75],
                _ => &[15, 40],
            };
            for &rate in rates {
                for _ in 0..3 {
                    let g = random_mission(rng, n, rate);
                    let blossom = run_score(&g, &BlossomMatcher);
                    let naive = run_score(&g, &NaiveMatcher::default());
                    assert_eq!(blossom, naive, "mismatch on {g:?}");
                }
            }
        }
    }

    #[test]
    fn chain_of_triangles() {
        // Triangles linked in a row: every augmentation has to pass through
        // contracted odd cycles, forcing repeated expansion and rotation.
        for triangles in 1..=5u32 {
            let mut edges = Vec::new();
            for t in 0..triangles {
                let base = 3 * t;
                edges.push(Edge(base, base + 1, 3));
                edges.push(Edge(base + 1, base + 2, 4));
                edges.push(Edge(base, base + 2, 5));
                if t > 0 {
                    edges.push(Edge(base - 1, base, 7));
                }
            }
            let g = Graph::from_edges(3 * triangles, edges);
            let blossom = run_score(&g, &BlossomMatcher);
            let naive = run_score(&g, &NaiveMatcher::default());
            assert_eq!(blossom, naive, "mismatch for {triangles} triangles");
        }
    }

    #[test]
    fn handles_structured_worst_cases() {
        // Wheel-ish graphs: a cycle plus spokes, various parities.
        for n in [4u32, 5, 6, 7, 8, 9] {
            let mut edges = Vec::new();
            for v in 1..n {
                edges.push(Edge(v, v % (n - 1) + 1, 2 + (v as i64 % 3)));
            }
            for v in 1..n {
                edges.push(Edge(0, v, 1 + (v as i64 % 2)));
            }
            let g = Graph::from_edges(
                n,
                edges
                    .into_iter()
                    .map(|e| e.normalized())
                    .unique_by(|e| (e.0, e.1))
                    .filter(|e| !e.is_loop())
                    .collect_vec(),
            );
            let blossom = run_score(&g, &BlossomMatcher);
            let naive = run_score(&g, &NaiveMatcher::default());
            assert_eq!(blossom, naive, "mismatch on {g:?}");
        }
    }
}
