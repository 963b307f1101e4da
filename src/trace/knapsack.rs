use crate::trace::{Step, Trace};

/// One knapsack item. Weights and values are positive for real instances;
/// the generator itself only requires them to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub weight: u32,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnapsackStepKind {
    /// Zeroed table allocated, base rows/columns in place.
    Init,
    /// One cell was computed from the row above.
    Compare,
    /// Terminal step with the selected items and the reconstruction walk.
    Finished,
}

/// The two candidates weighed for one cell. `take_value` is `None` when the
/// item does not fit at this capacity; an explicit flag, never a sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub skip_value: u64,
    pub take_value: Option<u64>,
    pub weight: u32,
    pub value: u32,
}

/// One snapshot of the DP tabulation.
///
/// `cell` is the `(i, w)` cell a `Compare` step just filled. `selected` and
/// `path_cells` are empty until `Finished`; `path_cells` lists the cells the
/// backtracking reconstruction visited, starting at `(n, capacity)`.
pub struct KnapsackStep {
    pub kind: KnapsackStepKind,
    pub cell: Option<(usize, usize)>,
    pub table: Box<[Box<[u64]>]>,
    pub compare: Option<Comparison>,
    pub selected: Box<[usize]>,
    pub path_cells: Box<[(usize, usize)]>,
    pub message: String,
}

impl Step for KnapsackStep {
    fn message(&self) -> &str {
        &self.message
    }

    fn is_terminal(&self) -> bool {
        self.kind == KnapsackStepKind::Finished
    }
}

/// Fills the `(n+1) x (capacity+1)` table row-major, one `Compare` step per
/// cell, then reconstructs the chosen subset by walking back from
/// `(n, capacity)` and closes with a `Finished` step.
pub fn knapsack_trace(items: &[Item], capacity: u32) -> Trace<KnapsackStep> {
    let n = items.len();
    let width = capacity as usize + 1;
    let mut steps = Vec::new();
    let mut table: Vec<Vec<u64>> = vec![vec![0; width]; n + 1];

    steps.push(KnapsackStep {
        kind: KnapsackStepKind::Init,
        cell: None,
        table: copy_table(&table),
        compare: None,
        selected: Box::new([]),
        path_cells: Box::new([]),
        message: "Initialized DP table with zeros.".to_string(),
    });

    for i in 1..=n {
        let item = items[i - 1];
        for w in 1..width {
            let skip_value = table[i - 1][w];
            let take_value = if item.weight as usize <= w {
                Some(item.value as u64 + table[i - 1][w - item.weight as usize])
            } else {
                None
            };
            table[i][w] = match take_value {
                Some(take) => skip_value.max(take),
                None => skip_value,
            };

            let message = match take_value {
                Some(take) => format!(
                    "Cell ({i}, {w}): skip gives {skip_value}, take gives {} + {} = {take}.",
                    item.value,
                    take - item.value as u64
                ),
                None => format!(
                    "Cell ({i}, {w}): item too heavy ({} > {w}), carrying {skip_value} down.",
                    item.weight
                ),
            };
            steps.push(KnapsackStep {
                kind: KnapsackStepKind::Compare,
                cell: Some((i, w)),
                table: copy_table(&table),
                compare: Some(Comparison {
                    skip_value,
                    take_value,
                    weight: item.weight,
                    value: item.value,
                }),
                selected: Box::new([]),
                path_cells: Box::new([]),
                message,
            });
        }
    }

    // Reconstruction: walk back from the bottom-right corner. An item was
    // taken exactly when its row changed the cell value.
    let mut selected = Vec::new();
    let mut path_cells = Vec::new();
    let mut i = n;
    let mut w = capacity as usize;
    while i > 0 && w > 0 {
        path_cells.push((i, w));
        if table[i][w] != table[i - 1][w] {
            selected.push(i - 1);
            w -= items[i - 1].weight as usize;
        }
        i -= 1;
    }
    selected.reverse();

    let best = table[n][capacity as usize];
    steps.push(KnapsackStep {
        kind: KnapsackStepKind::Finished,
        cell: None,
        table: copy_table(&table),
        compare: None,
        selected: selected.into_boxed_slice(),
        path_cells: path_cells.into_boxed_slice(),
        message: format!("Done: maximum value is {best}."),
    });

    Trace::new(steps)
}

/// Full deep copy of the table at this instant. Simple and quadratic-ish in
/// trace memory, which is fine at the capacities this tool targets.
fn copy_table(table: &[Vec<u64>]) -> Box<[Box<[u64]>]> {
    table
        .iter()
        .map(|row| row.clone().into_boxed_slice())
        .collect()
}
