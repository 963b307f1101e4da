pub mod dijkstra;
pub mod dsu;
pub mod knapsack;
pub mod maze;

/// Common behavior shared by every per-algorithm step type.
///
/// A step is one immutable snapshot of algorithm state plus a human-readable
/// narration line. Steps are produced in execution order by a trace generator
/// and replayed by the player; they are never mutated after emission.
pub trait Step {
    /// Narration line describing the algorithmic event this step records.
    fn message(&self) -> &str;

    /// Whether this step closes its trace (FINISHED/DONE/FAILED kinds).
    fn is_terminal(&self) -> bool;
}

/// The ordered, frozen sequence of steps produced by one generator run.
///
/// A trace is built once from the `Vec` a generator accumulated and offers no
/// way to append or mutate afterwards. Editing the problem instance
/// invalidates the trace; callers regenerate instead of patching.
pub struct Trace<S> {
    steps: Box<[S]>,
}

impl<S: Step> Trace<S> {
    pub fn new(steps: Vec<S>) -> Self {
        debug_assert!(!steps.is_empty(), "a trace always has at least one step");
        debug_assert!(
            steps.last().is_some_and(|s| s.is_terminal()),
            "a trace always ends in a terminal step"
        );
        debug_assert!(
            steps.iter().rev().skip(1).all(|s| !s.is_terminal()),
            "only the last step of a trace is terminal"
        );
        Trace {
            steps: steps.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    pub fn last(&self) -> &S {
        // Non-emptiness is a construction invariant
        self.steps.last().expect("trace is never empty")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }
}

impl<S> std::ops::Index<usize> for Trace<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}
