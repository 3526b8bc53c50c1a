//! The ranked constraint list and the factory table for named construction.

use crate::constraint::Constraint;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a constraint from its option string for a given grid size.
pub type ConstraintFactory = fn(usize, &str) -> Result<Arc<dyn Constraint>, String>;

/// Maps rule names to factories so drivers can add constraints by
/// `(name, options)` pairs without linking against each rule type.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, ConstraintFactory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a (case-insensitive) name. Later
    /// registrations replace earlier ones.
    pub fn register(&mut self, name: &str, factory: ConstraintFactory) {
        self.factories.insert(name.to_ascii_lowercase(), factory);
    }

    /// Instantiates a constraint, or errors for unknown names and malformed
    /// options.
    pub fn create(
        &self,
        name: &str,
        size: usize,
        options: &str,
    ) -> Result<Arc<dyn Constraint>, String> {
        match self.factories.get(&name.to_ascii_lowercase()) {
            Some(factory) => factory(size, options),
            None => Err(format!("unknown constraint: {}", name)),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

/// The live constraints of one solver, in registration order, with the
/// reverse index from cells to the constraints touching them.
///
/// Constraints never hold pointers to one another; cross-constraint
/// questions ("is this pair already covered by a difference marker?") go
/// through [`ConstraintRegistry::of_kind`].
#[derive(Clone, Debug)]
pub struct ConstraintRegistry {
    constraints: Vec<Arc<dyn Constraint>>,
    subsumed: Vec<bool>,
    touching: Vec<Vec<usize>>,
}

impl ConstraintRegistry {
    pub fn new(constraints: Vec<Arc<dyn Constraint>>, cell_count: usize) -> Self {
        let mut touching = vec![Vec::new(); cell_count];
        for (index, constraint) in constraints.iter().enumerate() {
            for cell in constraint.cells() {
                let list = &mut touching[cell.index()];
                if !list.contains(&index) {
                    list.push(index);
                }
            }
        }
        let subsumed = vec![false; constraints.len()];
        Self {
            constraints,
            subsumed,
            touching,
        }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn get(&self, index: usize) -> &Arc<dyn Constraint> {
        &self.constraints[index]
    }

    pub fn all(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    pub fn is_subsumed(&self, index: usize) -> bool {
        self.subsumed[index]
    }

    /// Constraints still participating in enforcement, in registration order.
    pub fn active(&self) -> impl Iterator<Item = (usize, &Arc<dyn Constraint>)> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.subsumed[*index])
    }

    /// Indices of constraints whose declared cells include `cell`.
    pub fn touching(&self, cell_index: usize) -> &[usize] {
        &self.touching[cell_index]
    }

    /// Indices of constraints with the given generic name.
    pub fn of_kind(&self, name: &str) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name() == name)
            .map(|(index, _)| index)
            .collect()
    }

    /// Marks as subsumed every constraint whose signature equals the
    /// signature of a primitive split off another constraint. Such a
    /// constraint is fully implied and enforcing it again would only repeat
    /// work (or, worse, loop with its subsumer during initialization).
    pub fn detect_subsumption(&mut self) {
        let signatures: Vec<String> = self.constraints.iter().map(|c| c.signature()).collect();

        for (owner, constraint) in self.constraints.iter().enumerate() {
            for primitive in constraint.split_to_primitives() {
                let primitive_sig = primitive.signature();
                for (other, sig) in signatures.iter().enumerate() {
                    if other != owner && !self.subsumed[owner] && *sig == primitive_sig {
                        self.subsumed[other] = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cell_id::CellId;
    use crate::constraint::ConstraintLinks;

    struct Marker {
        kind: &'static str,
        cells: Vec<CellId>,
        primitives: Vec<(&'static str, Vec<CellId>)>,
    }

    impl Constraint for Marker {
        fn name(&self) -> &str {
            self.kind
        }

        fn cells(&self) -> &[CellId] {
            &self.cells
        }

        fn init_links(&self, _board: &crate::board::Board, _init: bool) -> ConstraintLinks {
            ConstraintLinks::new()
        }

        fn split_to_primitives(&self) -> Vec<Arc<dyn Constraint>> {
            self.primitives
                .iter()
                .map(|(kind, cells)| {
                    Arc::new(Marker {
                        kind: *kind,
                        cells: cells.clone(),
                        primitives: Vec::new(),
                    }) as Arc<dyn Constraint>
                })
                .collect()
        }

        fn signature(&self) -> String {
            format!(
                "{}:{}",
                self.kind,
                self.cells
                    .iter()
                    .map(|c| c.index().to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            )
        }
    }

    fn cells(indices: &[usize]) -> Vec<CellId> {
        indices.iter().map(|&i| CellId::new(i, 9)).collect()
    }

    #[test]
    fn touching_index() {
        let registry = ConstraintRegistry::new(
            vec![
                Arc::new(Marker {
                    kind: "A",
                    cells: cells(&[0, 1]),
                    primitives: vec![],
                }),
                Arc::new(Marker {
                    kind: "B",
                    cells: cells(&[1, 2]),
                    primitives: vec![],
                }),
            ],
            81,
        );
        assert_eq!(registry.touching(0), &[0]);
        assert_eq!(registry.touching(1), &[0, 1]);
        assert_eq!(registry.touching(2), &[1]);
        assert!(registry.touching(3).is_empty());
        assert_eq!(registry.of_kind("B"), vec![1]);
    }

    #[test]
    fn primitive_subsumption() {
        // A long "chain" constraint whose split covers the short one.
        let long = Marker {
            kind: "Chain",
            cells: cells(&[0, 1, 2]),
            primitives: vec![("Pair", cells(&[0, 1])), ("Pair", cells(&[1, 2]))],
        };
        let short = Marker {
            kind: "Pair",
            cells: cells(&[0, 1]),
            primitives: vec![],
        };
        let other = Marker {
            kind: "Pair",
            cells: cells(&[4, 5]),
            primitives: vec![],
        };

        let mut registry = ConstraintRegistry::new(
            vec![Arc::new(long), Arc::new(short), Arc::new(other)],
            81,
        );
        registry.detect_subsumption();
        assert!(!registry.is_subsumed(0));
        assert!(registry.is_subsumed(1));
        assert!(!registry.is_subsumed(2));
        assert_eq!(registry.active().count(), 2);
    }
}
