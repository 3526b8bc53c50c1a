//! Variant rule constraints for the solver kernel.
//!
//! Each constraint implements [`variant_solver_lib::constraint::Constraint`]
//! and can be built directly or through [`standard_factories`], which maps
//! rule names to option-string factories for drivers that configure puzzles
//! from text.
//!
//! Option strings use `;` as the top-level separator, `,` for enumerations,
//! and the kernel's cell-range language for cell lists (`r1c1r2c2`,
//! `r1-3c5`, `r1c1d222`, ...).

pub mod arrow;
pub mod cell_clones;
pub mod chess;
pub mod killer_cage;
pub mod pairs;
pub mod thermometer;

use variant_solver_lib::prelude::FactoryRegistry;

/// A factory registry with every constraint in this crate registered.
///
/// | name | options |
/// |---|---|
/// | `killer` | `<sum>;<cells>` |
/// | `thermometer` / `thermo` | `<cells>` (bulb first) |
/// | `arrow` | `<pill cells>;<shaft cells>` |
/// | `pairs` | markers `s10@r1c1r1c2` etc., `!d1` negatives |
/// | `nonconsecutive` | (no options) |
/// | `antiknight` / `antiking` | (no options) |
/// | `clone` | `<cells>;<cells>` |
pub fn standard_factories() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry.register("killer", killer_cage::factory);
    registry.register("thermometer", thermometer::factory);
    registry.register("thermo", thermometer::factory);
    registry.register("arrow", arrow::factory);
    registry.register("pairs", pairs::factory);
    registry.register("nonconsecutive", pairs::nonconsecutive_factory);
    registry.register("antiknight", chess::antiknight_factory);
    registry.register("antiking", chess::antiking_factory);
    registry.register("clone", cell_clones::factory);
    registry
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn factories_reject_garbage() {
        let factories = standard_factories();
        assert!(factories.create("killer", 9, "nonsense").is_err());
        assert!(factories.create("thermo", 9, "").is_err());
        assert!(factories.create("arrow", 9, "r1c1").is_err());
        assert!(factories.create("clone", 9, "r1c1;r2c1r2c2").is_err());
        assert!(factories.create("no-such-rule", 9, "").is_err());
    }

    #[test]
    fn factory_names() {
        let factories = standard_factories();
        assert!(factories.names().contains(&"killer"));
        assert!(factories.names().contains(&"nonconsecutive"));
    }
}
