//! Declared class hierarchy used to route facts to sources.

use std::collections::HashMap;

/// Subclass to superclass edges between fact classes.
///
/// A source declared for class `C` receives facts of `C` and of every
/// class that transitively extends `C`.
///
/// # Example
///
/// ```
/// use solverforge_network::ClassHierarchy;
///
/// let mut hierarchy = ClassHierarchy::new();
/// hierarchy.declare("Manager", "Employee");
/// hierarchy.declare("Employee", "Person");
///
/// assert!(hierarchy.is_a("Manager", "Person"));
/// assert!(!hierarchy.is_a("Person", "Manager"));
/// assert_eq!(hierarchy.lineage("Manager"), vec!["Manager", "Employee", "Person"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    parents: HashMap<&'static str, Vec<&'static str>>,
}

impl ClassHierarchy {
    /// Creates a hierarchy where every class stands alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `subclass` extends `superclass`.
    pub fn declare(&mut self, subclass: &'static str, superclass: &'static str) {
        let parents = self.parents.entry(subclass).or_default();
        if !parents.contains(&superclass) {
            parents.push(superclass);
        }
    }

    /// Returns `class` followed by all of its ancestors, nearest first.
    pub fn lineage(&self, class: &'static str) -> Vec<&'static str> {
        let mut lineage = vec![class];
        let mut cursor = 0;
        while cursor < lineage.len() {
            if let Some(parents) = self.parents.get(lineage[cursor]) {
                for parent in parents {
                    if !lineage.contains(parent) {
                        lineage.push(parent);
                    }
                }
            }
            cursor += 1;
        }
        lineage
    }

    /// Returns true if `class` is `ancestor` or extends it.
    pub fn is_a(&self, class: &'static str, ancestor: &str) -> bool {
        self.lineage(class).contains(&ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamond_lineage_has_no_duplicates() {
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.declare("Lead", "Manager");
        hierarchy.declare("Lead", "Engineer");
        hierarchy.declare("Manager", "Employee");
        hierarchy.declare("Engineer", "Employee");

        assert_eq!(
            hierarchy.lineage("Lead"),
            vec!["Lead", "Manager", "Engineer", "Employee"]
        );
    }

    #[test]
    fn test_cycles_terminate() {
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.declare("A", "B");
        hierarchy.declare("B", "A");
        assert_eq!(hierarchy.lineage("A"), vec!["A", "B"]);
    }

    #[test]
    fn test_unrelated_class() {
        let hierarchy = ClassHierarchy::new();
        assert!(hierarchy.is_a("Shift", "Shift"));
        assert!(!hierarchy.is_a("Shift", "Employee"));
    }
}
