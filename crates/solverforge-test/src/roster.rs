//! Shift rostering test fixtures.
//!
//! A small employee-scheduling domain covering every shape a network test
//! needs: an entity whose planning variable may be unassigned ([`Shift`]),
//! problem facts ([`Employee`], [`Unavailability`]) and a subclass
//! (`Manager` extends `Employee`).
//!
//! # Example
//!
//! ```
//! use solverforge_core::Fact;
//! use solverforge_test::roster::{Employee, Roster, Shift};
//!
//! let open = Roster::shift(Shift::new(1, None));
//! assert_eq!(open.class_name(), "Shift");
//! assert!(!open.is_initialized());
//!
//! let boss = Roster::manager(Employee::new(2, "Grace"));
//! assert_eq!(boss.class_name(), "Manager");
//! assert_eq!(boss.fact_id(), Roster::employee_id(2));
//! ```

use solverforge_core::Fact;

/// Class name of [`Roster::Shift`] facts.
pub const SHIFT: &str = "Shift";
/// Class name of [`Roster::Employee`] facts.
pub const EMPLOYEE: &str = "Employee";
/// Class name of [`Roster::Manager`] facts; declared as a subclass of `Employee`.
pub const MANAGER: &str = "Manager";
/// Class name of [`Roster::Unavailability`] facts.
pub const UNAVAILABILITY: &str = "Unavailability";

/// A shift, optionally assigned to an employee.
#[derive(Clone, Debug, PartialEq)]
pub struct Shift {
    pub id: usize,
    pub employee: Option<usize>,
    pub start: i64,
    pub end: i64,
    pub hours: i64,
}

impl Shift {
    /// Creates an eight hour shift starting at hour 0.
    pub fn new(id: usize, employee: Option<usize>) -> Self {
        Self {
            id,
            employee,
            start: 0,
            end: 8,
            hours: 8,
        }
    }

    /// Moves the shift to `[start, end)`.
    pub fn at(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = end;
        self.hours = end - start;
        self
    }

    /// Returns a copy assigned to `employee`.
    pub fn assigned(&self, employee: Option<usize>) -> Self {
        Self {
            employee,
            ..self.clone()
        }
    }

    /// Returns true if both shifts share at least one hour.
    pub fn overlaps(&self, other: &Shift) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An employee (or manager) shifts can be assigned to.
#[derive(Clone, Debug, PartialEq)]
pub struct Employee {
    pub id: usize,
    pub name: String,
    pub max_hours: i64,
}

impl Employee {
    /// Creates an employee with a 40 hour limit.
    pub fn new(id: usize, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            max_hours: 40,
        }
    }

    pub fn with_max_hours(mut self, max_hours: i64) -> Self {
        self.max_hours = max_hours;
        self
    }
}

/// A day on which an employee cannot work.
#[derive(Clone, Debug, PartialEq)]
pub struct Unavailability {
    pub id: usize,
    pub employee: usize,
    pub day: i64,
}

impl Unavailability {
    pub fn new(id: usize, employee: usize, day: i64) -> Self {
        Self { id, employee, day }
    }
}

/// Family of a [`RosterId`]; managers share the employee id space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RosterKind {
    Shift,
    Employee,
    Unavailability,
}

/// Identity of a roster fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RosterId {
    pub kind: RosterKind,
    pub id: usize,
}

/// Every fact of the rostering domain.
#[derive(Clone, Debug, PartialEq)]
pub enum Roster {
    Shift(Shift),
    Employee(Employee),
    Manager(Employee),
    Unavailability(Unavailability),
}

impl Roster {
    pub fn shift(shift: Shift) -> Self {
        Roster::Shift(shift)
    }

    pub fn employee(employee: Employee) -> Self {
        Roster::Employee(employee)
    }

    pub fn manager(manager: Employee) -> Self {
        Roster::Manager(manager)
    }

    pub fn unavailability(unavailability: Unavailability) -> Self {
        Roster::Unavailability(unavailability)
    }

    pub fn shift_id(id: usize) -> RosterId {
        RosterId {
            kind: RosterKind::Shift,
            id,
        }
    }

    /// Id of an employee or manager.
    pub fn employee_id(id: usize) -> RosterId {
        RosterId {
            kind: RosterKind::Employee,
            id,
        }
    }

    pub fn unavailability_id(id: usize) -> RosterId {
        RosterId {
            kind: RosterKind::Unavailability,
            id,
        }
    }

    /// # Panics
    ///
    /// Panics if this is not a shift.
    pub fn as_shift(&self) -> &Shift {
        match self {
            Roster::Shift(shift) => shift,
            other => panic!("expected a shift, found {:?}", other),
        }
    }

    /// Returns the employee behind an `Employee` or `Manager` fact.
    ///
    /// # Panics
    ///
    /// Panics for any other fact.
    pub fn as_employee(&self) -> &Employee {
        match self {
            Roster::Employee(employee) | Roster::Manager(employee) => employee,
            other => panic!("expected an employee, found {:?}", other),
        }
    }

    /// # Panics
    ///
    /// Panics if this is not an unavailability.
    pub fn as_unavailability(&self) -> &Unavailability {
        match self {
            Roster::Unavailability(unavailability) => unavailability,
            other => panic!("expected an unavailability, found {:?}", other),
        }
    }
}

impl Fact for Roster {
    type Id = RosterId;

    fn fact_id(&self) -> RosterId {
        match self {
            Roster::Shift(s) => Roster::shift_id(s.id),
            Roster::Employee(e) | Roster::Manager(e) => Roster::employee_id(e.id),
            Roster::Unavailability(u) => Roster::unavailability_id(u.id),
        }
    }

    fn class_name(&self) -> &'static str {
        match self {
            Roster::Shift(_) => SHIFT,
            Roster::Employee(_) => EMPLOYEE,
            Roster::Manager(_) => MANAGER,
            Roster::Unavailability(_) => UNAVAILABILITY,
        }
    }

    fn is_initialized(&self) -> bool {
        match self {
            Roster::Shift(s) => s.employee.is_some(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_shares_employee_ids() {
        let employee = Roster::employee(Employee::new(4, "Ada"));
        let manager = Roster::manager(Employee::new(4, "Ada"));
        assert_eq!(employee.fact_id(), manager.fact_id());
        assert_ne!(employee.class_name(), manager.class_name());
    }

    #[test]
    fn test_shift_overlap() {
        let morning = Shift::new(1, Some(1)).at(6, 14);
        let evening = Shift::new(2, Some(1)).at(14, 22);
        let late = Shift::new(3, Some(1)).at(12, 20);
        assert!(!morning.overlaps(&evening));
        assert!(morning.overlaps(&late));
        assert!(late.overlaps(&evening));
    }

    #[test]
    #[should_panic(expected = "expected a shift")]
    fn test_as_shift_on_employee_panics() {
        Roster::employee(Employee::new(1, "Ada")).as_shift();
    }
}
