//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

/// A continuous variable of a linear program
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Used to identify the variable (unique within a problem)
    pub id: String,
    /// Optional human readable name
    pub name: Option<String>,
    /// Lowest value the variable can take
    pub lower_bound: f64,
    /// Highest value the variable can take
    pub upper_bound: f64,
}

impl Variable {
    /// Create a new variable
    pub fn new(id: &str, name: Option<&str>, lower_bound: f64, upper_bound: f64) -> Variable {
        Variable {
            id: id.to_string(),
            name: name.map(str::to_string),
            lower_bound,
            upper_bound,
        }
    }

    /// Whether the bounds pin the variable to a single value
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "{}:[{}, {}]",
                name, self.lower_bound, self.upper_bound
            ),
            None => write!(
                f,
                "{}:[{}, {}]",
                self.id, self.lower_bound, self.upper_bound
            ),
        }
    }
}
