//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint,
    Inequality {
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `variables`: A slice of variable ids
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `equals`: The right hand side of the equality
    ///
    /// # Examples
    /// ```rust
    /// use peptitools_core::optimize::constraint::Constraint;
    /// // Create a constraint representing 3*x + 2*y = 6
    /// let new_constraint = Constraint::new_equality(&["x", "y"], &[3.0, 2.0], 6.);
    /// assert_eq!(format!("{}", new_constraint), "3*x + 2*y = 6");
    /// ```
    pub fn new_equality(variables: &[&str], coefficients: &[f64], equals: f64) -> Self {
        Constraint::Equality {
            terms: Constraint::zip_into_terms(variables, coefficients),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Examples
    /// ```rust
    /// use peptitools_core::optimize::constraint::Constraint;
    /// // represents the inequality 2 <= 3*x + 2*y <= 6
    /// let new_constraint = Constraint::new_inequality(&["x", "y"], &[3.0, 2.0], 2., 6.);
    /// assert_eq!(format!("{}", new_constraint), "2 <= 3*x + 2*y <= 6");
    /// ```
    pub fn new_inequality(
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            terms: Constraint::zip_into_terms(variables, coefficients),
            lower_bound,
            upper_bound,
        }
    }

    /// The linear terms of the constraint
    pub fn terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } => terms,
            Constraint::Inequality { terms, .. } => terms,
        }
    }

    fn zip_into_terms(variables: &[&str], coefficients: &[f64]) -> Vec<ConstraintTerm> {
        variables
            .iter()
            .zip(coefficients)
            .map(|(var, coef)| ConstraintTerm {
                variable: var.to_string(),
                coefficient: *coef,
            })
            .collect()
    }

    /// Convert a vector of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { terms, equals } => {
                write!(f, "{} = {}", Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                terms,
                lower_bound,
                upper_bound,
            } => write!(
                f,
                "{} <= {} <= {}",
                lower_bound,
                Self::terms_to_string(terms),
                upper_bound
            ),
        }
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTerm {
    /// Id of the variable in the problem
    pub variable: String,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable)
    }
}
