use crate::solve::{LinExpr, VarId};

/// Direction of a power leg relative to the household bus.
///
/// A source injects power into the bus (production, storage discharge,
/// grid buy); a sink draws power from it (consumption, storage charge,
/// grid sell). The role fixes the sign of the leg in every balance
/// expression, so sign conventions cannot drift between components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRole {
    Source,
    Sink,
}

/// A bounded, non-negative power leg tagged with its bus direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    pub role: FlowRole,
    pub power: VarId,
}

impl Flow {
    pub fn source(power: VarId) -> Self {
        Self {
            role: FlowRole::Source,
            power,
        }
    }

    pub fn sink(power: VarId) -> Self {
        Self {
            role: FlowRole::Sink,
            power,
        }
    }

    /// Signed contribution of this leg to the bus balance.
    pub fn bus_term(&self) -> LinExpr {
        match self.role {
            FlowRole::Source => LinExpr::term(self.power, 1.0),
            FlowRole::Sink => LinExpr::term(self.power, -1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::{Assignment, ConstraintSystem};

    #[test]
    fn bus_term_sign_follows_role() {
        let mut sys = ConstraintSystem::new();
        let p = sys.variable("p", 0.0, 100.0);
        let assignment = Assignment::new(vec![40.0]);
        assert_eq!(Flow::source(p).bus_term().evaluate(&assignment), 40.0);
        assert_eq!(Flow::sink(p).bus_term().evaluate(&assignment), -40.0);
    }
}
