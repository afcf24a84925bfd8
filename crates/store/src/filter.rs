use serde_json::Value;

/// Comparison operators supported by the upstream query interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Neq,
    Gte,
    Lt,
}

impl Op {
    /// Operator keyword as it appears in the REST query string.
    pub fn keyword(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Gte => "gte",
            Op::Lt => "lt",
        }
    }
}

/// One column predicate, rendered as `column=op.value` on the wire.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

impl Filter {
    pub fn new(column: &str, op: Op, value: impl Into<Value>) -> Self {
        Self { column: column.to_string(), op, value: value.into() }
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn neq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Neq, value)
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Gte, value)
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Lt, value)
    }

    /// Query-string form, e.g. `quantity=lt.10`.
    pub fn to_query_pair(&self) -> (String, String) {
        let rendered = match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (self.column.clone(), format!("{}.{}", self.op.keyword(), rendered))
    }
}
