use serde::{Deserialize, Serialize};

use crate::expr::QueryExpr;

/// Boolean role of a directive inside the compound query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl Occur {
    /// Parse an external role tag. Unrecognized tags yield `None`, so a
    /// directive carrying one is dropped instead of failing the search.
    /// Tolerant on purpose; tightening this would be an observable change.
    pub fn from_tag(tag: &str) -> Option<Occur> {
        match tag {
            "must" => Some(Occur::Must),
            "should" => Some(Occur::Should),
            "must_not" => Some(Occur::MustNot),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

/// One query fragment tagged with its boolean role.
///
/// Driver factories produce directives tagged `Must`; callers re-tag with
/// the consuming [`should`](Directive::should) / [`must_not`](Directive::must_not)
/// methods before handing the batch to `get`. The expression itself never
/// carries a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    occur: Occur,
    expr: QueryExpr,
}

impl Directive {
    pub fn new(expr: QueryExpr, occur: Occur) -> Self {
        Directive { occur, expr }
    }

    pub fn must(mut self) -> Self {
        self.occur = Occur::Must;
        self
    }

    pub fn should(mut self) -> Self {
        self.occur = Occur::Should;
        self
    }

    pub fn must_not(mut self) -> Self {
        self.occur = Occur::MustNot;
        self
    }

    pub fn occur(&self) -> Occur {
        self.occur
    }

    pub fn expr(&self) -> &QueryExpr {
        &self.expr
    }

    pub fn into_parts(self) -> (Occur, QueryExpr) {
        (self.occur, self.expr)
    }
}
