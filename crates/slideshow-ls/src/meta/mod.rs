// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Metaheuristics for local search control.
//!
//! Acceptance policies that steer the engine without coupling to the move
//! operators. Implementations conform to the `Metaheuristic` trait and interact
//! with the engine through lightweight lifecycle hooks.
//!
//! Provided heuristics:
//! - `greedy_ascent`: first-improvement hill climber that only accepts strict improvements.
//! - `plateau_ascent`: also accepts sideways moves that keep the best score, so the
//!   search can walk plateaus until a stagnation limit stops it.

pub mod greedy_ascent;
pub mod metaheuristic;
pub mod plateau_ascent;

use crate::meta::{
    greedy_ascent::GreedyAscent, metaheuristic::Metaheuristic, plateau_ascent::PlateauAscent,
};

/// Selects one of the provided metaheuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetaheuristicKind {
    #[default]
    GreedyAscent,
    PlateauAscent,
}

impl MetaheuristicKind {
    pub fn build(self) -> Box<dyn Metaheuristic> {
        match self {
            MetaheuristicKind::GreedyAscent => Box::new(GreedyAscent::new()),
            MetaheuristicKind::PlateauAscent => Box::new(PlateauAscent::new()),
        }
    }
}

impl std::fmt::Display for MetaheuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaheuristicKind::GreedyAscent => write!(f, "GreedyAscent"),
            MetaheuristicKind::PlateauAscent => write!(f, "PlateauAscent"),
        }
    }
}
