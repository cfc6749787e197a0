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

//! Greedy construction and local search over slide sequences.
//!
//! A run builds a feasible sequence with `construction::GreedyConstruction`
//! and improves it in `engine::LocalSearchEngine` by applying neighborhood
//! moves (`operator`) under an acceptance policy (`meta`). The working
//! `state::SearchState` tracks photo usage so that every sequence the engine
//! holds uses each photo at most once. `portfolio::LocalSearchPortfolioSolver`
//! packages a run as one worker of a multi-start solve.

pub mod construction;
pub mod engine;
pub mod meta;
pub mod operator;
pub mod portfolio;
pub mod result;
pub mod state;
