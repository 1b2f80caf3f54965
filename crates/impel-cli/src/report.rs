// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Run summaries and their renderings.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use impel_core::{Body, BodyHandle, Scalar, StepReport};
use serde::Serialize;

use crate::scenario::Scenario;

/// Counters accumulated over every step of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub integrated: usize,
    pub inserted: usize,
    pub candidate_pairs: usize,
    pub narrowphase_tests: usize,
    pub trigger_enters: usize,
    pub trigger_exits: usize,
    pub collision_enters: usize,
    pub collision_exits: usize,
    pub resolved_contacts: usize,
}

impl Totals {
    /// Folds one step into the running totals.
    pub fn add(&mut self, step: &StepReport) {
        self.integrated += step.integrated;
        self.inserted += step.inserted;
        self.candidate_pairs += step.candidate_pairs;
        self.narrowphase_tests += step.narrowphase_tests;
        self.trigger_enters += step.trigger_enters;
        self.trigger_exits += step.trigger_exits;
        self.collision_enters += step.collision_enters;
        self.collision_exits += step.collision_exits;
        self.resolved_contacts += step.resolved_contacts;
    }

    fn rows(&self) -> [(&'static str, usize); 9] {
        [
            ("integrated", self.integrated),
            ("inserted", self.inserted),
            ("candidate pairs", self.candidate_pairs),
            ("narrowphase tests", self.narrowphase_tests),
            ("trigger enters", self.trigger_enters),
            ("trigger exits", self.trigger_exits),
            ("collision enters", self.collision_enters),
            ("collision exits", self.collision_exits),
            ("resolved contacts", self.resolved_contacts),
        ]
    }
}

/// Final state of one live body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyRow {
    pub handle: i32,
    pub kind: String,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
}

impl BodyRow {
    pub fn new<S: Scalar>(handle: BodyHandle, body: &Body<S>) -> Self {
        Self {
            handle: handle.raw(),
            kind: format!("{:?}", body.kind).to_lowercase(),
            position: body.position.to_f32_array(),
            velocity: body.velocity.to_f32_array(),
        }
    }
}

/// Outcome of `impel run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: Scenario,
    /// `"f32"` or `"fixed"`.
    pub lane: &'static str,
    pub steps: u32,
    pub dt: f32,
    pub bodies: usize,
    pub colliders: usize,
    /// Manifold size after the last step.
    pub contacts: usize,
    /// Events observed over the whole run.
    pub events: usize,
    /// Most quadtree entries that overflowed a leaf in any one step.
    pub peak_overflow: usize,
    pub totals: Totals,
    /// Hex blake3 digest of the final world state.
    pub state_hash: String,
    pub bodies_final: Vec<BodyRow>,
}

impl RunSummary {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Two-column table for terminals.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![Cell::new("metric"), Cell::new("value")]);
        let scenario = format!("{:?}", self.scenario).to_lowercase();
        table.add_row(vec![Cell::new("scenario"), Cell::new(scenario)]);
        table.add_row(vec![Cell::new("lane"), Cell::new(self.lane)]);
        table.add_row(vec![Cell::new("steps"), Cell::new(self.steps)]);
        table.add_row(vec![Cell::new("dt"), Cell::new(self.dt)]);
        table.add_row(vec![Cell::new("bodies"), Cell::new(self.bodies)]);
        table.add_row(vec![Cell::new("colliders"), Cell::new(self.colliders)]);
        table.add_row(vec![Cell::new("contacts"), Cell::new(self.contacts)]);
        table.add_row(vec![Cell::new("events"), Cell::new(self.events)]);
        table.add_row(vec![Cell::new("peak overflow"), Cell::new(self.peak_overflow)]);
        for (name, value) in self.totals.rows() {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
        table.add_row(vec![Cell::new("state hash"), Cell::new(&self.state_hash)]);
        table
    }

    /// One row per live body.
    pub fn bodies_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["body", "kind", "x", "y", "vx", "vy"]);
        for row in &self.bodies_final {
            let [x, y] = row.position;
            let [vx, vy] = row.velocity;
            table.add_row(vec![
                Cell::new(row.handle),
                Cell::new(&row.kind),
                Cell::new(format!("{x:.4}")),
                Cell::new(format!("{y:.4}")),
                Cell::new(format!("{vx:.4}")),
                Cell::new(format!("{vy:.4}")),
            ]);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_every_counter() {
        let step = StepReport {
            integrated: 2,
            inserted: 3,
            candidate_pairs: 1,
            narrowphase_tests: 1,
            trigger_enters: 0,
            trigger_exits: 0,
            collision_enters: 1,
            collision_exits: 0,
            resolved_contacts: 1,
        };
        let mut totals = Totals::default();
        totals.add(&step);
        totals.add(&step);
        assert_eq!(totals.integrated, 4);
        assert_eq!(totals.inserted, 6);
        assert_eq!(totals.collision_enters, 2);
        assert_eq!(totals.resolved_contacts, 2);
        assert_eq!(totals.trigger_exits, 0);
    }

    #[test]
    fn body_rows_use_lowercase_kinds() {
        let body = Body::<impel_core::F32Scalar>::default();
        let row = BodyRow::new(BodyHandle::new(3), &body);
        assert_eq!(row.handle, 3);
        assert_eq!(row.kind, "dynamic");
        assert_eq!(row.position, [0.0, 0.0]);
    }
}
