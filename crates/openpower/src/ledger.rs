//! Sequential thought ledger with revision and branch cross-referencing.

use crate::types::{OpenPowerError, OpenPowerResult, Thought, ThoughtRecord};

/// Ordered, in-memory record of thoughts.
///
/// Positions are 1-based. A thought whose `sequence_number` falls inside the
/// ledger overwrites that slot; anything past the end is appended as a single
/// element, so the ledger length counts appends rather than the highest
/// number a client has stated.
#[derive(Debug, Clone, Default)]
pub struct ThoughtLedger {
    thoughts: Vec<Thought>,
}

impl ThoughtLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a thought and resolve its revision and branch references.
    ///
    /// References are resolved against the ledger as it stands after the
    /// write, so a revision of position `k` submitted as thought `k` sees
    /// itself. A failed lookup does not undo the write.
    pub fn record(&mut self, thought: Thought) -> OpenPowerResult<ThoughtRecord> {
        let position = thought.sequence_number as usize;

        if position >= 1 && position <= self.thoughts.len() {
            tracing::debug!(position, "Overwriting thought");
            self.thoughts[position - 1] = thought.clone();
        } else {
            tracing::debug!(
                stated = position,
                slot = self.thoughts.len() + 1,
                "Appending thought"
            );
            self.thoughts.push(thought.clone());
        }

        let mut record = ThoughtRecord {
            thought_recorded: true,
            current_sequence: self.thoughts.len(),
            thought,
            original_thought: None,
            branch_point: None,
        };

        if record.thought.is_revision {
            if let Some(target) = record.thought.revises_sequence_number {
                record.original_thought = Some(self.lookup("revises_thought", target)?.clone());
            }
        }

        if let Some(origin) = record.thought.branch_origin {
            record.branch_point = Some(self.lookup("branch_from_thought", origin)?.clone());
        }

        Ok(record)
    }

    fn lookup(&self, field: &'static str, position: u32) -> OpenPowerResult<&Thought> {
        self.get(position)
            .ok_or(OpenPowerError::ReferenceOutOfRange {
                field,
                position,
                len: self.thoughts.len(),
            })
    }

    /// Thought at a 1-based position.
    pub fn get(&self, position: u32) -> Option<&Thought> {
        (position as usize)
            .checked_sub(1)
            .and_then(|index| self.thoughts.get(index))
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// Drop every recorded thought.
    pub fn reset(&mut self) {
        tracing::debug!(cleared = self.thoughts.len(), "Resetting thought ledger");
        self.thoughts.clear();
    }
}
