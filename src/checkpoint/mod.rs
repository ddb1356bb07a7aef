//! Checkpoint and restore functionality for machine trees.
//!
//! A checkpoint captures the id, status and history of every node in a tree.
//! Callbacks are not serializable; they are supplied again on restore.

use crate::core::{StateHistory, Status};
use crate::machine::{Actions, TransitionMachine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::Validation;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Captured state of one node and its subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeCheckpoint {
    pub id: String,
    pub status: Status,
    pub history: Option<StateHistory<Status>>,
    pub children: Vec<NodeCheckpoint>,
}

impl NodeCheckpoint {
    fn capture(machine: &TransitionMachine) -> Self {
        Self {
            id: machine.id(),
            status: machine.status(),
            history: machine.history(),
            children: machine.children().iter().map(Self::capture).collect(),
        }
    }

    /// Visit this node and its descendants in pre-order.
    pub fn walk(&self) -> Vec<&NodeCheckpoint> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }

    fn restore<F>(&self, actions: &mut F) -> TransitionMachine
    where
        F: FnMut(&str) -> Actions,
    {
        let machine = TransitionMachine::from_parts(
            self.id.clone(),
            actions(&self.id),
            self.history.is_some(),
        );
        // Link while this node is still idle so no child is asked to follow it.
        for child in &self.children {
            machine.add(&child.restore(actions));
        }
        machine.restore_status(self.status, self.history.clone());
        machine
    }
}

/// Serializable checkpoint of a machine tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// The captured root and its subtree
    pub root: NodeCheckpoint,
}

impl Checkpoint {
    /// Capture `machine` and everything below it.
    pub fn capture(machine: &TransitionMachine) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            root: NodeCheckpoint::capture(machine),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Check the checkpoint, collecting every problem instead of stopping
    /// at the first one.
    pub fn validate(&self) -> Validation<(), Vec<CheckpointError>> {
        let nodes = self.root.walk();
        let mut checks: Vec<Validation<(), Vec<CheckpointError>>> = Vec::new();

        checks.push(match self.check_version() {
            Ok(()) => Validation::success(()),
            Err(e) => Validation::failure(vec![e]),
        });

        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                checks.push(Validation::failure(vec![CheckpointError::DuplicateId(
                    node.id.clone(),
                )]));
            }
            if !node.status.is_reachable() {
                checks.push(Validation::failure(vec![
                    CheckpointError::UnreachableStatus {
                        id: node.id.clone(),
                        status: node.status,
                    },
                ]));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Rebuild a live tree, with no callbacks attached.
    pub fn restore(&self) -> Result<TransitionMachine, CheckpointError> {
        self.restore_with(|_| Actions::new())
    }

    /// Rebuild a live tree, asking `actions` for each node's callbacks by id.
    ///
    /// Nodes are linked through the `add` protocol, so `on_event` callbacks
    /// observe the `#child.add` and `#child.become` events. Restored statuses
    /// are written without firing `on_change`.
    pub fn restore_with<F>(&self, mut actions: F) -> Result<TransitionMachine, CheckpointError>
    where
        F: FnMut(&str) -> Actions,
    {
        if let Validation::Failure(errors) = self.validate() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CheckpointError::ValidationFailed(message));
        }

        let machine = self.root.restore(&mut actions);
        debug!(checkpoint = %self.id, root = %self.root.id, "restored machine tree");
        Ok(machine)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == CHECKPOINT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            })
        }
    }
}

impl TransitionMachine {
    /// Capture this machine and its subtree.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::capture(self)
    }
}
