//! Structural checks run on a built flow before it is sent upstream

use super::ConversationFlow;
use std::collections::HashSet;
use thiserror::Error;

/// A single structural problem in a flow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowProblem {
    #[error("node id '{0}' is used more than once")]
    DuplicateNodeId(String),

    #[error("edge '{edge}' on node '{node}' points to unknown node '{destination}'")]
    UnknownDestination {
        node: String,
        edge: String,
        destination: String,
    },

    #[error("edge '{edge}' on node '{node}' has an equation condition with no comparisons")]
    EmptyEquation { node: String, edge: String },
}

/// Every problem found in a flow, reported together
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid conversation flow: {}", summary(.problems))]
pub struct FlowValidationError {
    pub problems: Vec<FlowProblem>,
}

fn summary(problems: &[FlowProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check node ids are unique, edge destinations resolve, and equations are
/// non-empty. Nodes and edges without ids are reported as `?`.
pub fn validate(flow: &ConversationFlow) -> Result<(), FlowValidationError> {
    let mut problems = Vec::new();
    let mut ids = HashSet::new();

    for id in flow.nodes.iter().filter_map(|n| n.id.as_deref()) {
        if !ids.insert(id) {
            problems.push(FlowProblem::DuplicateNodeId(id.to_string()));
        }
    }

    for node in &flow.nodes {
        let node_id = node.id.as_deref().unwrap_or("?");
        for edge in node.edges.iter().flatten() {
            let edge_id = edge.id.as_deref().unwrap_or("?");

            if let Some(destination) = edge.destination_node_id.as_deref() {
                if !ids.contains(destination) {
                    problems.push(FlowProblem::UnknownDestination {
                        node: node_id.to_string(),
                        edge: edge_id.to_string(),
                        destination: destination.to_string(),
                    });
                }
            }

            if let Some(condition) = &edge.transition_condition {
                let empty = condition.equations.as_ref().map_or(true, Vec::is_empty);
                if condition.is_equation() && empty {
                    problems.push(FlowProblem::EmptyEquation {
                        node: node_id.to_string(),
                        edge: edge_id.to_string(),
                    });
                }
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(FlowValidationError { problems })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{build_flow, FlowRequest};
    use serde_json::json;

    fn flow(value: serde_json::Value) -> ConversationFlow {
        build_flow(serde_json::from_value::<FlowRequest>(value).unwrap())
    }

    #[test]
    fn test_empty_flow_is_valid() {
        assert!(validate(&flow(json!({}))).is_ok());
    }

    #[test]
    fn test_resolved_edges_are_valid() {
        let f = flow(json!({
            "nodes": [
                {"id": "start", "type": "conversation",
                 "edges": [{"id": "go", "destination_node_id": "end"}]},
                {"id": "end", "type": "conversation"}
            ]
        }));
        assert!(validate(&f).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let f = flow(json!({
            "nodes": [
                {"id": "start", "type": "conversation", "edges": [
                    {"id": "a", "destination_node_id": "missing"},
                    {"id": "b", "transition_condition": {"type": "equation", "equations": []},
                     "destination_node_id": "start"}
                ]},
                {"id": "start", "type": "conversation"}
            ]
        }));
        let err = validate(&f).unwrap_err();

        assert_eq!(
            err.problems,
            vec![
                FlowProblem::DuplicateNodeId("start".to_string()),
                FlowProblem::UnknownDestination {
                    node: "start".to_string(),
                    edge: "a".to_string(),
                    destination: "missing".to_string(),
                },
                FlowProblem::EmptyEquation {
                    node: "start".to_string(),
                    edge: "b".to_string(),
                },
            ]
        );
        assert!(err.to_string().contains("unknown node 'missing'"));
    }

    #[test]
    fn test_edge_without_destination_is_not_checked() {
        let f = flow(json!({
            "nodes": [{"type": "conversation", "edges": [{"id": "loose"}]}]
        }));
        assert!(validate(&f).is_ok());
    }
}
