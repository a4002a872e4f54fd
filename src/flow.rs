//! Conversation-flow payload builder
//!
//! Turns a partial [`FlowRequest`] into a fully populated
//! [`ConversationFlow`]: every absent field gets its default, function nodes
//! and edge conditions are rewritten into the shape the voice-agent API
//! expects, and the result is checked before anything goes over the wire.
//!
//! All rewriting is idempotent: building an already-built flow is a no-op.

mod template;
mod types;
mod validate;

#[cfg(test)]
mod proptests;

pub use template::cafe_order_flow;
pub use types::*;
pub use validate::{validate, FlowProblem, FlowValidationError};

use serde_json::{json, Value};
#[cfg(test)]
use serde_json::Map;

pub const DEFAULT_GLOBAL_PROMPT: &str = "You are a friendly bilingual coffee shop assistant with full knowledge of the menu (English & Arabic preserved exactly from the JSON provided).
Always respond naturally, offering relevant upsells (add-ons, larger sizes, bakery with coffee).
Always state prices in EGP and note they include VAT.";

pub const DEFAULT_START_NODE_ID: &str = "start";
pub const DEFAULT_START_SPEAKER: &str = "agent";
pub const DEFAULT_MODEL_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOOL_ID: &str = "default_tool";
pub const DEFAULT_FUNCTION_TEXT: &str = "Executing function";
pub const DEFAULT_TRANSITION_PROMPT: &str = "Default transition";

/// Tool type the API expects for functions hosted by this deployment
pub const LOCAL_TOOL_TYPE: &str = "local";
/// Older payloads name local tools this way
const LEGACY_TOOL_TYPE: &str = "custom_function";

const DEFAULT_EQUATION_LEFT: &str = "result";
const DEFAULT_EQUATION_RIGHT: &str = "success";
const DEFAULT_COMPARISON_OPERATOR: &str = "==";
const DEFAULT_COMBINING_OPERATOR: &str = "&&";

pub fn default_model_choice() -> Value {
    json!({
        "type": "cascading",
        "model": "gpt-4o",
        "high_priority": true,
    })
}

pub fn default_display_position() -> Value {
    json!({ "x": 100, "y": 200 })
}

/// Fill defaults and normalize nodes. Never fails; see [`prepare`] for the
/// validating variant.
pub fn build_flow(request: FlowRequest) -> ConversationFlow {
    ConversationFlow {
        global_prompt: request
            .global_prompt
            .unwrap_or_else(|| DEFAULT_GLOBAL_PROMPT.to_string()),
        tools: request.tools.unwrap_or_default(),
        start_node_id: request
            .start_node_id
            .unwrap_or_else(|| DEFAULT_START_NODE_ID.to_string()),
        model_temperature: request
            .model_temperature
            .unwrap_or(DEFAULT_MODEL_TEMPERATURE),
        tool_call_strict_mode: request.tool_call_strict_mode.unwrap_or(true),
        default_dynamic_variables: request.default_dynamic_variables.unwrap_or_default(),
        knowledge_base_ids: request.knowledge_base_ids.unwrap_or_default(),
        begin_tag_display_position: request
            .begin_tag_display_position
            .unwrap_or_else(default_display_position),
        mcps: request.mcps.unwrap_or_default(),
        start_speaker: request
            .start_speaker
            .unwrap_or_else(|| DEFAULT_START_SPEAKER.to_string()),
        model_choice: request.model_choice.unwrap_or_else(default_model_choice),
        nodes: request
            .nodes
            .unwrap_or_default()
            .into_iter()
            .map(normalize_node)
            .collect(),
        extra: request.extra,
    }
}

/// Build and validate in one step
pub fn prepare(request: FlowRequest) -> Result<ConversationFlow, FlowValidationError> {
    let flow = build_flow(request);
    validate(&flow)?;
    Ok(flow)
}

pub fn normalize_node(mut node: Node) -> Node {
    if node.is_function() {
        let instruction = node.instruction.take().unwrap_or_default();

        if node.tool_id.is_none() {
            node.tool_id = Some(
                instruction
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TOOL_ID.to_string()),
            );
        }

        node.tool_type = match node.tool_type.take() {
            None => Some(LOCAL_TOOL_TYPE.to_string()),
            Some(t) if t == LEGACY_TOOL_TYPE => Some(LOCAL_TOOL_TYPE.to_string()),
            Some(t) => Some(t),
        };

        node.wait_for_result = Some(node.wait_for_result.unwrap_or(true));

        node.instruction = Some(Instruction::prompt(
            instruction
                .text
                .unwrap_or_else(|| DEFAULT_FUNCTION_TEXT.to_string()),
        ));
    }

    node.edges = node
        .edges
        .map(|edges| edges.into_iter().map(normalize_edge).collect());

    node
}

pub fn normalize_edge(mut edge: Edge) -> Edge {
    let condition = edge.transition_condition.take().unwrap_or_default();
    edge.transition_condition = Some(normalize_condition(condition));
    edge
}

fn normalize_condition(condition: TransitionCondition) -> TransitionCondition {
    if !condition.is_equation() {
        return TransitionCondition::prompt(
            condition
                .prompt
                .unwrap_or_else(|| DEFAULT_TRANSITION_PROMPT.to_string()),
        );
    }

    TransitionCondition {
        equations: Some(
            condition
                .equations
                .unwrap_or_default()
                .into_iter()
                .map(normalize_comparison)
                .collect(),
        ),
        operator: Some(
            condition
                .operator
                .unwrap_or_else(|| DEFAULT_COMBINING_OPERATOR.to_string()),
        ),
        ..condition
    }
}

fn normalize_comparison(comparison: Comparison) -> Comparison {
    let left = comparison
        .left
        .or(comparison.variable)
        .unwrap_or_else(|| DEFAULT_EQUATION_LEFT.to_string());
    let right = comparison
        .right
        .or(comparison.value)
        .map_or_else(|| DEFAULT_EQUATION_RIGHT.to_string(), value_to_operand);

    Comparison {
        left: Some(left),
        operator: Some(
            comparison
                .operator
                .unwrap_or_else(|| DEFAULT_COMPARISON_OPERATOR.to_string()),
        ),
        right: Some(Value::String(right)),
        variable: None,
        value: None,
    }
}

/// Comparison operands are strings on the wire
fn value_to_operand(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Serialize a flow the way it is sent upstream
#[cfg(test)]
pub fn to_payload(flow: &ConversationFlow) -> Map<String, Value> {
    match serde_json::to_value(flow) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
