//! Conversation-flow payload types
//!
//! Request types keep every field optional so partial bodies deserialize;
//! fields we don't model are carried in `extra` and serialized back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial conversation flow as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_strict_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dynamic_variables: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_tag_display_position: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcps: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully populated conversation flow, ready for the voice-agent API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationFlow {
    pub global_prompt: String,
    pub tools: Vec<Value>,
    pub start_node_id: String,
    pub model_temperature: f64,
    pub tool_call_strict_mode: bool,
    pub default_dynamic_variables: Map<String, Value>,
    pub knowledge_base_ids: Vec<String>,
    pub begin_tag_display_position: Value,
    pub mcps: Vec<Value>,
    pub start_speaker: String,
    pub model_choice: Value,
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<ConversationFlow> for FlowRequest {
    fn from(flow: ConversationFlow) -> Self {
        Self {
            global_prompt: Some(flow.global_prompt),
            tools: Some(flow.tools),
            start_node_id: Some(flow.start_node_id),
            model_temperature: Some(flow.model_temperature),
            tool_call_strict_mode: Some(flow.tool_call_strict_mode),
            default_dynamic_variables: Some(flow.default_dynamic_variables),
            knowledge_base_ids: Some(flow.knowledge_base_ids),
            begin_tag_display_position: Some(flow.begin_tag_display_position),
            mcps: Some(flow.mcps),
            start_speaker: Some(flow.start_speaker),
            model_choice: Some(flow.model_choice),
            nodes: Some(flow.nodes),
            extra: flow.extra,
        }
    }
}

/// Node variant. Vendor types we don't special-case are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Conversation,
    Function,
    Other(String),
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "conversation" => NodeKind::Conversation,
            "function" => NodeKind::Function,
            _ => NodeKind::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Conversation => "conversation".to_string(),
            NodeKind::Function => "function".to_string(),
            NodeKind::Other(s) => s,
        }
    }
}

/// A dialogue state in the flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn is_function(&self) -> bool {
        self.kind == Some(NodeKind::Function)
    }
}

/// Prompt text or a function-call descriptor.
///
/// A bare string is read as prompt text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "InstructionInput")]
pub struct Instruction {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instruction {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: Some("prompt".to_string()),
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Accepted input shapes for [`Instruction`]
#[derive(Deserialize)]
#[serde(untagged)]
enum InstructionInput {
    Text(String),
    Descriptor(InstructionFields),
}

#[derive(Deserialize)]
struct InstructionFields {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<InstructionInput> for Instruction {
    fn from(input: InstructionInput) -> Self {
        match input {
            InstructionInput::Text(text) => Instruction::prompt(text),
            InstructionInput::Descriptor(fields) => Instruction {
                kind: fields.kind,
                text: fields.text,
                name: fields.name,
                extra: fields.extra,
            },
        }
    }
}

/// Transition out of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_condition: Option<TransitionCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_node_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Condition guarding an edge.
///
/// `prompt` conditions carry natural-language text evaluated by the hosted
/// agent; `equation` conditions carry comparisons joined by `operator`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionCondition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equations: Option<Vec<Comparison>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransitionCondition {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            kind: Some("prompt".to_string()),
            prompt: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn is_equation(&self) -> bool {
        self.kind.as_deref() == Some("equation")
    }
}

/// One comparison inside an equation condition.
///
/// Accepts the legacy `{variable, value}` shape on input. Operands may be any
/// JSON scalar; normalization turns them into strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}
