//! Property-based tests for flow defaulting and normalization
//!
//! - Absent fields come out with their defaults, present ones unchanged
//! - Function nodes always end up with a tool id
//! - Non-equation conditions always end up as prompts
//! - Building is idempotent

use super::*;
use proptest::option;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _{}.!?]{0,40}"
}

fn arb_id() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

fn arb_node_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Conversation),
        Just(NodeKind::Function),
        Just(NodeKind::Other("end".to_string())),
    ]
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    (
        option::of(prop_oneof![
            Just("prompt".to_string()),
            Just("custom_function".to_string()),
        ]),
        option::of(arb_text()),
        option::of(arb_id()),
    )
        .prop_map(|(kind, text, name)| Instruction {
            kind,
            text,
            name,
            ..Default::default()
        })
}

fn arb_comparison() -> impl Strategy<Value = Comparison> {
    prop_oneof![
        (option::of(arb_id()), option::of(arb_id())).prop_map(|(variable, value)| Comparison {
            variable,
            value: value.map(Into::into),
            ..Default::default()
        }),
        (arb_id(), arb_id()).prop_map(|(left, right)| Comparison {
            left: Some(left),
            operator: Some("!=".to_string()),
            right: Some(right.into()),
            ..Default::default()
        }),
    ]
}

fn arb_condition() -> impl Strategy<Value = TransitionCondition> {
    prop_oneof![
        option::of(arb_text()).prop_map(|prompt| TransitionCondition {
            kind: Some("prompt".to_string()),
            prompt,
            ..Default::default()
        }),
        Just(TransitionCondition {
            kind: Some("always".to_string()),
            ..Default::default()
        }),
        (
            proptest::collection::vec(arb_comparison(), 0..3),
            option::of(prop_oneof![Just("&&".to_string()), Just("||".to_string())]),
        )
            .prop_map(|(equations, operator)| TransitionCondition {
                kind: Some("equation".to_string()),
                equations: Some(equations),
                operator,
                ..Default::default()
            }),
    ]
}

fn arb_edge() -> impl Strategy<Value = Edge> {
    (option::of(arb_id()), option::of(arb_condition()), option::of(arb_id())).prop_map(
        |(id, transition_condition, destination_node_id)| Edge {
            id,
            transition_condition,
            destination_node_id,
            ..Default::default()
        },
    )
}

fn arb_node() -> impl Strategy<Value = Node> {
    (
        option::of(arb_id()),
        option::of(arb_node_kind()),
        option::of(arb_instruction()),
        option::of(arb_id()),
        option::of(prop_oneof![
            Just("custom_function".to_string()),
            Just("local".to_string()),
            Just("shared".to_string()),
        ]),
        option::of(any::<bool>()),
        option::of(proptest::collection::vec(arb_edge(), 0..3)),
    )
        .prop_map(
            |(id, kind, instruction, tool_id, tool_type, wait_for_result, edges)| Node {
                id,
                kind,
                instruction,
                tool_id,
                tool_type,
                wait_for_result,
                edges,
                ..Default::default()
            },
        )
}

fn arb_request() -> impl Strategy<Value = FlowRequest> {
    (
        option::of(arb_text()),
        option::of(arb_id()),
        option::of((0u8..=20).prop_map(|n| f64::from(n) / 10.0)),
        option::of(any::<bool>()),
        option::of(prop_oneof![Just("agent".to_string()), Just("user".to_string())]),
        option::of(proptest::collection::vec(arb_id(), 0..3)),
        option::of(proptest::collection::vec(arb_node(), 0..5)),
    )
        .prop_map(
            |(global_prompt, start_node_id, model_temperature, strict, start_speaker, kbs, nodes)| {
                FlowRequest {
                    global_prompt,
                    start_node_id,
                    model_temperature,
                    tool_call_strict_mode: strict,
                    start_speaker,
                    knowledge_base_ids: kbs,
                    nodes,
                    ..Default::default()
                }
            },
        )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_scalar_fields_default_or_preserved(req in arb_request()) {
        let flow = build_flow(req.clone());

        prop_assert_eq!(
            &flow.global_prompt,
            req.global_prompt.as_deref().unwrap_or(DEFAULT_GLOBAL_PROMPT)
        );
        prop_assert_eq!(
            &flow.start_node_id,
            req.start_node_id.as_deref().unwrap_or(DEFAULT_START_NODE_ID)
        );
        prop_assert_eq!(
            &flow.start_speaker,
            req.start_speaker.as_deref().unwrap_or(DEFAULT_START_SPEAKER)
        );
        prop_assert_eq!(flow.tool_call_strict_mode, req.tool_call_strict_mode.unwrap_or(true));
        prop_assert_eq!(
            flow.model_temperature.to_bits(),
            req.model_temperature.unwrap_or(DEFAULT_MODEL_TEMPERATURE).to_bits()
        );
        prop_assert_eq!(flow.knowledge_base_ids, req.knowledge_base_ids.unwrap_or_default());
        prop_assert_eq!(flow.model_choice, default_model_choice());
        prop_assert_eq!(flow.begin_tag_display_position, default_display_position());
        prop_assert_eq!(flow.nodes.len(), req.nodes.as_ref().map_or(0, Vec::len));
    }

    #[test]
    fn prop_function_nodes_get_tool_id(node in arb_node()) {
        let expected = node
            .tool_id
            .clone()
            .or_else(|| node.instruction.as_ref().and_then(|i| i.name.clone()))
            .unwrap_or_else(|| DEFAULT_TOOL_ID.to_string());
        let is_function = node.is_function();
        let original_tool_id = node.tool_id.clone();

        let out = normalize_node(node);

        if is_function {
            prop_assert_eq!(out.tool_id, Some(expected));
            prop_assert!(out.wait_for_result.is_some());
            let instruction = out.instruction.unwrap();
            prop_assert_eq!(instruction.kind.as_deref(), Some("prompt"));
            prop_assert!(instruction.text.is_some());
            prop_assert!(instruction.name.is_none());
            prop_assert_ne!(out.tool_type.as_deref(), Some("custom_function"));
        } else {
            prop_assert_eq!(out.tool_id, original_tool_id);
        }
    }

    #[test]
    fn prop_non_equation_edges_become_prompts(edge in arb_edge()) {
        let was_equation = edge
            .transition_condition
            .as_ref()
            .is_some_and(TransitionCondition::is_equation);
        let prompt = edge.transition_condition.as_ref().and_then(|c| c.prompt.clone());

        let out = normalize_edge(edge).transition_condition.unwrap();

        if was_equation {
            for comparison in out.equations.iter().flatten() {
                prop_assert!(comparison.left.is_some());
                prop_assert!(comparison.operator.is_some());
                prop_assert!(comparison.right.is_some());
                prop_assert!(comparison.variable.is_none());
                prop_assert!(comparison.value.is_none());
            }
            prop_assert!(out.operator.is_some());
        } else {
            prop_assert_eq!(
                out,
                TransitionCondition::prompt(prompt.unwrap_or_else(|| DEFAULT_TRANSITION_PROMPT.to_string()))
            );
        }
    }

    #[test]
    fn prop_build_is_idempotent(req in arb_request()) {
        let once = build_flow(req);
        let twice = build_flow(FlowRequest::from(once.clone()));
        prop_assert_eq!(once, twice);
    }
}
