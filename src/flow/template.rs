//! Built-in café ordering flow
//!
//! welcome -> (menu lookup | direct order | recommendation) -> size ->
//! add-ons -> confirm -> submit -> end

use super::{Comparison, Edge, FlowRequest, Instruction, Node, NodeKind, TransitionCondition};

const CAFE_GLOBAL_PROMPT: &str = "You are a friendly, bilingual Caribou Coffee assistant with full knowledge of the menu (English & Arabic preserved exactly from the JSON provided).
Always respond naturally and proactively offer relevant upsells (add-ons, larger sizes, bakery with coffee).
Always state prices in EGP and note they include VAT.
If the user asks for recommendations, suggest popular drinks or combos.
If the user speaks Arabic, reply in Arabic.";

pub fn cafe_order_flow() -> FlowRequest {
    let nodes = vec![
        conversation(
            "start",
            "👋 Welcome to Caribou Coffee! How can I help you today? Would you like to see our drinks, bakery, or full menu?",
            vec![
                prompt_edge("ask_menu", "User asks for menu or specific category", "menu_lookup"),
                prompt_edge("direct_order", "User starts ordering directly", "order_details"),
                prompt_edge("ask_recommendation", "User asks for recommendation", "recommend"),
            ],
        ),
        function(
            "menu_lookup",
            "lookupMenu",
            "Looking up the menu based on your request: {{user_input}}",
            vec![result_edge("menu_to_order", "lookupMenu_result", "order_details")],
        ),
        conversation(
            "recommend",
            "Our most popular drinks are the Caramel High Rise and the Turtle Mocha. Would you like to try one, or see the full menu?",
            vec![prompt_edge(
                "recommend_to_order",
                "User responds to recommendation",
                "order_details",
            )],
        ),
        conversation(
            "order_details",
            "Great choice! What size would you like? We have Small, Medium, and Large, each with its own price.",
            vec![prompt_edge("ask_addons", "User specifies size", "offer_addons")],
        ),
        conversation(
            "offer_addons",
            "Would you like to add any extras? For example: extra espresso, flavor shots, whipped cream, or plant-based milk. Would you like a bakery item with your coffee?",
            vec![prompt_edge("confirm_order", "User responds to addons", "order_confirm")],
        ),
        conversation(
            "order_confirm",
            "Here’s your order summary: {{order_summary}}. Does everything look correct?",
            vec![
                prompt_edge("fulfill_yes", "User confirms", "order_fulfill"),
                prompt_edge("fulfill_no", "User requests changes", "order_details"),
            ],
        ),
        function(
            "order_fulfill",
            "submitOrder",
            "Submitting your order: {{order_data}}",
            vec![result_edge("done", "submitOrder_result", "end")],
        ),
        conversation(
            "end",
            "✅ Your order is placed! Thank you and enjoy your coffee ☕",
            Vec::new(),
        ),
    ];

    FlowRequest {
        global_prompt: Some(CAFE_GLOBAL_PROMPT.to_string()),
        start_speaker: Some("agent".to_string()),
        start_node_id: Some("start".to_string()),
        tool_call_strict_mode: Some(true),
        model_temperature: Some(0.7),
        nodes: Some(nodes),
        ..Default::default()
    }
}

fn conversation(id: &str, text: &str, edges: Vec<Edge>) -> Node {
    Node {
        id: Some(id.to_string()),
        kind: Some(NodeKind::Conversation),
        instruction: Some(Instruction::prompt(text)),
        edges: (!edges.is_empty()).then_some(edges),
        ..Default::default()
    }
}

fn function(id: &str, tool_id: &str, text: &str, edges: Vec<Edge>) -> Node {
    Node {
        id: Some(id.to_string()),
        kind: Some(NodeKind::Function),
        tool_id: Some(tool_id.to_string()),
        wait_for_result: Some(true),
        instruction: Some(Instruction::prompt(text)),
        edges: Some(edges),
        ..Default::default()
    }
}

fn prompt_edge(id: &str, prompt: &str, destination: &str) -> Edge {
    Edge {
        id: Some(id.to_string()),
        transition_condition: Some(TransitionCondition::prompt(prompt)),
        destination_node_id: Some(destination.to_string()),
        ..Default::default()
    }
}

/// Edge taken when a function reports `success` in `variable`
fn result_edge(id: &str, variable: &str, destination: &str) -> Edge {
    Edge {
        id: Some(id.to_string()),
        transition_condition: Some(TransitionCondition {
            kind: Some("equation".to_string()),
            equations: Some(vec![Comparison {
                variable: Some(variable.to_string()),
                value: Some("success".into()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        destination_node_id: Some(destination.to_string()),
        ..Default::default()
    }
}
