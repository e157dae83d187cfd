use crate::protocol::{
    ASSISTANT_ROLE, BEGIN_OF_TEXT, ConversationTurn, END_OF_TURN, TOOL_CALL_END, TOOL_CALL_START,
    TOOLS_END, TOOLS_START, role_header,
};

pub const TOOL_CALL_FORMAT: &str = r#"{"arguments": <args-dict>, "name": <function-name>}"#;

const SYSTEM_INSTRUCTIONS: &str = "You are a function calling AI model. You are provided with function signatures within <tools></tools> XML tags. You may call one or more functions to assist with the user query. Don't make assumptions about what values to plug into functions. Here are the available tools:";

const CALL_INSTRUCTIONS: &str = "For each function call return a json object with function name and arguments within <tool_call></tool_call> XML tags as follows:";

pub fn build_prompt(turns: &[ConversationTurn], functions: &str) -> String {
    let mut prompt = system_header(functions);

    for turn in turns {
        prompt.push_str(&role_header(&turn.role));
        prompt.push_str(&turn.content);
        prompt.push_str(END_OF_TURN);
    }

    prompt.push_str(&role_header(ASSISTANT_ROLE));
    prompt
}

fn system_header(functions: &str) -> String {
    let lines = [
        SYSTEM_INSTRUCTIONS,
        TOOLS_START,
        functions,
        TOOLS_END,
        CALL_INSTRUCTIONS,
        TOOL_CALL_START,
        TOOL_CALL_FORMAT,
        TOOL_CALL_END,
        END_OF_TURN,
    ];
    format!("{BEGIN_OF_TEXT}{}\n{}", role_header("system"), lines.join("\n"))
}
