//! System instruction and message sequence for one chat turn.
//!
//! Pure composition: the same `ChatRequest` always yields the same
//! messages, byte for byte.

use super::context::format_evidence;
use super::history::format_history;
use super::types::ChatMessage;
use crate::models::{ChatRequest, MessageRole};

pub const ROLE_DEFINITION: &str = r#"[SYSTEM ROLE]
You are "Inner Canvas", a psychological visualization engine.
Your goal is to translate abstract feelings into visual metaphors."#;

pub const FIELD_GUIDELINES: &str = r#"[FIELD GUIDELINES]
- **chatResponse**: Warm, empathetic tone. Talk like a wise friend. NO filler phrases like "Let's explore".
- **insight**: **CRITICAL**. This is NOT a clinical diagnosis (e.g., "User is sad"). It is a **Poetic Summary** of the soul's state, led by a metaphor.
  - *Bad:* "用户感到很焦虑" (Robotic)
  - *Good:* "内心深处的一场暴雨" (Poetic) or "在那段关系中逐渐窒息的自我" (Insightful).
- **visualKeyword**: Comma-separated English keywords. Include art style, lighting, and mood.
  - *Example:* "Surrealism, giant rusted gears, sparks, cinematic lighting, dark atmosphere, 8k"
- **soundtrackMood**: Exactly one of: neutral, mystery, tension, melancholy, epiphany.
- **profilingOptions**: Up to three options with ids "A", "B", "C"; each option's `visualKeyword` follows the same English rule."#;

pub const FEW_SHOT_EXAMPLES: &str = r#"[FEW-SHOT EXAMPLES]

**CASE 1: Specific Conflict (Engagement)**
User: "我最近在订婚，对象很让我难受"
AI Output:
{
  "chatResponse": "本来应该是两个人最亲密的时刻，但我听到的却是一种‘格格不入’的摩擦声。这种难受，不像是一时的争吵，更像是有什么东西在根本上咬合不上。这种感觉如果是一幅画，你觉得它长什么样？",
  "visualization": {
    "shouldCreateNode": true,
    "title": "错位的齿轮",
    "insight": "亲密关系中深层的排斥与磨损",
    "visualKeyword": "Surrealism, giant rusted gears grinding together, sparks, mechanical tension, dark grey background, cinematic lighting, 8k resolution, detailed texture"
  },
  "optionsHeader": "这种难受的形状是...",
  "profilingOptions": [
    {
      "id": "A",
      "label": "穿反的鞋子",
      "description": "外表看起来光鲜亮丽，但每走一步，脚都钻心地疼。",
      "visualKeyword": "Close up of beautiful high heels with sharp spikes inside, uncomfortable, pain, cold spotlight, hyperrealistic"
    },
    {
      "id": "B",
      "label": "隔音的玻璃墙",
      "description": "你就在他面前呐喊，但他什么也听不见，只是在笑。",
      "visualKeyword": "Thick glass wall, silhouette of a person screaming, muted colors, loneliness, separation, psychological horror style"
    },
    {
      "id": "C",
      "label": "金色的脚镣",
      "description": "因为承诺，你被锁住了，虽然链子是金做的，但依然是沉重的束缚。",
      "visualKeyword": "Golden shackles on ankle, heavy weight, beautiful but restricting, dark room, single light source"
    }
  ],
  "soundtrackMood": "tension"
}

**CASE 2: Vague Emotion (Loneliness)**
User: "我感觉有点孤独"
AI Output:
{
  "chatResponse": "孤独有时候不是因为没人陪，而是因为心里有一个洞，风一直往里灌。那种感觉很冷，也很空。如果不躲避，试着去看看这个‘洞’，它是什么样子的？",
  "visualization": {
    "shouldCreateNode": false,
    "title": "内心的荒原",
    "insight": "灵魂深处无人回应的空旷",
    "visualKeyword": "Minimalist landscape, vast empty white space, a single small black dot, fog, isolation, ethereal, dreamlike"
  },
  "optionsHeader": "这一刻，你觉得自己像...",
  "profilingOptions": [
    {
      "id": "A",
      "label": "无人接听的电话",
      "description": "听筒里只有忙音，你握着它，却不知道该打给谁。",
      "visualKeyword": "Old rotary phone off the hook, dangling cord, dim room, vintage tone, loneliness, cinematic"
    },
    {
      "id": "B",
      "label": "雾中的灯塔",
      "description": "你发着光，但周围全是雾，没有船只靠近，光芒无处安放。",
      "visualKeyword": "Lighthouse in thick fog, beam of light disappearing into nothingness, moody, blue and grey tones, mystery"
    }
  ],
  "soundtrackMood": "melancholy"
}"#;

pub const CLOSING_INSTRUCTION: &str = "[GENERATE JSON NOW]\n\
Your next output MUST be the JSON object and nothing else: no prose, no markdown fences.";

/// Human name for the language tags the canvas frontend sends.
pub fn language_display_name(tag: &str) -> Option<&'static str> {
    match tag.trim().to_ascii_lowercase().as_str() {
        "en" => Some("English"),
        "zh" => Some("Chinese"),
        "ja" => Some("Japanese"),
        "ko" => Some("Korean"),
        "es" => Some("Spanish"),
        "fr" => Some("French"),
        _ => None,
    }
}

/// `zh (Chinese)` for known tags, the tag itself otherwise.
fn describe_language(tag: &str) -> String {
    match language_display_name(tag) {
        Some(name) => format!("{tag} ({name})"),
        None => tag.to_string(),
    }
}

fn language_name(tag: &str) -> &str {
    language_display_name(tag).unwrap_or(tag)
}

fn language_rules(language: &str) -> String {
    format!(
        "[LANGUAGE RULES - STRICT]\n\
1. **INTERFACE LANGUAGE ({language})**:\n   \
- The fields `chatResponse`, `title`, `insight`, `label`, `description`, `optionsHeader` MUST be in **natural, poetic {language}**.\n   \
- **NO ROBOTIC TRANSLATION**: Do not say \"User feels X\". Name the feeling as an image.\n\
2. **GENERATION LANGUAGE (English)**:\n   \
- The field `visualKeyword` MUST ALWAYS be in **descriptive English**, whatever the interface language. It is fed to an image generator."
    )
}

/// Build the system instruction for a request.
pub fn build_system_prompt(request: &ChatRequest) -> String {
    let language = describe_language(&request.language);
    let rules = language_rules(language_name(&request.language));
    let context = format_evidence(&request.evidence_nodes);
    let history = format_history(&request.history);

    format!(
        "{ROLE_DEFINITION}\n\n{rules}\n\n{FIELD_GUIDELINES}\n\n{FEW_SHOT_EXAMPLES}\n\n\
[CURRENT CONTEXT]\n\
User Language: {language}\n\
User Input: {input}\n\
Context Clues: {context}\n\
Chat History: {history}\n\n\
{CLOSING_INSTRUCTION}\n",
        input = request.user_prompt,
    )
}

/// System message, then every prior turn with its canonical role,
/// then the current user input verbatim.
pub fn build_messages(request: &ChatRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(ChatMessage::new(
        MessageRole::System,
        build_system_prompt(request),
    ));
    messages.extend(
        request
            .history
            .iter()
            .map(|turn| ChatMessage::new(turn.role.message_role(), turn.content.clone())),
    );
    messages.push(ChatMessage::new(MessageRole::User, request.user_prompt.clone()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatTurn, EvidenceNode, TurnRole};

    fn request() -> ChatRequest {
        ChatRequest {
            user_prompt: "I keep dreaming of locked doors".into(),
            history: vec![
                ChatTurn {
                    role: TurnRole::User,
                    content: "hi".into(),
                },
                ChatTurn {
                    role: TurnRole::Assistant,
                    content: "hello".into(),
                },
            ],
            language: "en".into(),
            evidence_nodes: vec![EvidenceNode {
                title: "Locked Door".into(),
                insight: "A threshold never crossed".into(),
            }],
        }
    }

    #[test]
    fn identical_requests_yield_identical_messages() {
        let req = request();
        let first = build_messages(&req);
        let second = build_messages(&req.clone());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn message_sequence_is_system_history_user() {
        let messages = build_messages(&request());
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1], ChatMessage::new(MessageRole::User, "hi"));
        assert_eq!(messages[2], ChatMessage::new(MessageRole::Assistant, "hello"));
        assert_eq!(
            messages[3],
            ChatMessage::new(MessageRole::User, "I keep dreaming of locked doors")
        );
    }

    #[test]
    fn alternate_assistant_label_is_sent_as_assistant() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "userPrompt": "next",
            "chatHistory": [
                {"role": "user", "content": "q"},
                {"role": "model", "content": "a"}
            ],
            "language": "en"
        }))
        .unwrap();

        let wire = serde_json::to_value(build_messages(&req)).unwrap();
        assert_eq!(wire[1]["role"], "user");
        assert_eq!(wire[2]["role"], "assistant");
        assert_eq!(wire[3]["role"], "user");
    }

    #[test]
    fn system_prompt_interpolates_live_context() {
        let prompt = build_system_prompt(&request());
        assert!(prompt.contains("User Language: en (English)"));
        assert!(prompt.contains("User Input: I keep dreaming of locked doors"));
        assert!(prompt.contains("INVESTIGATING SINGLE CLUE: \"Locked Door\""));
        assert!(prompt.contains("Witness (User): hi\nInner Canvas (AI): hello"));
    }

    #[test]
    fn system_prompt_carries_mandatory_clauses() {
        let prompt = build_system_prompt(&request());
        // language split
        assert!(prompt.contains("**natural, poetic English**"));
        assert!(prompt.contains("`visualKeyword` MUST ALWAYS be in **descriptive English**"));
        // field guidance
        assert!(prompt.contains("Warm, empathetic"));
        assert!(prompt.contains("NOT a clinical diagnosis"));
        assert!(prompt.contains("art style, lighting, and mood"));
        // few-shot
        assert!(prompt.contains("**CASE 1:"));
        assert!(prompt.contains("**CASE 2:"));
        // closing
        assert!(prompt.trim_end().ends_with("no prose, no markdown fences."));
    }

    #[test]
    fn unknown_language_tag_is_used_verbatim() {
        let mut req = request();
        req.language = "pt-BR".into();
        let prompt = build_system_prompt(&req);
        assert!(prompt.contains("User Language: pt-BR\n"));
    }

    #[test]
    fn few_shot_examples_are_valid_json() {
        let blocks: Vec<&str> = FEW_SHOT_EXAMPLES.split("AI Output:\n").skip(1).collect();
        assert_eq!(blocks.len(), 2);
        for block in blocks {
            let end = block.find("\n}").unwrap() + 2;
            let value: serde_json::Value = serde_json::from_str(&block[..end]).unwrap();
            assert!(value.get("soundtrackMood").is_some());
        }
    }
}
