//! Reaction parsing for the blogserver like API.

use crate::scrapers::{ReactionCount, ReactionSummary};

/// Parse the like API payload. None when the payload is not the expected
/// JSON shape; an empty `contents` array is a real "no reactions" answer.
pub(super) fn parse_api_response(text: &str) -> Option<ReactionSummary> {
    let data: serde_json::Value = serde_json::from_str(text).ok()?;
    let contents = data.get("contents")?.as_array()?;

    let content = match contents.first() {
        Some(content) => content,
        None => return Some(ReactionSummary::default()),
    };

    let mut summary = ReactionSummary::default();
    if let Some(reaction_list) = content.get("reactions").and_then(|v| v.as_array()) {
        for entry in reaction_list {
            let code = entry
                .get("reactionType")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let count = entry.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            if count > 0 {
                summary.reactions.push(ReactionCount {
                    reaction_type: display_name(code).to_string(),
                    count,
                });
                summary.total_count += count;
            }
        }
    }

    Some(summary)
}

/// Korean display name for a reaction-type code; unknown codes pass through.
pub(super) fn display_name(code: &str) -> &str {
    match code.to_lowercase().as_str() {
        "like" => "좋아요",
        "sympathy" => "공감",
        "cheer" => "응원해요",
        "congrats" => "축하해요",
        "love" => "사랑해요",
        "wow" => "놀라워요",
        "sad" => "슬퍼요",
        "angry" => "화나요",
        "fun" => "재미있어요",
        "useful" => "유용해요",
        "creative" => "창의적이에요",
        "touching" => "감동이에요",
        "impressive" => "칭찬해요",
        "interesting" => "흥미로워요",
        "thanks" => "고마워요",
        "haha" => "웃겨요",
        _ => code,
    }
}
