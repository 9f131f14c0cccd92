// output formatting - readable answer or raw json

use crate::core::ChatReply;

pub struct Output;

impl Output {
    // answer first, metadata underneath
    pub fn pretty(reply: &ChatReply) {
        println!("{}\n", reply.text.trim_end());
        println!("{}", footer(reply));
    }

    // raw json for scripts
    pub fn raw(reply: &ChatReply) {
        println!("{}", serde_json::to_string(reply).unwrap_or_default());
    }
}

fn footer(reply: &ChatReply) -> String {
    let model = if reply.model.is_empty() {
        "unknown model"
    } else {
        &reply.model
    };

    if reply.response_time.is_empty() {
        format!("-- {model}")
    } else {
        format!("-- {model} in {}", reply.response_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer() {
        let reply = ChatReply {
            text: "answer".to_string(),
            model: "gpt-4-turbo".to_string(),
            response_time: "12ms".to_string(),
        };
        assert_eq!(footer(&reply), "-- gpt-4-turbo in 12ms");
    }

    #[test]
    fn test_footer_without_metadata() {
        assert_eq!(footer(&ChatReply::default()), "-- unknown model");
    }
}
