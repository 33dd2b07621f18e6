//! Markup tokenizer
//!
//! A forgiving scanner for HTML fragments. It recognises start tags, end
//! tags, comments, doctypes and text. The bodies of `script` and `style`
//! are kept verbatim as a single text token.

use super::node::unescape_attr;
use regex::Regex;
use std::sync::OnceLock;

/// A lexical unit of markup
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Start {
        tag: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        tag: String,
    },
    Text(String),
}

fn start_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^<([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
        )
        .expect("start tag pattern is valid")
    })
}

fn end_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^</([A-Za-z][A-Za-z0-9-]*)\s*>").expect("end tag pattern is valid")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

/// Split markup into tokens
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while let Some(offset) = input[pos..].find('<') {
        let at = pos + offset;
        let rest = &input[at..];

        if rest.starts_with("<!--") {
            push_text(&mut tokens, &input[text_start..at]);
            pos = rest.find("-->").map_or(input.len(), |i| at + i + 3);
            text_start = pos;
            continue;
        }

        if rest.starts_with("<!") {
            push_text(&mut tokens, &input[text_start..at]);
            pos = rest.find('>').map_or(input.len(), |i| at + i + 1);
            text_start = pos;
            continue;
        }

        if let Some(caps) = end_tag_re().captures(rest) {
            push_text(&mut tokens, &input[text_start..at]);
            tokens.push(Token::End {
                tag: caps[1].to_ascii_lowercase(),
            });
            pos = at + caps[0].len();
            text_start = pos;
            continue;
        }

        if let Some(caps) = start_tag_re().captures(rest) {
            push_text(&mut tokens, &input[text_start..at]);

            let tag = caps[1].to_ascii_lowercase();
            let attrs = parse_attrs(caps.get(2).map_or("", |m| m.as_str()));
            let self_closing = &caps[3] == "/";
            pos = at + caps[0].len();
            text_start = pos;

            let raw_text = !self_closing && (tag == "script" || tag == "style");
            tokens.push(Token::Start {
                tag: tag.clone(),
                attrs,
                self_closing,
            });

            if raw_text {
                let close = format!("</{}", tag);
                let body_end = input[pos..]
                    .to_ascii_lowercase()
                    .find(&close)
                    .map_or(input.len(), |i| pos + i);
                push_text(&mut tokens, &input[pos..body_end]);
                pos = body_end;
                text_start = body_end;
            }
            continue;
        }

        // A lone '<' is ordinary text
        pos = at + 1;
    }

    push_text(&mut tokens, &input[text_start..]);
    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
}

fn parse_attrs(source: &str) -> Vec<(String, String)> {
    attr_re()
        .captures_iter(source)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| unescape_attr(m.as_str()))
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}
