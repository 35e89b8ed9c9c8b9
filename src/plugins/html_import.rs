// Copyright 2026 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTML clipboard fragment parsing, behind the `clipboard-html` feature.
//!
//! Grounded on `dom/parser/parse.rs`'s `HtmlParser`: a stack-based
//! recursive descent that dispatches per tag name and degrades unknown
//! tags by skipping them, logged rather than failing. Uses `html5ever`'s
//! tokenizer (the same crate the teacher depends on under its `sys`
//! feature) rather than its full tree-builder: a paste fragment only ever
//! needs a flat stream of start/end/text tokens, not full DOM construction
//! with implicit-tag-closing recovery.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tokenizer::{
    BufferQueue, Tag as HtmlTag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};

use crate::model::node::new;
use crate::model::properties::{ParagraphProperties, RunProperties};
use crate::model::Node;
use crate::plugins::clipboard::PastedFragment;

#[derive(Default, Clone)]
struct InlineState {
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    href: Option<String>,
}

struct Frame {
    children: Vec<Node>,
}

struct FragmentSink {
    blocks: Vec<Node>,
    current: Frame,
    format_stack: Vec<(String, InlineState)>,
}

impl FragmentSink {
    fn new() -> Self {
        FragmentSink {
            blocks: Vec::new(),
            current: Frame { children: Vec::new() },
            format_stack: Vec::new(),
        }
    }

    fn active_state(&self) -> InlineState {
        self.format_stack
            .last()
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    }

    fn flush_paragraph(&mut self) {
        if !self.current.children.is_empty() {
            let children = std::mem::take(&mut self.current.children);
            self.blocks.push(new::paragraph(children, ParagraphProperties::default()));
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let state = self.active_state();
        let props = RunProperties {
            bold: state.bold.then_some(true),
            italic: state.italic.then_some(true),
            underline: state.underline.then_some(crate::model::properties::UnderlineStyle::Single),
            strikethrough: state.strikethrough.then_some(true),
            ..Default::default()
        };
        let run = new::run(vec![new::text(text)], props);
        if let Some(href) = state.href {
            self.current.children.push(new::hyperlink(vec![run], href, true));
        } else {
            self.current.children.push(run);
        }
    }

    fn start_tag(&mut self, tag: &HtmlTag) {
        let name = tag.name.to_string();
        match name.as_str() {
            "p" | "div" => self.flush_paragraph(),
            "br" => self.current.children.push(new::line_break()),
            "strong" | "b" => {
                let mut s = self.active_state();
                s.bold = true;
                self.format_stack.push((name, s));
            }
            "em" | "i" => {
                let mut s = self.active_state();
                s.italic = true;
                self.format_stack.push((name, s));
            }
            "u" => {
                let mut s = self.active_state();
                s.underline = true;
                self.format_stack.push((name, s));
            }
            "s" | "del" | "strike" => {
                let mut s = self.active_state();
                s.strikethrough = true;
                self.format_stack.push((name, s));
            }
            "a" => {
                let mut s = self.active_state();
                s.href = tag
                    .attrs
                    .iter()
                    .find(|a| a.name.local.as_ref() == "href")
                    .map(|a| a.value.to_string());
                self.format_stack.push((name, s));
            }
            _ => {
                // Unknown/unsupported tag: degrade by entering with the
                // parent's formatting unchanged (SPEC_FULL.md §7,
                // CodecUnsupportedFeature-style graceful degradation).
                log::debug!("clipboard html: ignoring unsupported start tag <{name}>");
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "p" | "div" => self.flush_paragraph(),
            "br" => {}
            "strong" | "b" | "em" | "i" | "u" | "s" | "del" | "strike" | "a" => {
                if let Some(pos) = self.format_stack.iter().rposition(|(n, _)| n == name) {
                    self.format_stack.truncate(pos);
                }
            }
            _ => {}
        }
    }
}

impl TokenSink for FragmentSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => self.start_tag(&tag),
                TagKind::EndTag => self.end_tag(&tag.name.to_string()),
            },
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::NullCharacterToken => {}
            Token::EOFToken => self.flush_paragraph(),
            Token::ParseError(msg) => {
                log::debug!("clipboard html: tokenizer parse error: {msg}");
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Parse an HTML clipboard fragment into block paragraphs. Always returns
/// [`PastedFragment::Blocks`]; callers collapse a single resulting
/// paragraph back to an inline splice (§4.4.5).
pub fn parse_fragment(html: &str) -> PastedFragment {
    let sink = FragmentSink::new();
    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();
    let mut sink = tokenizer.sink;
    sink.flush_paragraph();
    if sink.blocks.is_empty() {
        PastedFragment::Blocks(vec![new::empty_paragraph()])
    } else {
        PastedFragment::Blocks(sink.blocks)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_bold_paragraph() {
        let fragment = parse_fragment("<p>Hello <strong>World</strong></p>");
        match fragment {
            PastedFragment::Blocks(blocks) => {
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].raw_text(), "Hello World");
            }
            _ => panic!("expected blocks"),
        }
    }

    #[test]
    fn parses_multiple_paragraphs() {
        let fragment = parse_fragment("<p>One</p><p>Two</p>");
        match fragment {
            PastedFragment::Blocks(blocks) => assert_eq!(blocks.len(), 2),
            _ => panic!("expected blocks"),
        }
    }
}
