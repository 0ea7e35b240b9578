// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Converting the assistant's raw answer into document blocks.
//!
//! The answer is CommonMark. Headings, paragraphs, list items and code blocks map
//! onto [`Block`]s; inline markup (emphasis, links, code spans) is flattened to
//! its text. Block quotes contribute their inner paragraphs, raw HTML is dropped.

use async_trait::async_trait;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::model::Block;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("answer is empty")]
    Empty,
    #[error("answer contains no convertible blocks")]
    NoBlocks,
}

#[async_trait]
pub trait BlockConverter: Send + Sync {
    async fn convert(&self, answer: &str) -> Result<Vec<Block>, ConversionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

#[async_trait]
impl BlockConverter for MarkdownConverter {
    async fn convert(&self, answer: &str) -> Result<Vec<Block>, ConversionError> {
        parse_markdown(answer)
    }
}

pub fn parse_markdown(answer: &str) -> Result<Vec<Block>, ConversionError> {
    if answer.trim().is_empty() {
        return Err(ConversionError::Empty);
    }

    let mut collector = BlockCollector::default();
    collector.process(Parser::new_ext(answer, Options::ENABLE_STRIKETHROUGH));
    if collector.blocks.is_empty() {
        return Err(ConversionError::NoBlocks);
    }
    Ok(collector.blocks)
}

enum OpenBlock {
    Heading(u8),
    Paragraph,
    Code(Option<String>),
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<Block>,
    open: Option<OpenBlock>,
    text: String,
    /// One text buffer per list item currently open, innermost last.
    items: Vec<String>,
}

impl BlockCollector {
    fn process<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) | Event::Code(text) => self.inline(&text),
                Event::SoftBreak | Event::HardBreak => self.inline(" "),
                // Html, InlineHtml, Rule, TaskListMarker, FootnoteReference, math
                _ => {}
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => self.open_block(OpenBlock::Heading(heading_level(level))),
            Tag::Paragraph => match self.items.last_mut() {
                // Loose list items wrap their text in paragraphs.
                Some(item) if !item.is_empty() => item.push(' '),
                Some(_) => {}
                None => self.open_block(OpenBlock::Paragraph),
            },
            Tag::CodeBlock(kind) => {
                self.flush_item();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.open_block(OpenBlock::Code(language));
            }
            Tag::List(_) => self.flush_item(),
            Tag::Item => self.items.push(String::new()),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::CodeBlock => self.close_block(),
            TagEnd::Item => {
                if let Some(text) = self.items.pop() {
                    push_text_block(&mut self.blocks, &text, |text| Block::ListItem { text });
                }
            }
            _ => {}
        }
    }

    fn inline(&mut self, text: &str) {
        if self.open.is_some() {
            self.text.push_str(text);
        } else if let Some(item) = self.items.last_mut() {
            item.push_str(text);
        }
    }

    fn open_block(&mut self, block: OpenBlock) {
        self.text.clear();
        self.open = Some(block);
    }

    fn close_block(&mut self) {
        let text = std::mem::take(&mut self.text);
        match self.open.take() {
            Some(OpenBlock::Heading(level)) => {
                push_text_block(&mut self.blocks, &text, |text| Block::Heading { level, text })
            }
            Some(OpenBlock::Paragraph) => push_text_block(&mut self.blocks, &text, |text| Block::Paragraph { text }),
            Some(OpenBlock::Code(language)) => {
                let text = text.strip_suffix('\n').unwrap_or(&text).to_owned();
                self.blocks.push(Block::Code { language, text });
            }
            None => {}
        }
    }

    /// Emits the text an enclosing item gathered before a nested list or code block.
    fn flush_item(&mut self) {
        if let Some(item) = self.items.last_mut() {
            let text = std::mem::take(item);
            push_text_block(&mut self.blocks, &text, |text| Block::ListItem { text });
        }
    }
}

fn push_text_block(blocks: &mut Vec<Block>, text: &str, block: impl FnOnce(String) -> Block) {
    let text = text.trim();
    if !text.is_empty() {
        blocks.push(block(text.to_owned()));
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
