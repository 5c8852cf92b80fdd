//! Pure rendering from store state to a display tree, plus a plain-text
//! writer for that tree.

use std::io::{self, Write};

use shared::domain::{DisplayMode, Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    App,
    PostList,
    Article,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Container { region: Region, children: Vec<ViewNode> },
    Heading(String),
    Meta(String),
    Text(String),
    /// `next` is the value the toggle handler will request.
    Toggle { next: bool },
    Loading,
    EmptyList,
}

pub fn render(posts: Option<&[Post]>, mode: DisplayMode) -> ViewNode {
    let Some(posts) = posts else {
        return ViewNode::Container {
            region: Region::App,
            children: vec![ViewNode::Loading],
        };
    };

    let list = if posts.is_empty() {
        vec![ViewNode::EmptyList]
    } else {
        posts.iter().map(|post| render_post(post, mode)).collect()
    };

    ViewNode::Container {
        region: Region::App,
        children: vec![
            ViewNode::Toggle { next: mode.toggled() },
            ViewNode::Container {
                region: Region::PostList,
                children: list,
            },
        ],
    }
}

fn render_post(post: &Post, mode: DisplayMode) -> ViewNode {
    let body = if mode.is_full() {
        &post.content
    } else {
        &post.excerpt
    };
    let date = post
        .published_at()
        .map(|at| at.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| post.date.clone());

    ViewNode::Container {
        region: Region::Article,
        children: vec![
            ViewNode::Heading(html_to_text(&post.title.rendered)),
            ViewNode::Meta(date),
            ViewNode::Text(html_to_text(&body.rendered)),
        ],
    }
}

pub fn write_view(node: &ViewNode, out: &mut impl Write) -> io::Result<()> {
    match node {
        ViewNode::Container { region, children } => {
            for (index, child) in children.iter().enumerate() {
                if *region == Region::PostList && index > 0 {
                    writeln!(out)?;
                }
                write_view(child, out)?;
            }
            if *region == Region::App {
                out.flush()?;
            }
        }
        ViewNode::Heading(title) => {
            writeln!(out, "{title}")?;
            writeln!(out, "{}", "=".repeat(title.chars().count().max(3)))?;
        }
        ViewNode::Meta(meta) => writeln!(out, "{meta}")?,
        ViewNode::Text(text) => {
            for line in text.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        ViewNode::Toggle { next } => {
            let label = if *next {
                "Show full posts"
            } else {
                "Show excerpts"
            };
            writeln!(out, "[t] {label}\n")?;
        }
        ViewNode::Loading => writeln!(out, "Loading posts...")?,
        ViewNode::EmptyList => writeln!(out, "No posts.")?,
    }
    Ok(())
}

const LINE_BREAKING_TAGS: &[&str] = &[
    "br", "hr", "/p", "/div", "/li", "/ul", "/ol", "/pre", "/blockquote", "/h1", "/h2", "/h3",
    "/h4", "/h5", "/h6", "/tr", "/figure",
];

/// Flattens rendered CMS HTML for the terminal: tags dropped, block ends
/// turned into line breaks, entities decoded.
fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag: Option<String> = None;
    for ch in html.chars() {
        if let Some(name) = tag.as_mut() {
            if ch != '>' {
                name.push(ch);
                continue;
            }
            let name = name.trim().trim_end_matches('/').to_ascii_lowercase();
            if name
                .split_whitespace()
                .next()
                .is_some_and(|name| LINE_BREAKING_TAGS.contains(&name))
            {
                text.push('\n');
            }
            tag = None;
        } else if ch == '<' {
            tag = Some(String::new());
        } else {
            text.push(ch);
        }
    }

    html_escape::decode_html_entities(&text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
