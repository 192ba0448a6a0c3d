use std::collections::HashSet;

use maud::html;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

use crate::models::LinkTarget;

/// One top-level piece of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentElement {
    /// Markup passed through untouched.
    Raw(String),
    /// A slot rendered as an OGP card.
    Autolink(LinkTarget),
}

/// Split an HTML fragment into raw markup and autolink slots.
///
/// An element becomes a slot when it carries `data-ogp-url`, is an `<a>`
/// whose text equals its href, or is a block holding nothing but such an
/// anchor. Markup around a slot nested in running text is kept on either
/// side of it, so `<p>See URL now</p>` yields `<p>See `, the slot, ` now</p>`.
pub fn scan(html: &str) -> Vec<ContentElement> {
    let fragment = Html::parse_fragment(html);
    let mut scanner = Scanner::default();
    scanner.visit_children(fragment.root_element());
    scanner.finish()
}

/// Distinct autolink targets in discovery order.
pub fn autolinks(elements: &[ContentElement]) -> Vec<LinkTarget> {
    let mut seen = HashSet::new();
    elements
        .iter()
        .filter_map(|element| match element {
            ContentElement::Autolink(target) => Some(target),
            ContentElement::Raw(_) => None,
        })
        .filter(|target| seen.insert((*target).clone()))
        .cloned()
        .collect()
}

#[derive(Default)]
struct Scanner {
    elements: Vec<ContentElement>,
    raw: String,
}

impl Scanner {
    fn visit_children(&mut self, parent: ElementRef<'_>) {
        for child in parent.children() {
            match child.value() {
                Node::Text(text) => self.raw.push_str(&html! { (&**text) }.into_string()),
                Node::Comment(comment) => {
                    self.raw.push_str("<!--");
                    self.raw.push_str(comment);
                    self.raw.push_str("-->");
                }
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.visit_element(el);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_element(&mut self, el: ElementRef<'_>) {
        match autolink_url(el).map(|url| (url, LinkTarget::parse(url))) {
            Some((_, Ok(target))) => {
                self.flush();
                self.elements.push(ContentElement::Autolink(target));
            }
            Some((url, Err(e))) => {
                tracing::warn!(error = %e, url, "Autolink is not a previewable URL");
                self.raw.push_str(&el.html());
            }
            None if has_card_inside(el) => {
                self.open_tag(el.value());
                self.visit_children(el);
                self.raw.push_str("</");
                self.raw.push_str(el.value().name());
                self.raw.push('>');
            }
            None => self.raw.push_str(&el.html()),
        }
    }

    fn open_tag(&mut self, el: &Element) {
        self.raw.push('<');
        self.raw.push_str(el.name());
        for (name, value) in el.attrs() {
            self.raw.push(' ');
            self.raw.push_str(name);
            self.raw.push_str("=\"");
            self.raw.push_str(&html! { (value) }.into_string());
            self.raw.push('"');
        }
        self.raw.push('>');
    }

    fn flush(&mut self) {
        if !self.raw.is_empty() {
            self.elements
                .push(ContentElement::Raw(std::mem::take(&mut self.raw)));
        }
    }

    fn finish(mut self) -> Vec<ContentElement> {
        self.flush();
        self.elements
    }
}

fn has_card_inside(el: ElementRef<'_>) -> bool {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|d| autolink_url(d).is_some_and(|url| LinkTarget::parse(url).is_ok()))
}

fn autolink_url(el: ElementRef<'_>) -> Option<&str> {
    if let Some(url) = el.value().attr("data-ogp-url") {
        return Some(url);
    }
    if is_autolink_anchor(el) {
        return el.value().attr("href");
    }

    let mut only = None;
    for child in el.children() {
        match child.value() {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Comment(_) => {}
            Node::Element(_) if only.is_none() => only = ElementRef::wrap(child),
            _ => return None,
        }
    }
    only.filter(|anchor| is_autolink_anchor(*anchor))
        .and_then(|anchor| anchor.value().attr("href"))
}

fn is_autolink_anchor(el: ElementRef<'_>) -> bool {
    el.value().name() == "a"
        && el
            .value()
            .attr("href")
            .is_some_and(|href| href.trim() == el.text().collect::<String>().trim())
}
